//! Form field descriptions

/// What kind of interactive element a field renders as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Fixed list of options, the first is usually the empty placeholder
    Select { options: Vec<String> },
    /// Single-line text input
    Text,
    /// Multi-line text input
    TextArea,
}

/// Static description of a single form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Create a new single-line text field
    pub fn text(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FieldKind::Text,
        }
    }

    /// Create a new multi-line text field
    pub fn text_area(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FieldKind::TextArea,
        }
    }

    /// Create a new select field
    pub fn select(name: &str, label: &str, options: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FieldKind::Select {
                options: options.iter().map(|o| o.to_string()).collect(),
            },
        }
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self.kind, FieldKind::TextArea)
    }

    pub fn is_select(&self) -> bool {
        matches!(self.kind, FieldKind::Select { .. })
    }

    /// Options of a select field (empty for text fields)
    pub fn options(&self) -> &[String] {
        match &self.kind {
            FieldKind::Select { options } => options,
            _ => &[],
        }
    }

    /// Option after (or before) `current`, wrapping around.
    ///
    /// A value that is not one of the options starts from the first option.
    pub fn cycle_option(&self, current: &str, forward: bool) -> Option<&str> {
        let options = self.options();
        if options.is_empty() {
            return None;
        }
        let len = options.len();
        let next = match options.iter().position(|o| o == current) {
            Some(i) if forward => (i + 1) % len,
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        Some(options[next].as_str())
    }

    /// Get the display value for rendering
    pub fn display_value(&self, value: &str) -> String {
        match &self.kind {
            FieldKind::Select { .. } if value.is_empty() => "< (select) >".to_string(),
            FieldKind::Select { .. } => format!("< {value} >"),
            FieldKind::Text | FieldKind::TextArea => value.to_string(),
        }
    }
}
