//! Platform-specific configuration

/// Submit shortcut display for form help text
/// Ctrl+S works on all platforms
pub const SUBMIT_SHORTCUT: &str = "Ctrl+S";

/// Newline hint for the message field
/// - macOS: "Return"
/// - Linux/Windows: "Enter"
#[cfg(target_os = "macos")]
pub const NEWLINE_KEY: &str = "Return";

#[cfg(not(target_os = "macos"))]
pub const NEWLINE_KEY: &str = "Enter";
