//! Form rendering module
//!
//! - `field_renderer`: Field rendering utilities
//! - `support_form`: The support request form and its action panel

mod field_renderer;
mod support_form;

pub use support_form::draw as draw_support_form;
