//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, title/tab/status bars and overlays
//! - `input`: keyboard event handling
//! - `styles`: color palette and text styling
//! - `tabs`: the record table and detail pane

pub mod input;
pub mod render;
pub mod styles;
pub mod tabs;
