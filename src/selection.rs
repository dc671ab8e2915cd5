//! Host selection model
//!
//! The host DAW pushes selection changes as events over a channel; the core
//! never queries the host. A cleared selection is a normal condition, not an
//! error.

use crate::encoder::Color;

/// The currently selected track, as reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub name: String,
    pub color: Color,
}

impl Selection {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

/// Selection change notification from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// A track was selected
    Changed(Selection),
    /// The selection was cleared (no track selected)
    Cleared,
}
