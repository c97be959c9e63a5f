use serde::{Deserialize, Serialize};

/// Source handle marking the branch of a conditional node that fires when
/// its comparison holds.
pub const TRUE_HANDLE: &str = "true";
/// Source handle for the opposite branch.
pub const FALSE_HANDLE: &str = "false";

/// Builds the source handle naming a customer-response option by position.
pub fn option_handle(index: usize) -> String {
    format!("option-{}", index)
}

/// Extracts the option position from an `option-<index>` handle.
pub fn option_index(handle: &str) -> Option<usize> {
    handle.strip_prefix("option-")?.parse().ok()
}

/// A directed connection between two nodes.
///
/// `source_handle` disambiguates which of a customer-response node's options
/// (`option-<index>`) or which conditional branch (`true` / `false`) the edge
/// represents. The external format has no handle concept; compilation erases
/// the handle into the label and decompilation re-derives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(
        default,
        rename = "sourceHandle",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GraphEdge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            label: None,
        }
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.source_handle = Some(handle.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
