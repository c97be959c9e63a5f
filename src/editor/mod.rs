//! Serde layer for the visual editor's raw graph JSON.

pub mod types;

pub use types::*;
