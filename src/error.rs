use thiserror::Error;

/// Errors that can occur while compiling a graph into a pathway document.
///
/// Everything structural (missing branches, orphans, missing text) is
/// collected as validation issues instead of failing the compile; only
/// inputs that are not a graph at all end up here.
#[derive(Error, Debug, Clone)]
pub enum CompileError {
    #[error("Failed to parse graph JSON: {0}")]
    JsonParseError(String),

    #[error("Invalid graph: {0}")]
    InvalidGraph(String),
}

/// Errors that can occur while decompiling an external pathway document.
#[derive(Error, Debug, Clone)]
pub enum DecompileError {
    #[error("Failed to parse pathway document JSON: {0}")]
    JsonParseError(String),

    #[error("Document contains no usable nodes")]
    EmptyDocument,
}

/// Errors that can occur when converting a custom authoring format into a
/// keiro `Graph`.
#[derive(Error, Debug, Clone)]
pub enum GraphConversionError {
    #[error("Invalid graph data: {0}")]
    ValidationError(String),

    #[error("Graph field '{0}' is missing or not an array")]
    MissingCollection(&'static str),
}

impl From<GraphConversionError> for CompileError {
    fn from(err: GraphConversionError) -> Self {
        CompileError::InvalidGraph(err.to_string())
    }
}
