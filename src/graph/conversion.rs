use super::Graph;
use crate::error::GraphConversionError;

/// A trait for custom authoring formats that can be converted into a keiro
/// [`Graph`].
///
/// This is the extension point that keeps the compiler format-agnostic: the
/// bundled editor JSON layer implements it, and any other persistence format
/// can provide its own translation.
///
/// # Example
///
/// ```rust,no_run
/// use keiro::error::GraphConversionError;
/// use keiro::graph::{Graph, GraphNode, IntoGraph, NodeData};
///
/// struct MyFlow {
///     steps: Vec<String>,
/// }
///
/// impl IntoGraph for MyFlow {
///     fn into_graph(self) -> Result<Graph, GraphConversionError> {
///         let nodes = self
///             .steps
///             .into_iter()
///             .enumerate()
///             .map(|(i, text)| {
///                 GraphNode::new(
///                     format!("step_{}", i),
///                     NodeData::Response {
///                         text,
///                         extracted_variables: vec![],
///                     },
///                 )
///             })
///             .collect();
///         Ok(Graph::new(nodes, vec![]))
///     }
/// }
/// ```
pub trait IntoGraph {
    /// Consumes the object and converts it into a keiro-compatible graph.
    fn into_graph(self) -> Result<Graph, GraphConversionError>;
}
