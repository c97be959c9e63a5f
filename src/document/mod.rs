//! The external pathway document format.
//!
//! This is the JSON shape consumed by the voice platform's update API. Its
//! one structural quirk: the `nodes` array carries a trailing
//! `{ "globalConfig": ... }` pseudo-node as its last element. The in-memory
//! [`Document`] keeps the config as a proper field and the serde layer
//! appends/splits the pseudo-node at the boundary.

pub mod node;

pub use node::*;

use crate::error::DecompileError;
use serde::{Deserialize, Serialize};

/// A directed connection in the document. The handle concept of the internal
/// graph is erased here; only the flat label survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub label: String,
}

/// Pathway-wide configuration carried by the trailing pseudo-node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalConfig {
    pub global_prompt: String,
}

/// A complete pathway document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "DocumentRepr", into = "DocumentRepr")]
pub struct Document {
    pub name: String,
    pub description: String,
    pub nodes: Vec<DocNode>,
    pub edges: Vec<DocEdge>,
    pub global_config: GlobalConfig,
}

impl Document {
    /// Parses a document from its JSON text. A payload without a usable
    /// `nodes` array is rejected outright.
    pub fn from_json(json: &str) -> Result<Self, DecompileError> {
        serde_json::from_str(json).map_err(|e| DecompileError::JsonParseError(e.to_string()))
    }

    pub fn node(&self, id: &str) -> Option<&DocNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The node flagged `isStart`, or failing that the first `Default` node.
    pub fn start_node(&self) -> Option<&DocNode> {
        self.nodes
            .iter()
            .find(|n| n.is_start())
            .or_else(|| self.nodes.iter().find(|n| n.kind == DocNodeKind::Default))
    }

    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a DocEdge> {
        self.edges.iter().filter(move |e| e.source == id)
    }

    pub fn incoming<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a DocEdge> {
        self.edges.iter().filter(move |e| e.target == id)
    }
}

/// Wire-level shape: nodes and the global config share one array.
#[derive(Serialize, Deserialize)]
struct DocumentRepr {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    nodes: Vec<NodeEntry>,
    #[serde(default)]
    edges: Vec<DocEdge>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum NodeEntry {
    Config {
        #[serde(rename = "globalConfig")]
        global_config: GlobalConfig,
    },
    Node(DocNode),
}

impl From<DocumentRepr> for Document {
    fn from(repr: DocumentRepr) -> Self {
        let mut nodes = Vec::with_capacity(repr.nodes.len());
        let mut global_config = GlobalConfig::default();
        for entry in repr.nodes {
            match entry {
                NodeEntry::Node(node) => nodes.push(node),
                NodeEntry::Config {
                    global_config: config,
                } => global_config = config,
            }
        }
        Self {
            name: repr.name,
            description: repr.description,
            nodes,
            edges: repr.edges,
            global_config,
        }
    }
}

impl From<Document> for DocumentRepr {
    fn from(document: Document) -> Self {
        let mut nodes: Vec<NodeEntry> = document.nodes.into_iter().map(NodeEntry::Node).collect();
        // The platform schema requires the config entry to be last.
        nodes.push(NodeEntry::Config {
            global_config: document.global_config,
        });
        Self {
            name: document.name,
            description: document.description,
            nodes,
            edges: document.edges,
        }
    }
}
