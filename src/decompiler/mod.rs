//! The decompile half of the format converter.
//!
//! Rebuilds an editable [`Graph`] from an externally authored pathway
//! document: classifies the generic `Default` nodes into concrete roles from
//! topology, re-derives the `sourceHandle` values the external format
//! erased, and recovers variable declarations from the start node.

pub mod heuristics;

pub use heuristics::{YES_NO_PHRASES, looks_like_yes_no_question};

use crate::compiler::classify::{RoleEdge, RoleNode, classify};
use crate::compiler::variables::DEFAULT_VARIABLE;
use crate::document::{DocNode, DocNodeKind, Document};
use crate::error::DecompileError;
use crate::graph::{
    Graph, GraphEdge, GraphNode, NodeData, NodeKind, TransferKind, WebhookVar,
    edge::option_handle,
};
use ahash::AHashMap;

/// Synthetic options given to an imported branch point that declares none.
const SYNTHETIC_OPTIONS: [&str; 3] = ["Yes", "No", "Maybe"];

/// Decompiles pathway documents back into conversation graphs.
pub struct Decompiler {
    document: Document,
}

impl Decompiler {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn from_json(json: &str) -> Result<Self, DecompileError> {
        Ok(Self::new(Document::from_json(json)?))
    }

    /// Rebuilds the graph. Fails only when the document carries no nodes at
    /// all; every recoverable oddity is papered over with defaults.
    pub fn decompile(&self) -> Result<Graph, DecompileError> {
        let doc = &self.document;
        if doc.nodes.is_empty() {
            return Err(DecompileError::EmptyDocument);
        }

        let kinds = self.resolve_kinds();
        let variable_types = self.start_variable_types();

        // Options per branch point, fixed up front so edge-handle recovery
        // sees the same list the node ends up with.
        let node_options: AHashMap<&str, Vec<String>> = doc
            .nodes
            .iter()
            .filter(|n| kinds.get(n.id.as_str()) == Some(&NodeKind::CustomerResponse))
            .map(|n| (n.id.as_str(), self.options_for(n)))
            .collect();

        let nodes: Vec<GraphNode> = doc
            .nodes
            .iter()
            .map(|n| {
                let kind = *kinds.get(n.id.as_str()).unwrap_or(&NodeKind::Response);
                GraphNode {
                    id: n.id.clone(),
                    is_start: n.is_start(),
                    data: build_data(n, kind, &node_options, &variable_types),
                }
            })
            .collect();

        let edges: Vec<GraphEdge> = doc
            .edges
            .iter()
            .map(|e| {
                let source_handle = node_options
                    .get(e.source.as_str())
                    .and_then(|options| recover_handle(&e.label, options));
                GraphEdge {
                    id: e.id.clone(),
                    source: e.source.clone(),
                    target: e.target.clone(),
                    source_handle,
                    label: (!e.label.is_empty()).then(|| e.label.clone()),
                }
            })
            .collect();

        Ok(Graph::new(nodes, edges))
    }

    /// Concrete kinds for every node; `Default` nodes go through the role
    /// classifier.
    fn resolve_kinds(&self) -> AHashMap<&str, NodeKind> {
        let doc = &self.document;
        let role_nodes: Vec<RoleNode<'_>> = doc
            .nodes
            .iter()
            .map(|n| RoleNode {
                id: &n.id,
                is_start: n.is_start(),
                kind: match n.kind {
                    DocNodeKind::Default => None,
                    DocNodeKind::EndCall => Some(NodeKind::EndCall),
                    DocNodeKind::TransferCall => Some(NodeKind::Transfer),
                    DocNodeKind::Webhook => Some(NodeKind::Webhook),
                },
            })
            .collect();
        let role_edges: Vec<RoleEdge<'_>> = doc
            .edges
            .iter()
            .map(|e| RoleEdge {
                source: &e.source,
                target: &e.target,
                label: Some(e.label.as_str()),
            })
            .collect();

        role_nodes
            .iter()
            .map(|role| {
                let kind = role
                    .kind
                    .unwrap_or_else(|| classify(role.id, &role_nodes, &role_edges));
                (role.id, kind)
            })
            .collect()
    }

    /// Variable name to declared type, read off the start node's
    /// `extractVars` tuples.
    fn start_variable_types(&self) -> AHashMap<String, String> {
        self.document
            .start_node()
            .and_then(|n| n.data.extract_vars.as_ref())
            .map(|vars| {
                vars.iter()
                    .map(|v| (v.name.clone(), v.var_type.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Declared options, or a synthetic set sized by the yes/no heuristic.
    fn options_for(&self, node: &DocNode) -> Vec<String> {
        if let Some(options) = &node.data.options {
            if !options.is_empty() {
                return options.clone();
            }
        }
        let text = node.data.text.as_deref().unwrap_or_default();
        if looks_like_yes_no_question(text) {
            SYNTHETIC_OPTIONS[..2].iter().map(|s| s.to_string()).collect()
        } else {
            SYNTHETIC_OPTIONS.iter().map(|s| s.to_string()).collect()
        }
    }
}

/// Matches an edge label back to the option it covers: exact match first,
/// then the derived `User responded <option>` form.
fn recover_handle(label: &str, options: &[String]) -> Option<String> {
    if let Some(index) = options.iter().position(|o| o == label) {
        return Some(option_handle(index));
    }
    let stripped = label.strip_prefix("User responded ")?;
    let index = options.iter().position(|o| o == stripped)?;
    Some(option_handle(index))
}

fn build_data(
    node: &DocNode,
    kind: NodeKind,
    node_options: &AHashMap<&str, Vec<String>>,
    variable_types: &AHashMap<String, String>,
) -> NodeData {
    let data = &node.data;
    let text = data.text.clone().unwrap_or_default();
    match kind {
        NodeKind::Greeting => NodeData::Greeting {
            text,
            // The start node carries the document-wide declarations; hand
            // them back to the editor as its own extraction list.
            extracted_variables: data
                .extract_vars
                .as_ref()
                .map(|vars| vars.iter().map(|v| v.name.clone()).collect())
                .unwrap_or_default(),
        },
        NodeKind::Question => NodeData::Question {
            text,
            extracted_variables: vec![],
        },
        NodeKind::CustomerResponse => {
            let variable_name = data
                .variable_name
                .clone()
                .unwrap_or_else(|| DEFAULT_VARIABLE.to_string());
            let variable_type = variable_types
                .get(&variable_name)
                .cloned()
                .unwrap_or_else(|| "string".to_string());
            NodeData::CustomerResponse {
                text,
                options: node_options
                    .get(node.id.as_str())
                    .cloned()
                    .unwrap_or_default(),
                variable_name,
                variable_type,
                is_open_ended: false,
            }
        }
        NodeKind::Transfer => NodeData::Transfer {
            text,
            transfer_number: data.transfer_number.clone().unwrap_or_default(),
            transfer_kind: if data.warm_transfer_fields.is_some() {
                TransferKind::Warm
            } else {
                TransferKind::Cold
            },
        },
        NodeKind::Webhook => NodeData::Webhook {
            text,
            url: data.url.clone().unwrap_or_default(),
            method: data.method.clone().unwrap_or_else(|| "POST".to_string()),
            body_template: data.body.clone().unwrap_or_default(),
            extract_vars: data
                .extract_vars
                .as_ref()
                .map(|vars| {
                    vars.iter()
                        .map(|v| WebhookVar {
                            name: v.name.clone(),
                            var_type: v.var_type.clone(),
                            description: v.description.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        },
        NodeKind::EndCall => NodeData::EndCall {
            text: data.prompt.clone().or(data.text.clone()).unwrap_or_default(),
        },
        // The classifier never yields these for document nodes; treat any
        // remainder as a plain response.
        NodeKind::Response | NodeKind::Conditional => NodeData::Response {
            text,
            extracted_variables: vec![],
        },
    }
}
