//! The compile half of the format converter.
//!
//! [`Compiler::compile`] runs the full pipeline: id normalization, variable
//! collection, conditional elimination, branch synthesis, validation with
//! repair, and finally the mapping onto the external document vocabulary.
//! Role classification happens at ingestion time (see [`crate::editor`] and
//! [`crate::decompiler`]); graphs reaching the compiler always carry
//! concrete kinds.
//!
//! Every stage consumes a graph value and returns a fresh one. The compiler
//! clones its input snapshot per call, so rapid repeated compiles (preview,
//! save, deploy) are independent and order-insensitive.

pub mod branches;
pub mod classify;
pub mod conditionals;
pub mod validate;
pub mod variables;

pub use branches::{label_covers_option, synthesize_branches, user_responded_label};
pub use classify::{RoleEdge, RoleNode, classify};
pub use conditionals::{eliminate_conditionals, parse_condition};
pub use validate::{ValidationReport, fallback_text, validate};
pub use variables::{DEFAULT_VARIABLE, collect_variables};

use crate::document::{
    DocEdge, DocNode, DocNodeData, DocNodeKind, Document, ExtractVar, ModelOptions,
};
use crate::error::CompileError;
use crate::graph::{
    Condition, Graph, IntoGraph, NodeData, NodeKind, edge::option_index, normalize_ids,
};
use crate::idgen::IdGenerator;
use ahash::AHashMap;

/// The result of a compile: the emitted document plus every issue the
/// validator collected along the way.
///
/// Issues never block compilation; they are shown to the user before a
/// deployment is confirmed ("deploy with fixes").
#[derive(Debug, Clone)]
pub struct CompiledPathway {
    pub document: Document,
    pub issues: Vec<String>,
}

/// Compiles conversation graphs into pathway documents.
pub struct Compiler {
    graph: Graph,
    name: String,
    description: String,
    id_prefix: String,
}

/// Configures and builds a [`Compiler`].
pub struct CompilerBuilder {
    graph: Graph,
    name: String,
    description: String,
    id_prefix: String,
}

impl CompilerBuilder {
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            name: "Untitled Pathway".to_string(),
            description: String::new(),
            id_prefix: String::new(),
        }
    }

    /// The pathway name recorded in the emitted document.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Prefix for every id the compiler synthesizes.
    pub fn with_id_prefix(mut self, prefix: &str) -> Self {
        self.id_prefix = prefix.to_string();
        self
    }

    pub fn build(self) -> Compiler {
        Compiler {
            graph: self.graph,
            name: self.name,
            description: self.description,
            id_prefix: self.id_prefix,
        }
    }
}

impl Compiler {
    pub fn builder(graph: Graph) -> CompilerBuilder {
        CompilerBuilder::new(graph)
    }

    /// Builds a compiler straight from the editor's raw graph JSON.
    pub fn from_json(json: &str) -> Result<Self, CompileError> {
        let graph = crate::editor::EditorGraph::from_json(json)?.into_graph()?;
        Ok(Self::builder(graph).build())
    }

    /// Runs the whole pipeline and emits the external document.
    ///
    /// Structural problems are repaired and reported, never fatal; the
    /// returned document is always usable by the platform's update API.
    pub fn compile(&self) -> Result<CompiledPathway, CompileError> {
        let mut ids = IdGenerator::with_prefix(&self.id_prefix);

        let graph = normalize_ids(self.graph.clone());
        let variable_names = collect_variables(&graph);
        let graph = eliminate_conditionals(graph, &mut ids);
        let graph = synthesize_branches(graph, &mut ids);
        let report = validate(&graph);

        let document = self.emit(report.repaired, variable_names, &mut ids);
        Ok(CompiledPathway {
            document,
            issues: report.issues,
        })
    }

    fn emit(&self, graph: Graph, variable_names: Vec<String>, ids: &mut IdGenerator) -> Document {
        let var_details = variable_details(&graph);
        let start_id = graph
            .start_node()
            .map(|n| n.id.clone())
            .or_else(|| graph.nodes.first().map(|n| n.id.clone()));

        let mut nodes: Vec<DocNode> = graph.nodes.iter().map(doc_node).collect();

        let mut edges: Vec<DocEdge> = graph
            .edges
            .iter()
            .map(|edge| DocEdge {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                label: edge
                    .label
                    .clone()
                    .or_else(|| option_label(&graph, edge.source.as_str(), edge.source_handle.as_deref()))
                    .unwrap_or_else(|| "Default".to_string()),
            })
            .collect();

        // The platform rejects documents without at least one Default and
        // one End Call node, so degenerate graphs get both synthesized.
        if !nodes.iter().any(|n| n.kind == DocNodeKind::Default) {
            let id = ids.next_unused("greeting", |candidate| {
                nodes.iter().any(|n| n.id == candidate)
            });
            nodes.insert(
                0,
                DocNode {
                    id,
                    kind: DocNodeKind::Default,
                    data: DocNodeData {
                        name: "Greeting".to_string(),
                        text: Some(fallback_text(NodeKind::Greeting).to_string()),
                        model_options: Some(ModelOptions::default()),
                        ..DocNodeData::default()
                    },
                },
            );
        }
        if !nodes.iter().any(|n| n.kind == DocNodeKind::EndCall) {
            let id = ids.next_unused("end_call", |candidate| {
                nodes.iter().any(|n| n.id == candidate)
            });
            nodes.push(DocNode {
                id,
                kind: DocNodeKind::EndCall,
                data: DocNodeData {
                    name: "End Call".to_string(),
                    prompt: Some(branches::GOODBYE_TEXT.to_string()),
                    model_options: Some(ModelOptions::default()),
                    ..DocNodeData::default()
                },
            });
        }

        attach_start(&mut nodes, start_id.as_deref(), &variable_names, &var_details);

        // Never emit an edge-less document when there is anything to connect.
        if edges.is_empty() && nodes.len() >= 2 {
            let default_id = nodes
                .iter()
                .find(|n| n.kind == DocNodeKind::Default)
                .map(|n| n.id.clone());
            let terminal_id = nodes
                .iter()
                .find(|n| n.kind == DocNodeKind::EndCall)
                .map(|n| n.id.clone());
            if let (Some(source), Some(target)) = (default_id, terminal_id) {
                let id = ids.next_unused("edge", |candidate| edges.iter().any(|e| e.id == candidate));
                edges.push(DocEdge {
                    id,
                    source,
                    target,
                    label: "Default".to_string(),
                });
            }
        }

        Document {
            name: self.name.clone(),
            description: self.description.clone(),
            nodes,
            edges,
            global_config: Default::default(),
        }
    }
}

/// Looks up the option text behind an `option-<i>` handle on a
/// customer-response source node.
fn option_label(graph: &Graph, source: &str, handle: Option<&str>) -> Option<String> {
    let index = option_index(handle?)?;
    match &graph.node(source)?.data {
        NodeData::CustomerResponse { options, .. } => options.get(index).cloned(),
        _ => None,
    }
}

/// Per-variable type and description, gathered from the nodes that declare
/// them. Anything undeclared falls back to a plain string.
fn variable_details(graph: &Graph) -> AHashMap<String, (String, String)> {
    let mut details = AHashMap::new();
    for node in &graph.nodes {
        match &node.data {
            NodeData::CustomerResponse {
                variable_name,
                variable_type,
                ..
            } if !variable_name.is_empty() => {
                details
                    .entry(variable_name.clone())
                    .or_insert_with(|| (variable_type.clone(), String::new()));
            }
            NodeData::Webhook { extract_vars, .. } => {
                for var in extract_vars {
                    details
                        .entry(var.name.clone())
                        .or_insert_with(|| (var.var_type.clone(), var.description.clone()));
                }
            }
            _ => {}
        }
    }
    details
}

/// Flags exactly one Default node as the start and attaches the collected
/// variable declarations to it.
fn attach_start(
    nodes: &mut [DocNode],
    start_id: Option<&str>,
    variable_names: &[String],
    var_details: &AHashMap<String, (String, String)>,
) {
    for node in nodes.iter_mut() {
        node.data.is_start = None;
    }
    let index = nodes
        .iter()
        .position(|n| n.kind == DocNodeKind::Default && Some(n.id.as_str()) == start_id)
        .or_else(|| nodes.iter().position(|n| n.kind == DocNodeKind::Default));
    let Some(index) = index else {
        return;
    };

    let extract_vars: Vec<ExtractVar> = variable_names
        .iter()
        .map(|name| {
            let (var_type, description) = var_details
                .get(name)
                .cloned()
                .unwrap_or_else(|| ("string".to_string(), String::new()));
            ExtractVar::new(name.clone(), normalized_type(&var_type), description)
        })
        .collect();

    let data = &mut nodes[index].data;
    data.is_start = Some(true);
    data.extract_vars = Some(extract_vars);
    data.extract_var_settings = Some(serde_json::Map::new());
}

fn normalized_type(var_type: &str) -> String {
    if var_type.is_empty() {
        "string".to_string()
    } else {
        var_type.to_string()
    }
}

/// Maps one graph node onto the document vocabulary.
fn doc_node(node: &crate::graph::GraphNode) -> DocNode {
    let (kind, data) = match &node.data {
        NodeData::Greeting {
            text,
            ..
        }
        | NodeData::Question {
            text,
            ..
        }
        | NodeData::Response {
            text,
            ..
        } => (
            DocNodeKind::Default,
            DocNodeData {
                name: node.kind().to_string(),
                text: Some(text.clone()),
                model_options: Some(ModelOptions::default()),
                ..DocNodeData::default()
            },
        ),
        NodeData::CustomerResponse {
            text,
            options,
            variable_name,
            ..
        } => (
            DocNodeKind::Default,
            DocNodeData {
                name: node.kind().to_string(),
                text: Some(text.clone()),
                options: Some(options.clone()),
                variable_name: (!variable_name.is_empty()).then(|| variable_name.clone()),
                model_options: Some(ModelOptions::default()),
                ..DocNodeData::default()
            },
        ),
        // A conditional only survives elimination when its expression never
        // parsed; it is emitted as plain prompt text so the document stays
        // loadable, and the validator has already reported it.
        NodeData::Conditional { condition, .. } => {
            let text = match condition {
                Condition::Parsed(c) => c.label(),
                Condition::Raw(raw) => raw.clone(),
            };
            (
                DocNodeKind::Default,
                DocNodeData {
                    name: "Conditional".to_string(),
                    text: Some(text),
                    model_options: Some(ModelOptions::default()),
                    ..DocNodeData::default()
                },
            )
        }
        NodeData::Transfer {
            text,
            transfer_number,
            transfer_kind,
        } => (
            DocNodeKind::TransferCall,
            DocNodeData {
                name: "Transfer Call".to_string(),
                text: Some(text.clone()),
                transfer_number: Some(transfer_number.clone()),
                warm_transfer_fields: matches!(transfer_kind, crate::graph::TransferKind::Warm)
                    .then(serde_json::Map::new),
                model_options: Some(ModelOptions::default()),
                ..DocNodeData::default()
            },
        ),
        NodeData::Webhook {
            text,
            url,
            method,
            body_template,
            extract_vars,
        } => (
            DocNodeKind::Webhook,
            DocNodeData {
                name: "Webhook".to_string(),
                text: Some(text.clone()),
                url: Some(url.clone()),
                method: Some(method.clone()),
                body: Some(body_template.clone()),
                extract_vars: Some(
                    extract_vars
                        .iter()
                        .map(|v| {
                            ExtractVar::new(
                                v.name.clone(),
                                normalized_type(&v.var_type),
                                v.description.clone(),
                            )
                        })
                        .collect(),
                ),
                model_options: Some(ModelOptions::default()),
                ..DocNodeData::default()
            },
        ),
        NodeData::EndCall { text } => (
            DocNodeKind::EndCall,
            DocNodeData {
                name: "End Call".to_string(),
                prompt: Some(text.clone()),
                model_options: Some(ModelOptions::default()),
                ..DocNodeData::default()
            },
        ),
    };

    DocNode {
        id: node.id.clone(),
        kind,
        data,
    }
}
