use crate::compiler::classify::{RoleEdge, RoleNode, classify};
use crate::error::GraphConversionError;
use crate::graph::{
    CompareOp, Comparison, Condition, Graph, GraphEdge, GraphNode, IntoGraph, NodeData, NodeKind,
    TransferKind, WebhookVar,
};
use ahash::AHashSet;
use serde::Deserialize;
use serde_json::Value;

/// The visual editor's raw graph JSON.
///
/// Deliberately loose: ids are arbitrary JSON values and every data field is
/// optional, because hand-edited exports are common. Conversion drops what
/// it cannot use instead of failing; only a payload that is not a graph at
/// all (missing or non-array `nodes`) is rejected.
#[derive(Debug, Deserialize)]
pub struct EditorGraph {
    pub nodes: Vec<EditorNode>,
    #[serde(default)]
    pub edges: Vec<EditorEdge>,
}

/// A raw editor node; `kind` is absent when authored programmatically and is
/// then inferred from topology.
#[derive(Debug, Clone, Deserialize)]
pub struct EditorNode {
    #[serde(default)]
    pub id: Value,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub data: EditorNodeData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EditorNodeData {
    pub text: Option<String>,
    #[serde(alias = "isStart")]
    pub is_start: Option<bool>,
    #[serde(alias = "extractedVariables")]
    pub extracted_variables: Option<Vec<String>>,
    pub options: Option<Vec<String>>,
    #[serde(alias = "variableName")]
    pub variable_name: Option<String>,
    #[serde(alias = "variableType")]
    pub variable_type: Option<String>,
    #[serde(alias = "isOpenEnded")]
    pub is_open_ended: Option<bool>,
    pub variable: Option<String>,
    pub operator: Option<String>,
    pub value: Option<String>,
    #[serde(alias = "trueLabel")]
    pub true_label: Option<String>,
    #[serde(alias = "falseLabel")]
    pub false_label: Option<String>,
    pub condition: Option<String>,
    #[serde(alias = "transferNumber")]
    pub transfer_number: Option<String>,
    #[serde(alias = "transferType")]
    pub transfer_type: Option<String>,
    pub url: Option<String>,
    pub method: Option<String>,
    #[serde(alias = "bodyTemplate")]
    pub body_template: Option<String>,
    #[serde(alias = "extractVars")]
    pub extract_vars: Option<Vec<WebhookVar>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditorEdge {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub source: Value,
    #[serde(default)]
    pub target: Value,
    #[serde(default, alias = "sourceHandle")]
    pub source_handle: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

impl EditorGraph {
    pub fn from_json(json: &str) -> Result<Self, GraphConversionError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| GraphConversionError::ValidationError(format!("invalid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Shape-checks the payload before the lenient per-entry parse, so a
    /// payload that is not a graph at all gets a descriptive rejection.
    pub fn from_value(value: Value) -> Result<Self, GraphConversionError> {
        let object = value.as_object().ok_or_else(|| {
            GraphConversionError::ValidationError("graph must be a JSON object".to_string())
        })?;
        if !object.get("nodes").is_some_and(Value::is_array) {
            return Err(GraphConversionError::MissingCollection("nodes"));
        }
        if object.get("edges").is_some_and(|e| !e.is_array()) {
            return Err(GraphConversionError::MissingCollection("edges"));
        }
        serde_json::from_value(value)
            .map_err(|e| GraphConversionError::ValidationError(e.to_string()))
    }
}

impl IntoGraph for EditorGraph {
    fn into_graph(self) -> Result<Graph, GraphConversionError> {
        // First pass: keep nodes with string ids, remember which kinds are
        // already explicit.
        let kept: Vec<(String, Option<NodeKind>, EditorNodeData)> = self
            .nodes
            .into_iter()
            .filter_map(|node| {
                let id = node.id.as_str()?.to_string();
                let kind = node.kind.as_deref().and_then(parse_kind);
                Some((id, kind, node.data))
            })
            .collect();

        let known: AHashSet<&str> = kept.iter().map(|(id, _, _)| id.as_str()).collect();

        let edges: Vec<GraphEdge> = self
            .edges
            .into_iter()
            .enumerate()
            .filter_map(|(index, edge)| {
                let source = edge.source.as_str()?;
                let target = edge.target.as_str()?;
                if !known.contains(source) || !known.contains(target) {
                    return None;
                }
                let id = edge
                    .id
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("edge_{}", index));
                let mut built = GraphEdge::new(id, source, target);
                built.source_handle = edge.source_handle;
                built.label = edge.label.filter(|l| !l.is_empty());
                Some(built)
            })
            .collect();

        // Second pass: resolve the still-ambiguous kinds from topology.
        let role_nodes: Vec<RoleNode<'_>> = kept
            .iter()
            .map(|(id, kind, data)| RoleNode {
                id,
                is_start: data.is_start.unwrap_or(false),
                kind: *kind,
            })
            .collect();
        let role_edges: Vec<RoleEdge<'_>> = edges
            .iter()
            .map(|e| RoleEdge {
                source: &e.source,
                target: &e.target,
                label: e.label.as_deref(),
            })
            .collect();

        let nodes: Vec<GraphNode> = kept
            .iter()
            .map(|(id, kind, data)| {
                let kind = kind.unwrap_or_else(|| classify(id, &role_nodes, &role_edges));
                GraphNode {
                    id: id.clone(),
                    is_start: data.is_start.unwrap_or(false),
                    data: build_data(kind, data),
                }
            })
            .collect();

        Ok(Graph::new(nodes, edges))
    }
}

/// Maps the editor's kind strings onto [`NodeKind`], tolerating the case and
/// separator variations that show up in exports.
pub fn parse_kind(raw: &str) -> Option<NodeKind> {
    let folded: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    match folded.as_str() {
        "greeting" | "greetingnode" => Some(NodeKind::Greeting),
        "question" | "questionnode" => Some(NodeKind::Question),
        "response" | "responsenode" => Some(NodeKind::Response),
        "customerresponse" | "customerresponsenode" => Some(NodeKind::CustomerResponse),
        "conditional" | "conditionalnode" => Some(NodeKind::Conditional),
        "transfer" | "transfercall" | "transfernode" => Some(NodeKind::Transfer),
        "webhook" | "webhooknode" => Some(NodeKind::Webhook),
        "endcall" | "end" | "endcallnode" => Some(NodeKind::EndCall),
        _ => None,
    }
}

fn build_data(kind: NodeKind, data: &EditorNodeData) -> NodeData {
    let text = data.text.clone().unwrap_or_default();
    let extracted = data.extracted_variables.clone().unwrap_or_default();
    match kind {
        NodeKind::Greeting => NodeData::Greeting {
            text,
            extracted_variables: extracted,
        },
        NodeKind::Question => NodeData::Question {
            text,
            extracted_variables: extracted,
        },
        NodeKind::Response => NodeData::Response {
            text,
            extracted_variables: extracted,
        },
        NodeKind::CustomerResponse => NodeData::CustomerResponse {
            text,
            options: data.options.clone().unwrap_or_default(),
            variable_name: data
                .variable_name
                .clone()
                .unwrap_or_else(|| crate::compiler::DEFAULT_VARIABLE.to_string()),
            variable_type: data
                .variable_type
                .clone()
                .unwrap_or_else(|| "string".to_string()),
            is_open_ended: data.is_open_ended.unwrap_or(false),
        },
        NodeKind::Conditional => NodeData::Conditional {
            condition: build_condition(data),
            true_label: data.true_label.clone(),
            false_label: data.false_label.clone(),
        },
        NodeKind::Transfer => NodeData::Transfer {
            text,
            transfer_number: data.transfer_number.clone().unwrap_or_default(),
            transfer_kind: match data.transfer_type.as_deref() {
                Some("warm") => TransferKind::Warm,
                _ => TransferKind::Cold,
            },
        },
        NodeKind::Webhook => NodeData::Webhook {
            text,
            url: data.url.clone().unwrap_or_default(),
            method: data.method.clone().unwrap_or_else(|| "POST".to_string()),
            body_template: data.body_template.clone().unwrap_or_default(),
            extract_vars: data.extract_vars.clone().unwrap_or_default(),
        },
        NodeKind::EndCall => NodeData::EndCall { text },
    }
}

/// Structured fields win over the textual expression; an unusable rule is
/// kept raw for the validator to report.
fn build_condition(data: &EditorNodeData) -> Condition {
    // Conditional nodes store their variable under either key, depending on
    // editor version.
    let variable = data.variable.as_ref().or(data.variable_name.as_ref());
    if let (Some(variable), Some(operator), Some(value)) =
        (variable, &data.operator, &data.value)
    {
        if let Some(op) = CompareOp::parse(operator) {
            return Condition::Parsed(Comparison {
                variable: variable.clone(),
                op,
                value: value.clone(),
            });
        }
    }
    Condition::Raw(data.condition.clone().unwrap_or_default())
}
