use serde::{Deserialize, Serialize};
use std::fmt;

/// The specific role a node plays in a conversation flow.
///
/// The external pathway format only knows a coarser vocabulary
/// (`Default` / `End Call` / `Transfer Call` / `Webhook`); the richer roles
/// here drive the compilation pipeline and are inferred from topology when a
/// document is imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Greeting,
    Question,
    Response,
    CustomerResponse,
    Conditional,
    Transfer,
    Webhook,
    EndCall,
}

impl NodeKind {
    /// Terminal nodes end the call; everything else must lead somewhere.
    pub fn is_terminal(self) -> bool {
        matches!(self, NodeKind::EndCall)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Greeting => "Greeting",
            NodeKind::Question => "Question",
            NodeKind::Response => "Response",
            NodeKind::CustomerResponse => "Customer Response",
            NodeKind::Conditional => "Conditional",
            NodeKind::Transfer => "Transfer Call",
            NodeKind::Webhook => "Webhook",
            NodeKind::EndCall => "End Call",
        };
        write!(f, "{}", name)
    }
}

/// Comparison operator used by conditional nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
}

impl CompareOp {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Le),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Ge),
            "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            _ => None,
        }
    }

    /// The logical negation of the operator (`<=` becomes `>`, and so on).
    pub fn negate(self) -> Self {
        match self {
            CompareOp::Lt => CompareOp::Ge,
            CompareOp::Le => CompareOp::Gt,
            CompareOp::Gt => CompareOp::Le,
            CompareOp::Ge => CompareOp::Lt,
            CompareOp::Eq => CompareOp::Ne,
            CompareOp::Ne => CompareOp::Eq,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single comparison against a previously captured variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub variable: String,
    pub op: CompareOp,
    pub value: String,
}

impl Comparison {
    /// The edge label used for the branch where the comparison holds,
    /// e.g. `Age<=65`.
    pub fn label(&self) -> String {
        format!("{}{}{}", self.variable, self.op, self.value)
    }

    /// The edge label for the opposite branch, e.g. `Age>65`.
    pub fn negated_label(&self) -> String {
        format!("{}{}{}", self.variable, self.op.negate(), self.value)
    }
}

/// A conditional node's branching rule.
///
/// The editor may author the rule either as structured fields or as a free
/// text expression (`if (Age <= 65) { True } else { False }`). The raw form
/// stays raw until the eliminator parses it; an unparseable expression leaves
/// the node in place and is reported by the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    Parsed(Comparison),
    Raw(String),
}

/// Whether a transfer announces the caller before connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferKind {
    Warm,
    Cold,
}

/// A variable a webhook node extracts from its response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookVar {
    pub name: String,
    #[serde(default, rename = "type")]
    pub var_type: String,
    #[serde(default)]
    pub description: String,
}

/// Kind-specific node payload.
///
/// Every consumption site matches exhaustively on this; there are no
/// optional-field probes anywhere downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum NodeData {
    Greeting {
        #[serde(default)]
        text: String,
        #[serde(default, rename = "extractedVariables")]
        extracted_variables: Vec<String>,
    },
    Question {
        #[serde(default)]
        text: String,
        #[serde(default, rename = "extractedVariables")]
        extracted_variables: Vec<String>,
    },
    Response {
        #[serde(default)]
        text: String,
        #[serde(default, rename = "extractedVariables")]
        extracted_variables: Vec<String>,
    },
    CustomerResponse {
        #[serde(default)]
        text: String,
        #[serde(default)]
        options: Vec<String>,
        #[serde(default, rename = "variableName")]
        variable_name: String,
        #[serde(default, rename = "variableType")]
        variable_type: String,
        #[serde(default, rename = "isOpenEnded")]
        is_open_ended: bool,
    },
    Conditional {
        condition: Condition,
        #[serde(default, rename = "trueLabel", skip_serializing_if = "Option::is_none")]
        true_label: Option<String>,
        #[serde(default, rename = "falseLabel", skip_serializing_if = "Option::is_none")]
        false_label: Option<String>,
    },
    Transfer {
        #[serde(default)]
        text: String,
        #[serde(default, rename = "transferNumber")]
        transfer_number: String,
        #[serde(rename = "transferType")]
        transfer_kind: TransferKind,
    },
    Webhook {
        #[serde(default)]
        text: String,
        #[serde(default)]
        url: String,
        #[serde(default)]
        method: String,
        #[serde(default, rename = "bodyTemplate")]
        body_template: String,
        #[serde(default, rename = "extractVars")]
        extract_vars: Vec<WebhookVar>,
    },
    EndCall {
        #[serde(default)]
        text: String,
    },
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Greeting { .. } => NodeKind::Greeting,
            NodeData::Question { .. } => NodeKind::Question,
            NodeData::Response { .. } => NodeKind::Response,
            NodeData::CustomerResponse { .. } => NodeKind::CustomerResponse,
            NodeData::Conditional { .. } => NodeKind::Conditional,
            NodeData::Transfer { .. } => NodeKind::Transfer,
            NodeData::Webhook { .. } => NodeKind::Webhook,
            NodeData::EndCall { .. } => NodeKind::EndCall,
        }
    }

    /// The node's display text. Conditional nodes carry no spoken text.
    pub fn text(&self) -> Option<&str> {
        match self {
            NodeData::Greeting { text, .. }
            | NodeData::Question { text, .. }
            | NodeData::Response { text, .. }
            | NodeData::CustomerResponse { text, .. }
            | NodeData::Transfer { text, .. }
            | NodeData::Webhook { text, .. }
            | NodeData::EndCall { text } => Some(text),
            NodeData::Conditional { .. } => None,
        }
    }

    /// Replaces the display text, if this kind of node has one.
    pub fn set_text(&mut self, new_text: String) {
        match self {
            NodeData::Greeting { text, .. }
            | NodeData::Question { text, .. }
            | NodeData::Response { text, .. }
            | NodeData::CustomerResponse { text, .. }
            | NodeData::Transfer { text, .. }
            | NodeData::Webhook { text, .. }
            | NodeData::EndCall { text } => *text = new_text,
            NodeData::Conditional { .. } => {}
        }
    }
}

/// A single node in the conversation graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(default, rename = "isStart")]
    pub is_start: bool,
    pub data: NodeData,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, data: NodeData) -> Self {
        Self {
            id: id.into(),
            is_start: false,
            data,
        }
    }

    /// A node flagged as the conversation's entry point.
    pub fn start(id: impl Into<String>, data: NodeData) -> Self {
        Self {
            id: id.into(),
            is_start: true,
            data,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }
}
