use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

/// The external platform's node vocabulary, coarser than [`NodeKind`].
///
/// [`NodeKind`]: crate::graph::NodeKind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocNodeKind {
    Default,
    #[serde(rename = "End Call")]
    EndCall,
    #[serde(rename = "Transfer Call")]
    TransferCall,
    Webhook,
}

/// Prompt-model tuning attached to every document node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelOptions {
    pub model_type: String,
    pub temperature: f64,
    pub skip_user_response: bool,
    pub block_interruptions: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            model_type: "smart".to_string(),
            temperature: 0.2,
            skip_user_response: false,
            block_interruptions: false,
        }
    }
}

/// A variable declaration on the start node, serialized as the platform's
/// `[name, type, description, false]` tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractVar {
    pub name: String,
    pub var_type: String,
    pub description: String,
}

impl ExtractVar {
    pub fn new(
        name: impl Into<String>,
        var_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            var_type: var_type.into(),
            description: description.into(),
        }
    }
}

impl Serialize for ExtractVar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(4))?;
        seq.serialize_element(&self.name)?;
        seq.serialize_element(&self.var_type)?;
        seq.serialize_element(&self.description)?;
        seq.serialize_element(&false)?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for ExtractVar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = Vec::<serde_json::Value>::deserialize(deserializer)?;
        let name = parts
            .first()
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| de::Error::custom("extract variable entry must start with a name"))?
            .to_string();
        let var_type = parts
            .get(1)
            .and_then(serde_json::Value::as_str)
            .filter(|t| !t.is_empty())
            .unwrap_or("string")
            .to_string();
        let description = parts
            .get(2)
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        Ok(Self {
            name,
            var_type,
            description,
        })
    }
}

/// Data payload of a document node.
///
/// The external schema is a loose bag of per-kind fields; absent fields are
/// omitted from the serialized JSON entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocNodeData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(rename = "isStart", skip_serializing_if = "Option::is_none")]
    pub is_start: Option<bool>,
    #[serde(rename = "extractVars", skip_serializing_if = "Option::is_none")]
    pub extract_vars: Option<Vec<ExtractVar>>,
    #[serde(rename = "extractVarSettings", skip_serializing_if = "Option::is_none")]
    pub extract_var_settings: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(rename = "variableName", skip_serializing_if = "Option::is_none")]
    pub variable_name: Option<String>,
    #[serde(rename = "transferNumber", skip_serializing_if = "Option::is_none")]
    pub transfer_number: Option<String>,
    #[serde(rename = "warmTransferFields", skip_serializing_if = "Option::is_none")]
    pub warm_transfer_fields: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(rename = "modelOptions", skip_serializing_if = "Option::is_none")]
    pub model_options: Option<ModelOptions>,
}

/// A node as the external platform sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DocNodeKind,
    pub data: DocNodeData,
}

impl DocNode {
    pub fn is_start(&self) -> bool {
        self.data.is_start == Some(true)
    }
}
