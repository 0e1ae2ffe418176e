use crate::error::{LoadError, SaveError};
use crate::graph::Connection;
use crate::graph::socket::ControlKind;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The persisted document representing one full scenario graph. Persistence
/// is wholesale: saved as one unit, replaced as one unit on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogDefinition {
    pub scenario: ScenarioInfo,
    pub nodes: Vec<NodeDef>,
    pub connections: Vec<Connection>,
}

impl DialogDefinition {
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(|e| LoadError::Json(e.to_string()))
    }

    pub fn to_json_string(&self) -> Result<String, SaveError> {
        serde_json::to_string(self).map_err(|e| SaveError::Json(e.to_string()))
    }
}

/// Scenario metadata carried alongside the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInfo {
    pub language: String,
    pub name: String,
    pub uuid: Uuid,
}

impl ScenarioInfo {
    pub fn new(language: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            name: name.into(),
            uuid: Uuid::new_v4(),
        }
    }
}

/// One persisted node entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDef {
    pub id: String,
    pub position: [f64; 2],
    pub node_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_node_id: Option<String>,
    #[serde(default)]
    pub controls: Vec<ControlDef>,
    #[serde(default)]
    pub inputs: Vec<ControlDef>,
    #[serde(default)]
    pub outputs: Vec<OutputDef>,
}

/// One persisted control or input-socket entry. Inputs reuse this shape; an
/// input without a `type` is a plain socket carrying no control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlDef {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub control_type: Option<ControlKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,
}

/// One persisted output-socket entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDef {
    pub name: String,
}
