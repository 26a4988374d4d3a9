//! Action API types.

use serde::{Deserialize, Serialize};

/// An invocable action as seen by API callers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Action {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec: Option<ActionExec>,
}

/// What an action runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActionExec {
    #[serde(default)]
    pub kind: String,
    /// Source text handed to the runtime on init.
    #[serde(default)]
    pub code: String,
    /// Runtime image reference. Empty means the default runtime image.
    #[serde(default)]
    pub image: String,
}

/// Body of a create/update request. Name and namespace come from the path.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActionPut {
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec: Option<ActionExec>,
}

impl ActionPut {
    /// Attach a name and namespace.
    pub fn into_action(self, name: &str, namespace: &str) -> Action {
        Action {
            name: name.to_string(),
            namespace: namespace.to_string(),
            version: self.version,
            exec: self.exec,
        }
    }
}

/// Outcome of one synchronous invocation. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activation {
    pub activation_id: String,
    pub name: String,
    pub namespace: String,
    pub response: ActivationResult,
    #[serde(default)]
    pub logs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivationResult {
    pub success: bool,
    pub result: serde_json::Value,
}
