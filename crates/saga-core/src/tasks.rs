//! Starter tasks suggested to first-time contributors.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarterTask {
    pub title: String,
    pub description: String,
    /// 1 (trivial) to 5 (requires understanding the logic).
    pub difficulty: u8,
    #[serde(default)]
    pub files_to_edit: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests_to_run: Option<String>,
    #[serde(default)]
    pub expected_outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_goals: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    pub tasks: Vec<StarterTask>,
}
