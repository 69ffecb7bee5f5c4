//! Narrative panels ("comic script") that walk a newcomer through the repo.

use serde::{Deserialize, Serialize};

/// Goal attached to every decoded panel; the panel wire format never carries one.
pub const DEFAULT_PANEL_GOAL: &str = "Understand this module";

/// Title used when a panel row leaves the title empty.
pub const UNTITLED_PANEL: &str = "Untitled Panel";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub id: u32,
    pub title: String,
    pub narration: String,
    pub dialog: Vec<String>,
    pub file: String,
    pub snippet: String,
    #[serde(rename = "panel_goal")]
    pub goal: String,
}

/// Ordered sequence of panels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub panels: Vec<Panel>,
}

impl Script {
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }
}
