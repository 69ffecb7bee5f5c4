//! Lore, chat and quest calls.
//!
//! The service answers these endpoints with loosely shaped JSON. Each reply is
//! resolved once into an [`AuxReply`] here, so callers match on variants
//! instead of probing keys. Each call degrades on its own; none of them touch
//! the main saga bundle.

use crate::service::GenerationService;
use saga_core::tasks::TaskList;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

pub const DEFAULT_HISTORY_TURNS: usize = 5;

const CONFUSED_PREFIX: &str = "The maesters are confused.";

/// Explanation of one module, in lore and in plain terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lore {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub lore: String,
    #[serde(default)]
    pub technical_explanation: String,
    #[serde(default)]
    pub key_files: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_code: Option<String>,
    #[serde(default)]
    pub issues: Vec<String>,
}

impl ChatReply {
    fn confused(detail: impl std::fmt::Display) -> Self {
        Self {
            reply: format!("{CONFUSED_PREFIX} (Error: {detail})"),
            ..Self::default()
        }
    }
}

/// An improvement opportunity phrased as a quest, with a matching issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quest_rank: Option<String>,
    #[serde(default)]
    pub quest_name: String,
    #[serde(default)]
    pub issue_title: String,
    #[serde(default)]
    pub issue_body: String,
    #[serde(default)]
    pub reward: String,
}

impl Quest {
    /// Stand-in quest when scouting fails.
    pub fn long_night() -> Self {
        Self {
            quest_rank: None,
            quest_name: "The Long Night".to_string(),
            issue_title: "Manual Inspection Required".to_string(),
            issue_body: "The scouts returned no report.".to_string(),
            reward: "0 Gold".to_string(),
        }
    }
}

/// One earlier exchange in a chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user: String,
    pub ai: String,
}

/// A JSON reply from an auxiliary endpoint, resolved by shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum AuxReply {
    Lore(Lore),
    Chat(ChatReply),
    Quests(Vec<Quest>),
    Tasks(TaskList),
    /// The service answered `{"error": ..}`.
    ServiceError(String),
    FreeText(String),
}

impl AuxReply {
    /// Resolve a reply by its shape.
    ///
    /// Objects are checked for `error`, `quests`, `tasks`, `reply` and `lore`
    /// in that order. A bare array is a quest list. Anything that fits none of
    /// these, or fits one only by key but not by content, is free text.
    pub fn from_value(value: Value) -> Self {
        let resolved = match &value {
            Value::String(text) => Some(Self::FreeText(text.clone())),
            Value::Array(_) => quests_from(value.clone()).map(Self::Quests),
            Value::Object(map) => Self::from_object(map),
            _ => None,
        };
        resolved.unwrap_or_else(|| free_text(&value))
    }

    fn from_object(map: &Map<String, Value>) -> Option<Self> {
        if let Some(error) = map.get("error") {
            let message = error
                .as_str()
                .map_or_else(|| error.to_string(), str::to_string);
            return Some(Self::ServiceError(message));
        }
        if let Some(quests) = map.get("quests") {
            return quests_from(quests.clone()).map(Self::Quests);
        }
        if map.contains_key("tasks") {
            return serde_json::from_value(Value::Object(map.clone()))
                .ok()
                .map(Self::Tasks);
        }
        if let Some(reply) = map.get("reply") {
            return Some(Self::Chat(chat_from(reply, map)));
        }
        if map.contains_key("lore") {
            return serde_json::from_value(Value::Object(map.clone()))
                .ok()
                .map(Self::Lore);
        }
        None
    }

    /// Variant name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Lore(_) => "lore",
            Self::Chat(_) => "chat",
            Self::Quests(_) => "quests",
            Self::Tasks(_) => "tasks",
            Self::ServiceError(_) => "service_error",
            Self::FreeText(_) => "free_text",
        }
    }
}

fn free_text(value: &Value) -> AuxReply {
    AuxReply::FreeText(value.to_string())
}

fn quests_from(value: Value) -> Option<Vec<Quest>> {
    serde_json::from_value(value).ok()
}

/// `fixed_code` and `issues` are optional and often malformed; take what fits.
fn chat_from(reply: &Value, map: &Map<String, Value>) -> ChatReply {
    let reply = reply
        .as_str()
        .map_or_else(|| reply.to_string(), str::to_string);
    let fixed_code = map
        .get("fixed_code")
        .and_then(Value::as_str)
        .filter(|code| !code.trim().is_empty())
        .map(str::to_string);
    let issues = map
        .get("issues")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_string))
                .collect()
        })
        .unwrap_or_default();

    ChatReply {
        reply,
        fixed_code,
        issues,
    }
}

/// Ask for the lore of one module. Transport failures come back as
/// [`AuxReply::ServiceError`].
pub fn consult_master<S>(service: &S, repo_url: &str, node_path: &str) -> AuxReply
where
    S: GenerationService + ?Sized,
{
    let body = json!({ "repoUrl": repo_url, "nodePath": node_path });
    match service.call_json("consult_master", &body) {
        Ok(value) => {
            let reply = AuxReply::from_value(value);
            tracing::debug!(kind = reply.kind(), node_path, "consult reply");
            reply
        }
        Err(e) => {
            tracing::warn!(error = %e, node_path, "consult failed");
            AuxReply::ServiceError(e.to_string())
        }
    }
}

/// Send one chat message along with the last `history_turns` turns.
///
/// Never fails: errors become an in-character reply.
pub fn chat_with_tyrion<S>(
    service: &S,
    repo_url: &str,
    message: &str,
    history: &[ChatTurn],
    file_path: Option<&str>,
    history_turns: usize,
) -> ChatReply
where
    S: GenerationService + ?Sized,
{
    let recent = &history[history.len().saturating_sub(history_turns)..];
    let body = json!({
        "repoUrl": repo_url,
        "message": message,
        "history": recent,
        "filePath": file_path,
    });

    match service.call_json("chat_with_tyrion", &body).map(AuxReply::from_value) {
        Ok(AuxReply::Chat(reply)) => reply,
        Ok(AuxReply::FreeText(text)) => ChatReply {
            reply: text,
            ..ChatReply::default()
        },
        Ok(AuxReply::ServiceError(error)) => ChatReply::confused(error),
        Ok(other) => ChatReply::confused(format!("unexpected {} reply", other.kind())),
        Err(e) => {
            tracing::warn!(error = %e, "chat failed");
            ChatReply::confused(e)
        }
    }
}

/// Scout one module for improvement quests.
///
/// Any failure yields the single "The Long Night" quest.
pub fn scout_quests<S>(service: &S, repo_url: &str, node_path: &str) -> Vec<Quest>
where
    S: GenerationService + ?Sized,
{
    let body = json!({ "repoUrl": repo_url, "nodePath": node_path });
    match service.call_json("scout_quests", &body).map(AuxReply::from_value) {
        Ok(AuxReply::Quests(quests)) => quests,
        Ok(other) => {
            tracing::warn!(kind = other.kind(), node_path, "scouts returned no quests");
            vec![Quest::long_night()]
        }
        Err(e) => {
            tracing::warn!(error = %e, node_path, "scouting failed");
            vec![Quest::long_night()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lore_object() {
        let reply = AuxReply::from_value(json!({
            "title": "The Iron Bank",
            "lore": "The Iron Bank will have its due.",
            "technical_explanation": "Payment processing.",
            "key_files": ["src/payments.rs"]
        }));
        let AuxReply::Lore(lore) = reply else {
            panic!("expected lore, got {:?}", reply);
        };
        assert_eq!(lore.title, "The Iron Bank");
        assert_eq!(lore.key_files, vec!["src/payments.rs"]);
    }

    #[test]
    fn test_error_key_wins() {
        let reply = AuxReply::from_value(json!({"error": "quota exceeded", "lore": "x"}));
        assert_eq!(reply, AuxReply::ServiceError("quota exceeded".to_string()));
    }

    #[test]
    fn test_bare_array_is_quest_list() {
        let reply = AuxReply::from_value(json!([
            {"quest_rank": "Easy", "quest_name": "Fortify the Gate",
             "issue_title": "Add auth checks", "issue_body": "...", "reward": "100 Gold"}
        ]));
        let AuxReply::Quests(quests) = reply else {
            panic!("expected quests");
        };
        assert_eq!(quests[0].quest_rank.as_deref(), Some("Easy"));
    }

    #[test]
    fn test_wrapped_quest_list() {
        let reply = AuxReply::from_value(json!({"quests": []}));
        assert_eq!(reply, AuxReply::Quests(Vec::new()));
    }

    #[test]
    fn test_task_object() {
        let reply = AuxReply::from_value(json!({"tasks": [{
            "title": "Fix typo", "description": "README", "difficulty": 1
        }]}));
        let AuxReply::Tasks(list) = reply else {
            panic!("expected tasks");
        };
        assert_eq!(list.tasks[0].difficulty, 1);
    }

    #[test]
    fn test_malformed_tasks_are_free_text() {
        let reply = AuxReply::from_value(json!({"tasks": "none today"}));
        assert_eq!(reply.kind(), "free_text");
    }

    #[test]
    fn test_chat_is_lenient() {
        let reply = AuxReply::from_value(json!({
            "reply": "A Lannister always pays his debts.",
            "fixed_code": null,
            "issues": ["unchecked index", {"line": 4}]
        }));
        let AuxReply::Chat(chat) = reply else {
            panic!("expected chat");
        };
        assert!(chat.fixed_code.is_none());
        assert_eq!(chat.issues, vec!["unchecked index", r#"{"line":4}"#]);
    }

    #[test]
    fn test_unknown_shapes_are_free_text() {
        assert_eq!(
            AuxReply::from_value(json!("plain words")),
            AuxReply::FreeText("plain words".to_string())
        );
        assert_eq!(AuxReply::from_value(json!({"other": 1})).kind(), "free_text");
        assert_eq!(AuxReply::from_value(json!(42)).kind(), "free_text");
        assert_eq!(AuxReply::from_value(json!([1, 2])).kind(), "free_text");
    }

    #[test]
    fn test_serialized_reply_is_tagged() {
        let value = serde_json::to_value(AuxReply::FreeText("hi".to_string())).unwrap();
        assert_eq!(value, json!({"kind": "free_text", "data": "hi"}));
    }

    #[test]
    fn test_confused_reply_names_error() {
        let reply = ChatReply::confused("timeout");
        assert_eq!(reply.reply, "The maesters are confused. (Error: timeout)");
    }
}
