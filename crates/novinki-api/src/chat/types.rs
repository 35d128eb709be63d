use serde::{Deserialize, Serialize};

use novinki_core::models::ReleaseItem;

use super::error::ChatError;

// ── Request ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

// ── Response ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice.
    pub fn into_content(self) -> Result<String, ChatError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ChatError::EmptyCompletion)
    }
}

// ── Content parsing ─────────────────────────────────────────────

/// Parse the model's answer into release items.
///
/// Accepts a bare JSON array or `{"items": [...]}`, optionally wrapped in a
/// Markdown code fence.
pub fn parse_items(content: &str) -> Result<Vec<ReleaseItem>, ChatError> {
    let json = strip_fence(content.trim());
    if json.is_empty() {
        return Err(ChatError::EmptyCompletion);
    }

    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| ChatError::Parse(e.to_string()))?;
    let list = match value {
        serde_json::Value::Object(mut obj) => obj
            .remove("items")
            .ok_or_else(|| ChatError::Parse("expected a JSON array of items".into()))?,
        other => other,
    };
    serde_json::from_value(list).map_err(|e| ChatError::Parse(e.to_string()))
}

fn strip_fence(s: &str) -> &str {
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    let rest = rest.trim_end();
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    // The info string (```json) ends at whitespace or where the JSON starts.
    let start = rest
        .find(|c: char| c.is_whitespace() || c == '[' || c == '{')
        .unwrap_or(rest.len());
    rest[start..].trim()
}
