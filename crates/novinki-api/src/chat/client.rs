use chrono::NaiveDate;
use reqwest::Client;

use novinki_core::config::ChatConfig;
use novinki_core::models::ReleaseItem;

use super::error::ChatError;
use super::prompt;
use super::types::{parse_items, ChatMessage, ChatRequest, ChatResponse};
use crate::traits::ReleaseProvider;

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
///
/// The same wire format serves OpenAI directly and the OpenRouter gateway;
/// they differ only in base URL, model name and OpenRouter's optional
/// attribution headers.
pub struct ChatClient {
    name: &'static str,
    http: Client,
    api_key: String,
    config: ChatConfig,
    per_kind: usize,
    extra_headers: Vec<(&'static str, String)>,
}

impl ChatClient {
    pub fn openai(http: Client, api_key: String, config: ChatConfig, per_kind: usize) -> Self {
        Self {
            name: "openai",
            http,
            api_key,
            config,
            per_kind,
            extra_headers: Vec::new(),
        }
    }

    pub fn openrouter(
        http: Client,
        api_key: String,
        config: ChatConfig,
        per_kind: usize,
    ) -> Self {
        let mut extra_headers = Vec::new();
        if let Some(referer) = config.referer.clone() {
            extra_headers.push(("HTTP-Referer", referer));
        }
        if let Some(title) = config.title.clone() {
            extra_headers.push(("X-Title", title));
        }
        Self {
            name: "openrouter",
            http,
            api_key,
            config,
            per_kind,
            extra_headers,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    async fn check_response(
        &self,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, ChatError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(provider = self.name, status, "chat completion failed");
            Err(ChatError::Api {
                status,
                message: body,
            })
        }
    }

    /// Send `messages` and return the first choice's text.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let mut request = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body);
        for (name, value) in &self.extra_headers {
            request = request.header(*name, value);
        }

        let resp = request.send().await?;
        let resp = self.check_response(resp).await?;
        let completion: ChatResponse = resp
            .json()
            .await
            .map_err(|e| ChatError::Parse(e.to_string()))?;

        completion.into_content()
    }
}

impl ReleaseProvider for ChatClient {
    type Error = ChatError;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch_releases(&self, today: NaiveDate) -> Result<Vec<ReleaseItem>, ChatError> {
        let messages = prompt::messages(today, self.per_kind);
        tracing::debug!(provider = self.name, model = %self.config.model, "requesting completion");

        let content = self.complete(&messages).await?;
        let items = parse_items(&content)?;

        tracing::info!(provider = self.name, count = items.len(), "parsed releases");
        Ok(items)
    }
}
