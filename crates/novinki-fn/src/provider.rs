use chrono::NaiveDate;
use reqwest::Client;

use novinki_api::{ChatClient, ReleaseProvider, TmdbClient};
use novinki_core::config::{ApiKeys, AppConfig, ProviderKind};
use novinki_core::models::ReleaseItem;

use crate::error::HandlerError;

/// The configured upstream, built fresh for each request.
pub enum Provider {
    OpenAi(ChatClient),
    OpenRouter(ChatClient),
    Tmdb(TmdbClient),
}

impl Provider {
    /// Build the client for `config.provider`. Fails if its key is missing.
    pub fn build(config: &AppConfig, keys: &ApiKeys, http: &Client) -> Result<Self, HandlerError> {
        let kind = config.provider;
        let key = keys.get(kind)?.to_string();
        let per_kind = config.releases.per_kind;

        Ok(match kind {
            ProviderKind::OpenAi => Self::OpenAi(ChatClient::openai(
                http.clone(),
                key,
                config.openai.clone(),
                per_kind,
            )),
            ProviderKind::OpenRouter => Self::OpenRouter(ChatClient::openrouter(
                http.clone(),
                key,
                config.openrouter.clone(),
                per_kind,
            )),
            ProviderKind::Tmdb => Self::Tmdb(TmdbClient::new(
                http.clone(),
                key,
                config.tmdb.clone(),
                per_kind,
            )),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenAi(c) | Self::OpenRouter(c) => c.name(),
            Self::Tmdb(c) => c.name(),
        }
    }

    pub async fn fetch_releases(&self, today: NaiveDate) -> Result<Vec<ReleaseItem>, HandlerError> {
        Ok(match self {
            Self::OpenAi(c) | Self::OpenRouter(c) => c.fetch_releases(today).await?,
            Self::Tmdb(c) => c.fetch_releases(today).await?,
        })
    }
}
