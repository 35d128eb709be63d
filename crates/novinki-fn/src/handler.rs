use chrono::NaiveDate;
use reqwest::Client;

use novinki_core::config::{ApiKeys, AppConfig};
use novinki_core::http::{HttpEvent, HttpResponse, Method};
use novinki_core::models::{ReleaseItem, ReleasesBody};

use crate::error::HandlerError;
use crate::provider::Provider;

/// Where provider keys come from.
#[derive(Debug, Clone)]
pub enum KeySource {
    /// Read the environment on every request.
    Env,
    Fixed(ApiKeys),
}

impl KeySource {
    fn keys(&self) -> ApiKeys {
        match self {
            Self::Env => ApiKeys::from_env(),
            Self::Fixed(keys) => keys.clone(),
        }
    }
}

/// The release-list function.
///
/// Holds no per-request state; one instance serves every invocation.
pub struct Handler {
    config: AppConfig,
    keys: KeySource,
    http: Client,
}

impl Handler {
    pub fn new(config: AppConfig, keys: KeySource) -> Result<Self, HandlerError> {
        let http = Client::builder()
            .user_agent(concat!("novinki/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, keys, http })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Handle one event.
    ///
    /// `OPTIONS` is answered without touching the upstream. Upstream and
    /// configuration failures come back as `Err`.
    pub async fn handle(&self, event: &HttpEvent) -> Result<HttpResponse, HandlerError> {
        let cors = &self.config.cors;
        match event.method() {
            Method::Options => Ok(cors.preflight()),
            Method::Get | Method::Post => {
                let items = self.fetch(today()).await?;
                let body = serde_json::to_string(&ReleasesBody::new(items))?;
                Ok(cors.json(200, body))
            }
            Method::Other(method) => {
                tracing::debug!(%method, "rejecting method");
                Ok(cors.method_not_allowed(&method))
            }
        }
    }

    /// [`handle`](Self::handle), with failures turned into a 500 response.
    pub async fn respond(&self, event: &HttpEvent) -> HttpResponse {
        match self.handle(event).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!(provider = %self.config.provider, error = %e, "request failed");
                self.config.cors.internal_error(&e.to_string())
            }
        }
    }

    /// Fetch releases from the configured provider.
    pub async fn fetch(&self, today: NaiveDate) -> Result<Vec<ReleaseItem>, HandlerError> {
        let provider = Provider::build(&self.config, &self.keys.keys(), &self.http)?;
        tracing::info!(provider = provider.name(), %today, "fetching releases");
        provider.fetch_releases(today).await
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use novinki_core::config::ProviderKind;
    use novinki_core::CoreError;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn no_keys() -> KeySource {
        KeySource::Fixed(ApiKeys::default())
    }

    fn keys() -> KeySource {
        KeySource::Fixed(ApiKeys {
            openai: Some("sk-test".into()),
            tmdb: Some("tmdb-test".into()),
            openrouter: Some("or-test".into()),
        })
    }

    const LLM_CONTENT: &str = r#"[
        {"title": "Фильм", "original_title": "Film", "type": "film", "year": "2025",
         "genre": "Драма", "description": "Описание.", "rating": "7.5/10"},
        {"title": "Сериал", "original_title": "Series", "type": "series", "year": 2025,
         "genre": "Комедия", "description": "Описание.", "rating": "8.0/10"}
    ]"#;

    async fn chat_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": LLM_CONTENT}}]
            })))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_options_needs_no_key() {
        let handler = Handler::new(AppConfig::default(), no_keys()).unwrap();
        let resp = handler.handle(&HttpEvent::new("OPTIONS")).await.unwrap();
        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.body, "");
        assert_eq!(resp.header("Access-Control-Max-Age"), Some("86400"));
    }

    #[tokio::test]
    async fn test_get_openai() {
        let server = chat_server().await;
        let mut config = AppConfig::default();
        config.openai.base_url = server.uri();
        let handler = Handler::new(config, keys()).unwrap();

        let resp = handler.handle(&HttpEvent::new("GET")).await.unwrap();
        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.header("Content-Type"), Some("application/json"));
        assert_eq!(resp.header("Access-Control-Allow-Origin"), Some("*"));

        let body: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["type"], "series");
        assert_eq!(items[1]["year"], "2025");
        assert!(items[0].get("poster").is_none());
        // Cyrillic stays readable in the body.
        assert!(resp.body.contains("Фильм"));
    }

    #[tokio::test]
    async fn test_post_openrouter() {
        let server = chat_server().await;
        let mut config = AppConfig::default();
        config.provider = ProviderKind::OpenRouter;
        config.openrouter.base_url = server.uri();
        let handler = Handler::new(config, keys()).unwrap();

        let resp = handler.handle(&HttpEvent::new("POST")).await.unwrap();
        assert_eq!(resp.status_code, 200);
    }

    #[tokio::test]
    async fn test_get_tmdb() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/discover/tv"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"name": "Сериал", "original_name": "Series",
                             "first_air_date": "2025-01-10", "genre_ids": [35],
                             "vote_average": 6.66, "poster_path": "/s.jpg"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/discover/movie"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .mount(&server)
            .await;

        let mut config = AppConfig::default();
        config.provider = ProviderKind::Tmdb;
        config.tmdb.base_url = server.uri();
        let handler = Handler::new(config, keys()).unwrap();

        let resp = handler.handle(&HttpEvent::new("GET")).await.unwrap();
        let body: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(
            body,
            json!({"items": [{
                "title": "Сериал",
                "original_title": "Series",
                "type": "series",
                "year": "2025",
                "genre": "Комедия",
                "description": "Описание отсутствует.",
                "rating": "6.7/10",
                "poster": "https://image.tmdb.org/t/p/w500/s.jpg"
            }]})
        );
    }

    #[tokio::test]
    async fn test_missing_key_propagates() {
        let handler = Handler::new(AppConfig::default(), no_keys()).unwrap();
        let err = handler.handle(&HttpEvent::new("GET")).await.unwrap_err();
        assert!(matches!(
            err,
            HandlerError::Config(CoreError::MissingEnv("OPENAI_API_KEY"))
        ));

        let resp = handler.respond(&HttpEvent::new("GET")).await;
        assert_eq!(resp.status_code, 500);
        assert_eq!(resp.header("Access-Control-Allow-Origin"), Some("*"));
        assert!(resp.body.contains("OPENAI_API_KEY"));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;
        let mut config = AppConfig::default();
        config.openai.base_url = server.uri();
        let handler = Handler::new(config, keys()).unwrap();

        assert!(matches!(
            handler.handle(&HttpEvent::new("GET")).await,
            Err(HandlerError::Chat(_))
        ));
        assert_eq!(handler.respond(&HttpEvent::new("GET")).await.status_code, 500);
    }

    #[tokio::test]
    async fn test_other_methods_rejected() {
        let handler = Handler::new(AppConfig::default(), no_keys()).unwrap();
        let resp = handler.handle(&HttpEvent::new("DELETE")).await.unwrap();
        assert_eq!(resp.status_code, 405);
        assert_eq!(resp.header("Allow"), Some("GET, POST, OPTIONS"));
    }
}
