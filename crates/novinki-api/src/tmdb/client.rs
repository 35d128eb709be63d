use chrono::{Datelike, NaiveDate};
use reqwest::Client;

use novinki_core::config::TmdbConfig;
use novinki_core::genres::ANIMATION;
use novinki_core::models::{ReleaseItem, ReleaseKind};

use super::error::TmdbError;
use super::types::DiscoverPage;
use crate::traits::ReleaseProvider;

/// How the key is presented to TMDB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// v3 API key, sent as the `api_key` query parameter.
    ApiKey(String),
    /// v4 read access token (a JWT), sent as a bearer token.
    Bearer(String),
}

impl Credential {
    pub fn detect(key: String) -> Self {
        if key.starts_with("eyJ") {
            Self::Bearer(key)
        } else {
            Self::ApiKey(key)
        }
    }
}

/// TMDB v3 client limited to the discover endpoints.
pub struct TmdbClient {
    http: Client,
    credential: Credential,
    config: TmdbConfig,
    per_kind: usize,
}

impl TmdbClient {
    pub fn new(http: Client, api_key: String, config: TmdbConfig, per_kind: usize) -> Self {
        Self {
            http,
            credential: Credential::detect(api_key),
            config,
            per_kind,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TmdbError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "TMDB API error");
            return Err(TmdbError::Api {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json()
            .await
            .map_err(|e| TmdbError::Parse(e.to_string()))
    }

    /// Run one discover query, sorted by popularity, first page only.
    async fn discover(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<DiscoverPage, TmdbError> {
        let mut request = self.http.get(self.url(path)).query(&[
            ("language", self.config.language.as_str()),
            ("sort_by", "popularity.desc"),
            ("page", "1"),
        ]);
        request = request.query(params);
        request = match &self.credential {
            Credential::ApiKey(key) => request.query(&[("api_key", key)]),
            Credential::Bearer(token) => request.bearer_auth(token),
        };

        let response = request.header("Accept", "application/json").send().await?;
        Self::handle_response(response).await
    }

    /// Popular non-animated movies released between `from` and `to`.
    pub async fn discover_films(
        &self,
        from: &str,
        to: &str,
    ) -> Result<DiscoverPage, TmdbError> {
        self.discover(
            "/discover/movie",
            &[
                ("primary_release_date.gte", from.to_string()),
                ("primary_release_date.lte", to.to_string()),
                ("without_genres", ANIMATION.to_string()),
            ],
        )
        .await
    }

    /// Popular animated movies released between `from` and `to`.
    pub async fn discover_cartoons(
        &self,
        from: &str,
        to: &str,
    ) -> Result<DiscoverPage, TmdbError> {
        self.discover(
            "/discover/movie",
            &[
                ("primary_release_date.gte", from.to_string()),
                ("primary_release_date.lte", to.to_string()),
                ("with_genres", ANIMATION.to_string()),
            ],
        )
        .await
    }

    /// Popular TV series first aired between `from` and `to`.
    pub async fn discover_series(
        &self,
        from: &str,
        to: &str,
    ) -> Result<DiscoverPage, TmdbError> {
        self.discover(
            "/discover/tv",
            &[
                ("first_air_date.gte", from.to_string()),
                ("first_air_date.lte", to.to_string()),
            ],
        )
        .await
    }
}

impl ReleaseProvider for TmdbClient {
    type Error = TmdbError;

    fn name(&self) -> &'static str {
        "tmdb"
    }

    async fn fetch_releases(&self, today: NaiveDate) -> Result<Vec<ReleaseItem>, TmdbError> {
        let from = format!("{}-01-01", today.year());
        let to = today.format("%Y-%m-%d").to_string();

        let (films, series, cartoons) = futures::try_join!(
            self.discover_films(&from, &to),
            self.discover_series(&from, &to),
            self.discover_cartoons(&from, &to),
        )?;

        let images = self.config.image_base_url.as_str();
        let n = self.per_kind;
        let mut items = Vec::with_capacity(n * 3);
        items.extend(
            films
                .results
                .into_iter()
                .take(n)
                .map(|m| m.into_movie_item(ReleaseKind::Film, images)),
        );
        items.extend(
            series
                .results
                .into_iter()
                .take(n)
                .map(|s| s.into_series_item(images)),
        );
        items.extend(
            cartoons
                .results
                .into_iter()
                .take(n)
                .map(|m| m.into_movie_item(ReleaseKind::Cartoon, images)),
        );

        tracing::info!(provider = "tmdb", count = items.len(), "mapped releases");
        Ok(items)
    }
}
