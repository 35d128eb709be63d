use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::http::Cors;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Environment variable naming a config file to load.
pub const CONFIG_ENV: &str = "NOVINKI_CONFIG";

/// Environment variable overriding the configured provider.
pub const PROVIDER_ENV: &str = "NOVINKI_PROVIDER";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub provider: ProviderKind,
    pub releases: ReleasesConfig,
    pub cors: Cors,
    pub server: ServerConfig,
    pub openai: ChatConfig,
    pub openrouter: ChatConfig,
    pub tmdb: TmdbConfig,
}

/// The upstream that answers requests. Exactly one per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Tmdb,
    OpenRouter,
}

impl ProviderKind {
    /// Environment variable holding this provider's API key.
    pub fn api_key_var(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Tmdb => "TMDB_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Tmdb => "tmdb",
            Self::OpenRouter => "openrouter",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "tmdb" => Ok(Self::Tmdb),
            "openrouter" => Ok(Self::OpenRouter),
            other => Err(CoreError::Config(format!("unknown provider: {other}"))),
        }
    }
}

// Same spelling rules in TOML as in NOVINKI_PROVIDER and --provider.
impl<'de> Deserialize<'de> for ProviderKind {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleasesConfig {
    pub per_kind: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Settings for an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub language: String,
}

impl AppConfig {
    /// Load config from `NOVINKI_CONFIG`, else the platform config dir,
    /// merged over built-in defaults, then apply environment overrides.
    pub fn load() -> Result<Self, CoreError> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_from(Path::new(&path))?,
            None => Self::load_platform(&Self::config_path())?,
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load the platform config file if there is one, else the defaults.
    fn load_platform(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::parse("");
        }
        Self::load_from(path)
    }

    /// Load an explicitly named file merged over the defaults.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Err(CoreError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let user = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Self::parse(&user)
    }

    /// Parse a (possibly partial) TOML document over the defaults.
    pub fn parse(user: &str) -> Result<Self, CoreError> {
        let mut base: toml::Value =
            toml::from_str(DEFAULT_CONFIG).map_err(|e| CoreError::Config(e.to_string()))?;
        let overlay: toml::Value =
            toml::from_str(user).map_err(|e| CoreError::Config(e.to_string()))?;
        merge(&mut base, overlay);

        let config: AppConfig = base
            .try_into()
            .map_err(|e: toml::de::Error| CoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), CoreError> {
        if let Some(provider) = lookup(PROVIDER_ENV).filter(|v| !v.trim().is_empty()) {
            self.provider = provider.parse()?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), CoreError> {
        // A discover page holds 20 results.
        if !(1..=20).contains(&self.releases.per_kind) {
            return Err(CoreError::Config(format!(
                "releases.per_kind must be between 1 and 20, got {}",
                self.releases.per_kind
            )));
        }
        for (name, raw) in [
            ("openai.base_url", &self.openai.base_url),
            ("openrouter.base_url", &self.openrouter.base_url),
            ("tmdb.base_url", &self.tmdb.base_url),
            ("tmdb.image_base_url", &self.tmdb.image_base_url),
        ] {
            url::Url::parse(raw).map_err(|e| CoreError::Config(format!("{name}: {e}")))?;
        }
        Ok(())
    }

    /// Path to the user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "novinki")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

/// Recursively overlay `overlay` tables onto `base`.
fn merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Provider API keys, read from the environment on each request.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub openai: Option<String>,
    pub tmdb: Option<String>,
    pub openrouter: Option<String>,
}

impl ApiKeys {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |kind: ProviderKind| lookup(kind.api_key_var()).filter(|v| !v.is_empty());
        Self {
            openai: get(ProviderKind::OpenAi),
            tmdb: get(ProviderKind::Tmdb),
            openrouter: get(ProviderKind::OpenRouter),
        }
    }

    /// The key for `kind`, or [`CoreError::MissingEnv`].
    pub fn get(&self, kind: ProviderKind) -> Result<&str, CoreError> {
        let key = match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Tmdb => &self.tmdb,
            ProviderKind::OpenRouter => &self.openrouter,
        };
        key.as_deref()
            .ok_or(CoreError::MissingEnv(kind.api_key_var()))
    }
}
