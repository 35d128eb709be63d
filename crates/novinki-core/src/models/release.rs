use serde::{Deserialize, Deserializer, Serialize};

/// What kind of release an item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseKind {
    #[serde(alias = "movie")]
    Film,
    #[serde(alias = "tv", alias = "show")]
    Series,
    #[serde(alias = "animation", alias = "animated")]
    Cartoon,
}

impl ReleaseKind {
    /// Russian display label shown on release cards.
    pub fn label(self) -> &'static str {
        match self {
            Self::Film => "Фильм",
            Self::Series => "Сериал",
            Self::Cartoon => "Мультфильм",
        }
    }
}

impl std::fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Film => write!(f, "film"),
            Self::Series => write!(f, "series"),
            Self::Cartoon => write!(f, "cartoon"),
        }
    }
}

/// One normalized release, identical in shape across all providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(rename = "type")]
    pub kind: ReleaseKind,
    #[serde(default, deserialize_with = "de_year")]
    pub year: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "de_rating")]
    pub rating: String,
    /// Only the metadata provider knows poster URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

/// The response body: `{"items": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleasesBody {
    pub items: Vec<ReleaseItem>,
}

impl ReleasesBody {
    pub fn new(items: Vec<ReleaseItem>) -> Self {
        Self { items }
    }
}

/// Format a 0-10 score the way release cards show it, e.g. `7.4/10`.
/// Halves round away from zero (`6.25` → `6.3/10`).
pub fn format_rating(score: f64) -> String {
    format!("{:.1}/10", (score * 10.0).round() / 10.0)
}

// LLMs are inconsistent about quoting numbers, so year and rating accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Int(i64),
    Float(f64),
}

fn de_year<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Option::<Loose>::deserialize(d)? {
        Some(Loose::Text(s)) => s,
        Some(Loose::Int(n)) => n.to_string(),
        Some(Loose::Float(f)) => (f.trunc() as i64).to_string(),
        None => String::new(),
    })
}

fn de_rating<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Option::<Loose>::deserialize(d)? {
        Some(Loose::Text(s)) => s,
        Some(Loose::Int(n)) => format_rating(n as f64),
        Some(Loose::Float(f)) => format_rating(f),
        None => String::new(),
    })
}
