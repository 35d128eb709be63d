use serde::Deserialize;

use novinki_core::genres;
use novinki_core::models::{format_rating, ReleaseItem, ReleaseKind};

pub const NO_DESCRIPTION: &str = "Описание отсутствует.";
pub const NO_RATING: &str = "нет оценки";

/// Poster width requested from the image CDN.
const POSTER_SIZE: &str = "w500";

// ── Discover responses ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DiscoverPage {
    #[serde(default)]
    pub results: Vec<DiscoverItem>,
}

/// A movie or TV result. Movies fill `title`/`release_date`, TV fills
/// `name`/`first_air_date`.
#[derive(Debug, Default, Deserialize)]
pub struct DiscoverItem {
    pub title: Option<String>,
    pub name: Option<String>,
    pub original_title: Option<String>,
    pub original_name: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    pub poster_path: Option<String>,
}

// ── Conversions to release items ────────────────────────────────

impl DiscoverItem {
    /// Map a `/discover/movie` result. `kind` is film or cartoon.
    pub fn into_movie_item(self, kind: ReleaseKind, image_base_url: &str) -> ReleaseItem {
        ReleaseItem {
            title: first_non_empty(self.title, self.name),
            original_title: first_non_empty(self.original_title, self.original_name),
            kind,
            year: year_of(self.release_date.as_deref()),
            genre: genres::movie_label(&self.genre_ids).to_string(),
            description: description(self.overview),
            rating: rating(self.vote_average),
            poster: poster_url(image_base_url, self.poster_path.as_deref()),
        }
    }

    /// Map a `/discover/tv` result.
    pub fn into_series_item(self, image_base_url: &str) -> ReleaseItem {
        ReleaseItem {
            title: self.name.unwrap_or_default(),
            original_title: self.original_name.unwrap_or_default(),
            kind: ReleaseKind::Series,
            year: year_of(self.first_air_date.as_deref()),
            genre: genres::tv_label(&self.genre_ids).to_string(),
            description: description(self.overview),
            rating: rating(self.vote_average),
            poster: poster_url(image_base_url, self.poster_path.as_deref()),
        }
    }
}

fn first_non_empty(a: Option<String>, b: Option<String>) -> String {
    a.filter(|s| !s.is_empty()).or(b).unwrap_or_default()
}

/// Year part of an ISO date (`2025-03-14` → `2025`).
fn year_of(date: Option<&str>) -> String {
    date.unwrap_or_default().chars().take(4).collect()
}

fn description(overview: Option<String>) -> String {
    overview
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| NO_DESCRIPTION.to_string())
}

// TMDB reports 0 for titles nobody has voted on yet.
fn rating(vote_average: Option<f64>) -> String {
    match vote_average {
        Some(v) if v > 0.0 => format_rating(v),
        _ => NO_RATING.to_string(),
    }
}

fn poster_url(image_base_url: &str, poster_path: Option<&str>) -> Option<String> {
    poster_path.filter(|p| !p.is_empty()).map(|p| {
        format!(
            "{}/{POSTER_SIZE}{p}",
            image_base_url.trim_end_matches('/')
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGES: &str = "https://image.tmdb.org/t/p";

    #[test]
    fn test_deserialize_movie_page() {
        let json = r#"{
            "page": 1,
            "results": [
                {
                    "adult": false,
                    "backdrop_path": "/bd.jpg",
                    "genre_ids": [878, 12],
                    "id": 693134,
                    "original_language": "en",
                    "original_title": "Dune: Part Two",
                    "overview": "Пол Атрейдес объединяется с Чани и фрименами.",
                    "popularity": 1234.5,
                    "poster_path": "/czembW0Rk1Ke7lCJGahbOhdCuhV.jpg",
                    "release_date": "2024-02-27",
                    "title": "Дюна: Часть вторая",
                    "video": false,
                    "vote_average": 8.16,
                    "vote_count": 5000
                }
            ],
            "total_pages": 500,
            "total_results": 10000
        }"#;

        let page: DiscoverPage = serde_json::from_str(json).unwrap();
        let item = page
            .results
            .into_iter()
            .next()
            .unwrap()
            .into_movie_item(ReleaseKind::Film, IMAGES);

        assert_eq!(item.title, "Дюна: Часть вторая");
        assert_eq!(item.original_title, "Dune: Part Two");
        assert_eq!(item.kind, ReleaseKind::Film);
        assert_eq!(item.year, "2024");
        assert_eq!(item.genre, "Фантастика");
        assert_eq!(item.rating, "8.2/10");
        assert_eq!(
            item.poster.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/czembW0Rk1Ke7lCJGahbOhdCuhV.jpg")
        );
    }

    #[test]
    fn test_deserialize_tv_result() {
        let json = r#"{
            "genre_ids": [10765, 18],
            "id": 1,
            "name": "Одни из нас",
            "original_name": "The Last of Us",
            "first_air_date": "2023-01-15",
            "overview": "",
            "vote_average": 0,
            "poster_path": null
        }"#;

        let item: DiscoverItem = serde_json::from_str(json).unwrap();
        let item = item.into_series_item(IMAGES);
        assert_eq!(item.kind, ReleaseKind::Series);
        assert_eq!(item.title, "Одни из нас");
        assert_eq!(item.year, "2023");
        assert_eq!(item.genre, "Фантастика");
        assert_eq!(item.description, NO_DESCRIPTION);
        assert_eq!(item.rating, NO_RATING);
        assert!(item.poster.is_none());
    }

    #[test]
    fn test_minimal_movie_uses_fallbacks() {
        let item: DiscoverItem = serde_json::from_str(r#"{ "id": 7 }"#).unwrap();
        let item = item.into_movie_item(ReleaseKind::Cartoon, IMAGES);
        assert_eq!(item.title, "");
        assert_eq!(item.year, "");
        assert_eq!(item.genre, genres::MOVIE_FALLBACK);
        assert_eq!(item.description, NO_DESCRIPTION);
        assert_eq!(item.rating, NO_RATING);
        assert_eq!(item.kind, ReleaseKind::Cartoon);
    }

    #[test]
    fn test_movie_title_falls_back_to_name() {
        let item = DiscoverItem {
            title: Some(String::new()),
            name: Some("Имя".into()),
            original_name: Some("Name".into()),
            ..Default::default()
        };
        let item = item.into_movie_item(ReleaseKind::Film, IMAGES);
        assert_eq!(item.title, "Имя");
        assert_eq!(item.original_title, "Name");
    }

    #[test]
    fn test_rating_rounds_ties_up() {
        for (score, expected) in [(6.25, "6.3/10"), (6.75, "6.8/10"), (8.25, "8.3/10")] {
            let item = DiscoverItem {
                vote_average: Some(score),
                ..Default::default()
            };
            assert_eq!(item.into_movie_item(ReleaseKind::Film, IMAGES).rating, expected);
        }
    }

    #[test]
    fn test_empty_results_default() {
        let page: DiscoverPage = serde_json::from_str("{}").unwrap();
        assert!(page.results.is_empty());
    }
}
