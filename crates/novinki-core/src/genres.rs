//! TMDB genre id → Russian label tables.
//!
//! TMDB keeps separate genre catalogues for movies and TV, so the same id can
//! mean different things (or nothing) depending on which list it came from.

/// Label used when a movie has no known genre.
pub const MOVIE_FALLBACK: &str = "Кино";

/// Label used when a series has no known genre.
pub const TV_FALLBACK: &str = "Сериал";

/// TMDB's "Animation" movie genre. Splits films from cartoons.
pub const ANIMATION: u32 = 16;

pub fn movie_genre(id: u32) -> Option<&'static str> {
    Some(match id {
        28 => "Экшн",
        12 => "Приключения",
        16 => "Мультфильм",
        35 => "Комедия",
        80 => "Криминал",
        99 => "Документальный",
        18 => "Драма",
        10751 => "Семейный",
        14 => "Фэнтези",
        36 => "История",
        27 => "Ужасы",
        53 => "Триллер",
        878 => "Фантастика",
        10749 => "Романтика",
        37 => "Вестерн",
        _ => return None,
    })
}

pub fn tv_genre(id: u32) -> Option<&'static str> {
    Some(match id {
        10759 => "Экшн",
        35 => "Комедия",
        80 => "Криминал",
        99 => "Документальный",
        18 => "Драма",
        10751 => "Семейный",
        9648 => "Детектив",
        878 | 10765 => "Фантастика",
        10768 => "Война",
        _ => return None,
    })
}

/// Label for the first genre id of a movie, or [`MOVIE_FALLBACK`].
pub fn movie_label(genre_ids: &[u32]) -> &'static str {
    genre_ids
        .first()
        .and_then(|&id| movie_genre(id))
        .unwrap_or(MOVIE_FALLBACK)
}

/// Label for the first genre id of a series, or [`TV_FALLBACK`].
pub fn tv_label(genre_ids: &[u32]) -> &'static str {
    genre_ids
        .first()
        .and_then(|&id| tv_genre(id))
        .unwrap_or(TV_FALLBACK)
}
