use chrono::{Datelike, NaiveDate};

use super::types::ChatMessage;

pub const SYSTEM_PROMPT: &str = "Ты эксперт по кино. Отвечай ТОЛЬКО валидным JSON без markdown и лишнего текста. \
Формат ответа: массив объектов с полями: \
title (название на русском), \
original_title (оригинальное название), \
type (film/series/cartoon), \
year (год выхода), \
genre (жанр), \
description (краткое описание 1-2 предложения на русском), \
rating (рейтинг IMDb или ожидаемый, строка типа '8.2/10')";

/// Build the user prompt asking for `per_kind` items of each kind.
pub fn user_prompt(today: NaiveDate, per_kind: usize) -> String {
    let year = today.year();
    format!(
        "Сейчас {date}. Дай список из {total} самых ожидаемых или недавно вышедших новинок: \
         {n} {films}, {n} {series} и {n} {cartoons}. \
         Включай реальные тайтлы {prev}-{year} года. Только JSON-массив.",
        date = today.format("%B %Y"),
        total = per_kind * 3,
        n = per_kind,
        films = ru_plural(per_kind, "фильм", "фильма", "фильмов"),
        series = ru_plural(per_kind, "сериал", "сериала", "сериалов"),
        cartoons = ru_plural(per_kind, "мультфильм", "мультфильма", "мультфильмов"),
        prev = year - 1,
    )
}

/// The system + user message pair sent on every request.
pub fn messages(today: NaiveDate, per_kind: usize) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(user_prompt(today, per_kind)),
    ]
}

/// Pick the Russian noun form agreeing with `n` (1 фильм, 3 фильма, 5 фильмов).
fn ru_plural<'a>(n: usize, one: &'a str, few: &'a str, many: &'a str) -> &'a str {
    match (n % 10, n % 100) {
        (1, r) if r != 11 => one,
        (2..=4, r) if !(12..=14).contains(&r) => few,
        _ => many,
    }
}
