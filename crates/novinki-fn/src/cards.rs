//! Plain-text rendering of releases for the `list` command.

use std::fmt::Write;

use novinki_core::models::ReleaseItem;

/// Render one release as a card:
///
/// ```text
/// Фильм · Драма · 2025 · ★ 7.5/10
/// Название
/// Original Title
/// Описание.
/// ```
pub fn render_card(item: &ReleaseItem) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} · {} · {} · ★ {}",
        item.kind.label(),
        item.genre,
        item.year,
        item.rating
    );
    let _ = writeln!(out, "{}", item.title);
    if !item.original_title.is_empty() && item.original_title != item.title {
        let _ = writeln!(out, "{}", item.original_title);
    }
    let _ = writeln!(out, "{}", item.description);
    if let Some(poster) = &item.poster {
        let _ = writeln!(out, "{poster}");
    }
    out
}

/// Render the full list under a "Новинки {year}" heading.
pub fn render_list(items: &[ReleaseItem], year: i32) -> String {
    let mut out = format!("Новинки {year}\n\n");
    if items.is_empty() {
        out.push_str("Нет новинок.\n");
        return out;
    }
    let cards: Vec<String> = items.iter().map(render_card).collect();
    out.push_str(&cards.join("\n"));
    out
}
