//! Plain-text painter used by the `list` subcommand.

use crate::api::Movie;
use crate::app::DisplayMode;
use std::fmt::Write;
use std::sync::Arc;

/// Render one page of movies as text. `poster_url` maps an image name to its URL.
pub fn render_page(movies: &[Arc<Movie>], mode: DisplayMode, poster_url: impl Fn(&str) -> String) -> String {
    let mut out = String::new();
    match mode {
        DisplayMode::Card => {
            for movie in movies {
                let _ = writeln!(out, "#{:<4} {}", movie.id, movie.title);
                let _ = writeln!(out, "      poster: {}", poster_url(&movie.image));
                let _ = writeln!(out, "      [more:{}] [favorite:{}]", movie.id, movie.id);
                out.push('\n');
            }
        }
        DisplayMode::List => {
            let width = movies
                .iter()
                .map(|m| m.title.chars().count())
                .max()
                .unwrap_or(0);
            for movie in movies {
                let _ = writeln!(
                    out,
                    "#{:<4} {:<width$}  [more:{}] [favorite:{}]",
                    movie.id,
                    movie.title,
                    movie.id,
                    movie.id,
                    width = width
                );
            }
        }
    }
    out
}

/// Footer line naming the page position, e.g. `page 3/7 (80 movies)`.
pub fn pager_line(current_page: usize, page_count: usize, total: usize) -> String {
    format!("page {}/{} ({} movies)", current_page, page_count, total)
}
