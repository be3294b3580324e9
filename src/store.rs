use crate::api::Movie;
use std::sync::Arc;

/// Lowercased, trimmed form of a search keyword.
pub fn normalize_keyword(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn title_matches(movie: &Movie, keyword: &str) -> bool {
    movie.title.to_lowercase().contains(keyword)
}

/// Movies whose title contains `keyword`, ignoring case and surrounding whitespace.
/// An empty keyword matches everything. Matches share the input's movies.
pub fn filter(items: &[Arc<Movie>], keyword: &str) -> Vec<Arc<Movie>> {
    let keyword = normalize_keyword(keyword);
    items
        .iter()
        .filter(|movie| title_matches(movie, &keyword))
        .cloned()
        .collect()
}

/// What a submitted search did to the active set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank keyword: the filter was dropped.
    Cleared,
    /// The active set is now the matching movies.
    Matched(usize),
    /// Nothing matched; the previous active set is kept.
    NoMatch { keyword: String },
}

/// The fetched collection plus the current search result.
#[derive(Debug, Default)]
pub struct DataStore {
    movies: Vec<Arc<Movie>>,
    // Never empty when set.
    filtered: Option<Vec<Arc<Movie>>>,
    keyword: Option<String>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection wholesale and drop any search.
    pub fn load(&mut self, movies: Vec<Movie>) {
        self.movies = movies.into_iter().map(Arc::new).collect();
        self.filtered = None;
        self.keyword = None;
    }

    pub fn total(&self) -> usize {
        self.movies.len()
    }

    pub fn is_filtered(&self) -> bool {
        self.filtered.is_some()
    }

    /// Keyword of the search currently narrowing the active set.
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// The last non-empty search result, or the full collection.
    pub fn active_set(&self) -> &[Arc<Movie>] {
        self.filtered.as_deref().unwrap_or(&self.movies)
    }

    pub fn active_len(&self) -> usize {
        self.active_set().len()
    }

    pub fn find(&self, id: i64) -> Option<&Movie> {
        self.movies.iter().find(|movie| movie.id == id).map(|movie| movie.as_ref())
    }

    /// Run a search over the full collection.
    pub fn search(&mut self, raw: &str) -> SearchOutcome {
        let keyword = normalize_keyword(raw);
        if keyword.is_empty() {
            self.filtered = None;
            self.keyword = None;
            return SearchOutcome::Cleared;
        }

        let matched = filter(&self.movies, &keyword);
        if matched.is_empty() {
            return SearchOutcome::NoMatch { keyword };
        }

        let count = matched.len();
        self.filtered = Some(matched);
        self.keyword = Some(keyword);
        SearchOutcome::Matched(count)
    }
}

#[cfg(test)]
pub(crate) fn sample_movies(n: i64) -> Vec<Movie> {
    (1..=n)
        .map(|id| Movie {
            id,
            title: format!("Movie {}", id),
            image: format!("poster{}.jpg", id),
            release_date: "2018-01-01".to_string(),
            description: format!("Description of movie {}", id),
        })
        .collect()
}
