use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://movie-list.alphacamp.io";

/// A single movie as served by the movie-list API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    /// Poster file name, relative to the posters path.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub description: String,
}

/// Every endpoint wraps its payload in `{ "results": ... }`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    results: T,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: HTTP {status} from {url}")]
    Status { status: u16, url: String },
}

impl ApiError {
    /// Short message for the status line.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http(e) if e.is_decode() => format!("Unexpected response format: {}", e),
            ApiError::Http(e) => format!("Network error: {}", e),
            ApiError::Status { status, .. } => format!("Movie API returned HTTP {}", status),
        }
    }
}

/// Thin client over the two movie-list endpoints.
#[derive(Debug, Clone)]
pub struct MovieApi {
    client: reqwest::Client,
    base_url: String,
}

impl MovieApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn index_url(&self) -> String {
        format!("{}/api/v1/movies/", self.base_url)
    }

    pub fn movie_url(&self, id: i64) -> String {
        format!("{}{}", self.index_url(), id)
    }

    pub fn poster_url(&self, image: &str) -> String {
        format!("{}/posters/{}", self.base_url, image)
    }

    /// Fetch the whole movie collection.
    pub async fn list_movies(&self) -> Result<Vec<Movie>, ApiError> {
        self.get_results(self.index_url()).await
    }

    /// Fetch the full record of a single movie.
    pub async fn get_movie(&self, id: i64) -> Result<Movie, ApiError> {
        self.get_results(self.movie_url(id)).await
    }

    async fn get_results<T: DeserializeOwned>(&self, url: String) -> Result<T, ApiError> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }
        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.results)
    }
}
