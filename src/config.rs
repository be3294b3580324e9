use crate::api::DEFAULT_BASE_URL;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: usize = 12;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Page size must be at least 1")]
    InvalidPageSize,

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Could not determine a data directory; pass --data-dir")]
    NoDataDir,
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub page_size: usize,
    /// Directory backing the local favorites storage.
    pub data_dir: PathBuf,
}

impl Config {
    /// Validate command-line values, filling in defaults.
    pub fn resolve(
        base_url: Option<String>,
        page_size: usize,
        data_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }

        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let parsed = reqwest::Url::parse(&base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url,
                reason: "scheme must be http or https".to_string(),
            });
        }

        let data_dir = match data_dir {
            Some(dir) => dir,
            None => Self::default_data_dir().ok_or(ConfigError::NoDataDir)?,
        };

        Ok(Self {
            base_url,
            page_size,
            data_dir,
        })
    }

    pub fn default_data_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("io", "alphacamp", "movie-browser")
            .map(|dirs| dirs.data_dir().to_path_buf())
    }
}
