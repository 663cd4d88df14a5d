use std::{io, path::PathBuf};

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing or invalid API key")]
    InvalidApiKey,

    #[error("No API key found, looked in: {}", display_paths(searched))]
    MissingApiKey { searched: Vec<PathBuf> },

    #[error("Invalid license filter '{0}', expected codes like 4 or 1,2,4")]
    InvalidLicense(String),

    #[error("Failed to parse response: {0}")]
    InvalidResponse(#[source] serde_json::Error),

    #[error("Failed to send request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("HTTP error {0}")]
    Status(StatusCode),

    #[error("Flickr API error {code}: {message}")]
    Api { code: u32, message: String },

    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
