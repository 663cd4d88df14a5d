//! Where the API key and query words come from.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::flickr::{Error, Result};

/// Key file looked up in the working directory when none is given.
pub const DEFAULT_KEY_FILE: &str = "key.txt";

/// Environment variable holding the API key, also read from `.env`.
pub const API_KEY_ENV: &str = "FLICKR_API_KEY";

const CONFIG_DIR_NAME: &str = "flickr-fetch";

/// Reads the API key from the first line of `path`.
pub fn load_api_key<P: AsRef<Path>>(path: P) -> Result<String> {
    let content = fs::read_to_string(path.as_ref())?;
    let key = content.lines().next().unwrap_or_default().trim();

    if key.is_empty() {
        return Err(Error::InvalidApiKey);
    }

    Ok(key.to_string())
}

/// Finds the API key.
///
/// An explicit key file always wins and must exist. Otherwise the
/// lookup order is `./key.txt`, `$FLICKR_API_KEY` (after loading
/// `.env`), then `key.txt` in the per-user config directory.
pub fn resolve_api_key(explicit: Option<&Path>) -> Result<String> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "reading API key file");
        return load_api_key(path);
    }

    let mut searched = Vec::new();

    let local = PathBuf::from(DEFAULT_KEY_FILE);
    if local.is_file() {
        debug!(path = %local.display(), "reading API key file");
        return load_api_key(&local);
    }
    searched.push(local);

    dotenvy::dotenv().ok();
    if let Ok(key) = env::var(API_KEY_ENV) {
        let key = key.trim();
        if !key.is_empty() {
            debug!(var = API_KEY_ENV, "using API key from environment");
            return Ok(key.to_string());
        }
    }
    searched.push(PathBuf::from(format!("${API_KEY_ENV}")));

    if let Some(path) = user_key_file() {
        if path.is_file() {
            debug!(path = %path.display(), "reading API key file");
            return load_api_key(&path);
        }
        searched.push(path);
    }

    Err(Error::MissingApiKey { searched })
}

fn user_key_file() -> Option<PathBuf> {
    Some(
        dirs::config_dir()?
            .join(CONFIG_DIR_NAME)
            .join(DEFAULT_KEY_FILE),
    )
}

/// Reads newline separated query words, skipping blank lines.
pub fn load_word_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = fs::read_to_string(path.as_ref())?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Directory (and file prefix) name for a query word.
pub fn word_dir_name(word: &str) -> String {
    let name = word
        .split_whitespace()
        .map(|part| part.replace(['/', '\\'], "_"))
        .collect::<Vec<_>>()
        .join("_");

    // "." and ".." would resolve outside the word's own directory
    if name.chars().all(|c| c == '.') {
        return name.replace('.', "_");
    }

    name
}
