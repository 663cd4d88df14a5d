use serde::Deserialize;
use serde_json::Value;

use super::{Photo, de};

/// Top-level shape of every Flickr REST response.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "stat", rename_all = "lowercase")]
pub enum SearchResponse {
    Ok {
        photos: PhotoPage,
    },
    Fail {
        #[serde(deserialize_with = "de::number")]
        code: u32,
        message: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoPage {
    #[serde(deserialize_with = "de::number")]
    page: u32,
    #[serde(deserialize_with = "de::number")]
    pages: u32,
    #[serde(default, deserialize_with = "de::number")]
    perpage: u32,
    #[serde(default, deserialize_with = "de::number")]
    total: u64,
    #[serde(rename = "photo", default)]
    photos: Vec<Photo>,
}

/// A parsed result page and the response body it was parsed from.
#[derive(Debug, Clone)]
pub struct SearchPage {
    photos: PhotoPage,
    raw: Value,
}

impl SearchPage {
    pub fn new(photos: PhotoPage, raw: Value) -> Self {
        Self { photos, raw }
    }

    pub fn photos(&self) -> &PhotoPage {
        &self.photos
    }

    /// The response exactly as Flickr sent it, envelope included.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl PhotoPage {
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn pages(&self) -> u32 {
        self.pages
    }

    pub fn per_page(&self) -> u32 {
        self.perpage
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn is_last(&self) -> bool {
        self.page >= self.pages
    }
}
