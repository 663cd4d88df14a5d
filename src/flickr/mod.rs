use bytes::Bytes;
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

pub mod error;
pub mod models;
pub mod result;

pub use error::Error;
pub use models::{LicenseFilter, Photo, PhotoPage, SearchPage, SearchResponse, Size};
pub use result::Result;

macro_rules! flickr_api {
    ($end_point:expr) => {
        concat!("https://api.flickr.com/services", $end_point)
    };
}

macro_rules! query_params {
    ($($key:expr => $value:expr),+ $(,)?) => {
        &[
            $(($key, $value.to_string())),+
        ]
    };
}

pub const REST_ENDPOINT: &str = flickr_api!("/rest");

const SEARCH_METHOD: &str = "flickr.photos.search";
const SEARCH_EXTRAS: &str = "license,original_format,url_o,url_m";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// One `flickr.photos.search` request.
#[derive(Debug, Clone)]
pub struct SearchQuery<'a> {
    pub text: &'a str,
    pub license: &'a LicenseFilter,
    pub per_page: u32,
    pub page: u32,
}

#[derive(Clone)]
pub struct Client {
    http: HttpClient,
    api_key: String,
    endpoint: String,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn new<T: AsRef<str>>(api_key: T) -> Result<Self> {
        Self::with_endpoint(api_key, REST_ENDPOINT)
    }

    pub fn with_endpoint<T: AsRef<str>, E: Into<String>>(api_key: T, endpoint: E) -> Result<Self> {
        let api_key = api_key.as_ref().trim();
        if api_key.is_empty() || !api_key.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidApiKey);
        }

        let http = HttpClient::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::Request)?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn search(&self, query: &SearchQuery<'_>) -> Result<SearchPage> {
        let request = self.http.get(&self.endpoint).query(query_params!(
            "method" => SEARCH_METHOD,
            "api_key" => self.api_key,
            "text" => query.text,
            "license" => query.license,
            "per_page" => query.per_page,
            "page" => query.page,
            "content_type" => 1,
            "format" => "json",
            "nojsoncallback" => 1,
            "extras" => SEARCH_EXTRAS,
        ));

        let response = Self::send_request(request).await?;
        let body = response.bytes().await.map_err(Error::Request)?;

        let raw: Value = serde_json::from_slice(&body).map_err(Error::InvalidResponse)?;
        let response = SearchResponse::deserialize(&raw).map_err(Error::InvalidResponse)?;

        match response {
            SearchResponse::Ok { photos } => Ok(SearchPage::new(photos, raw)),
            SearchResponse::Fail { code, message } => Err(Error::Api { code, message }),
        }
    }

    pub async fn download_photo(&self, url: &str) -> Result<Bytes> {
        let request = self.http.get(url);

        let response = Self::send_request(request).await?;
        let data = response.bytes().await.map_err(Error::Request)?;

        Ok(data)
    }

    async fn send_request(request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(Error::Request)?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }

        Ok(response)
    }
}
