use derive_more::Display;
use futures_util::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::MediaHostConfig;
use crate::models::SearchResponse;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Display)]
pub enum MediaHostError {
    #[display(fmt = "media host credentials are not configured")]
    NotConfigured,
    #[display(fmt = "request to media host failed: {}", _0)]
    Request(reqwest::Error),
    #[display(fmt = "media host responded with {}: {}", status, message)]
    Status { status: u16, message: String },
}

impl std::error::Error for MediaHostError {}

impl From<reqwest::Error> for MediaHostError {
    fn from(err: reqwest::Error) -> Self {
        MediaHostError::Request(err)
    }
}

impl MediaHostError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            MediaHostError::Status { status, .. } => Some(*status),
            MediaHostError::Request(err) => err.status().map(|s| s.as_u16()),
            MediaHostError::NotConfigured => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub expression: String,
    pub max_results: u32,
}

impl SearchQuery {
    /// Scopes a search to `root/*`, or to `root/folder/*` when a folder is given.
    pub fn for_folder(root: &str, folder: Option<&str>, max_results: u32) -> Self {
        let expression = match folder {
            Some(folder) => format!("folder:{}/{}/*", escape_term(root), escape_term(folder)),
            None => format!("folder:{}/*", escape_term(root)),
        };

        SearchQuery { expression, max_results }
    }
}

/// Backslash-escapes whitespace and the punctuation the search syntax reserves,
/// so a folder name is matched literally.
pub fn escape_term(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if c.is_whitespace() || (c.is_ascii_punctuation() && !matches!(c, '-' | '_' | '.' | '/')) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Image host the photo listing is sourced from.
pub trait MediaHost: Send + Sync {
    /// Runs a search sorted by creation time, newest first.
    fn search<'a>(&'a self, query: &'a SearchQuery) -> BoxFuture<'a, Result<SearchResponse, MediaHostError>>;

    /// Cheapest authenticated call, used to check the credentials.
    fn ping(&self) -> BoxFuture<'_, Result<(), MediaHostError>>;
}

pub struct CloudinaryClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<Credentials>,
}

struct Credentials {
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorMessage,
}

#[derive(Deserialize)]
struct ErrorMessage {
    message: String,
}

impl CloudinaryClient {
    pub fn new(config: &MediaHostConfig) -> Self {
        Self::with_base_url(config, API_BASE)
    }

    pub fn with_base_url(config: &MediaHostConfig, base_url: &str) -> Self {
        let credentials = match (&config.cloud_name, &config.api_key, &config.api_secret) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(Credentials {
                cloud_name: cloud_name.clone(),
                api_key: api_key.clone(),
                api_secret: api_secret.clone(),
            }),
            _ => None,
        };

        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn credentials(&self) -> Result<&Credentials, MediaHostError> {
        self.credentials.as_ref().ok_or(MediaHostError::NotConfigured)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, MediaHostError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or(body);

        Err(MediaHostError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn run_search(&self, query: &SearchQuery) -> Result<SearchResponse, MediaHostError> {
        let credentials = self.credentials()?;
        let url = format!("{}/{}/resources/search", self.base_url, credentials.cloud_name);

        debug!(expression = %query.expression, max_results = query.max_results, "searching media host");

        let response = self
            .http
            .post(url)
            .basic_auth(&credentials.api_key, Some(&credentials.api_secret))
            .json(&json!({
                "expression": query.expression,
                "sort_by": [{ "created_at": "desc" }],
                "max_results": query.max_results,
                "with_field": ["context"],
            }))
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        Ok(response.json::<SearchResponse>().await?)
    }

    async fn run_ping(&self) -> Result<(), MediaHostError> {
        let credentials = self.credentials()?;
        let url = format!("{}/{}/resources/image", self.base_url, credentials.cloud_name);

        let response = self
            .http
            .get(url)
            .basic_auth(&credentials.api_key, Some(&credentials.api_secret))
            .query(&[("max_results", "1")])
            .send()
            .await?;

        Self::check_status(response).await.map(|_| ())
    }
}

impl MediaHost for CloudinaryClient {
    fn search<'a>(&'a self, query: &'a SearchQuery) -> BoxFuture<'a, Result<SearchResponse, MediaHostError>> {
        self.run_search(query).boxed()
    }

    fn ping(&self) -> BoxFuture<'_, Result<(), MediaHostError>> {
        self.run_ping().boxed()
    }
}
