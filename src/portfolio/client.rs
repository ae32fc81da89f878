use futures_util::future::{BoxFuture, FutureExt};
use tracing::debug;

use crate::models::PhotoPage;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn network(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    pub fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    pub fn http(status: reqwest::StatusCode, body: String) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("Failed to load photos ({status}): {body}"),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Parameters of one `/api/photos` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub folder: Option<String>,
    pub category: String,
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn category(category: &str, page: u32, limit: u32) -> Self {
        Self {
            folder: None,
            category: category.to_string(),
            page,
            limit,
        }
    }

    pub fn folder(folder: &str, limit: u32) -> Self {
        Self {
            folder: Some(folder.to_string()),
            category: folder.to_string(),
            page: 1,
            limit,
        }
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("category", self.category.clone()),
        ];
        if let Some(folder) = &self.folder {
            pairs.push(("folder", folder.clone()));
        }
        pairs
    }
}

/// Anything that can serve pages of the photo listing.
pub trait PhotoSource: Send + Sync {
    fn fetch_page<'a>(&'a self, request: &'a PageRequest) -> BoxFuture<'a, ApiResult<PhotoPage>>;
}

#[derive(Clone, Debug)]
pub struct PhotoApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl PhotoApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn get_photos(&self, request: &PageRequest) -> ApiResult<PhotoPage> {
        let url = format!("{}/api/photos", self.base_url);
        debug!(?request, "requesting photo page");

        let res = self
            .http
            .get(url)
            .query(&request.query_pairs())
            .send()
            .await
            .map_err(ApiError::network)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ApiError::http(status, body));
        }

        res.json::<PhotoPage>().await.map_err(ApiError::parse)
    }
}

impl PhotoSource for PhotoApiClient {
    fn fetch_page<'a>(&'a self, request: &'a PageRequest) -> BoxFuture<'a, ApiResult<PhotoPage>> {
        self.get_photos(request).boxed()
    }
}
