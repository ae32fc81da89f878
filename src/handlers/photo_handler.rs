use std::collections::HashSet;

use actix_web::http::header;
use actix_web::{get, web, HttpResponse};
use base64::prelude::*;
use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString};
use tracing::{error, info, warn};

use crate::config::PhotoSettings;
use crate::message::AppError;
use crate::models::photo::is_reserved_category;
use crate::models::{Photo, PhotoPage, Resource};
use crate::utils::media_host::{MediaHost, SearchQuery};
use crate::utils::pagination::paginate;

pub const DEFAULT_LIMIT: usize = 12;
pub const MAX_LIMIT: usize = 100;
pub const ALL_CATEGORIES: &str = "all";

#[serde_as]
#[derive(Deserialize, Debug, Default)]
pub struct PhotoQuery {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub folder: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub category: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl PhotoQuery {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// `category` wins over `folder`; `all` means no filter.
    pub fn category_filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .or(self.folder.as_deref())
            .filter(|category| !category.eq_ignore_ascii_case(ALL_CATEGORIES))
    }

    fn validated_folder(&self) -> Result<Option<&str>, AppError> {
        match self.folder.as_deref() {
            Some(folder) if folder.eq_ignore_ascii_case(ALL_CATEGORIES) => Ok(None),
            Some(folder) if !is_folder_name(folder) => {
                Err(AppError::InvalidQuery(format!("unsupported folder name {folder:?}")))
            }
            folder => Ok(folder),
        }
    }
}

/// Reserved characters are escaped when the search is built; control
/// characters cannot be, so they are the only thing refused.
fn is_folder_name(folder: &str) -> bool {
    !folder.chars().any(char::is_control)
}

/// Turns raw search results into one page of the listing.
///
/// Results are deduplicated by public id, keeping the first (newest) entry.
/// The category list is computed before filtering so it always reflects
/// everything the search returned.
pub fn build_photo_page(
    resources: Vec<Resource>,
    category: Option<&str>,
    page: usize,
    limit: usize,
) -> PhotoPage {
    let mut seen = HashSet::new();
    let photos: Vec<Photo> = resources
        .into_iter()
        .map(Photo::from)
        .filter(|photo| seen.insert(photo.public_id.clone()))
        .collect();

    let mut categories: Vec<String> = Vec::new();
    for photo in &photos {
        if !is_reserved_category(&photo.category) && !categories.contains(&photo.category) {
            categories.push(photo.category.clone());
        }
    }

    let filtered: Vec<Photo> = match category {
        Some(category) => photos
            .into_iter()
            .filter(|photo| photo.category.eq_ignore_ascii_case(category))
            .collect(),
        None => photos,
    };

    let total = filtered.len();
    let (photos, has_more) = paginate(filtered, page, limit);

    PhotoPage {
        photos,
        has_more,
        total,
        categories,
    }
}

/// Quoted prefix of the base64 encoded page, mirrors what the CDN keys on.
pub fn page_etag(photos: &[Photo]) -> String {
    let encoded = BASE64_STANDARD.encode(serde_json::to_vec(photos).unwrap_or_default());
    let prefix: String = encoded.chars().take(32).collect();
    format!("\"{prefix}\"")
}

#[get("/api/photos")]
pub async fn get_photos(
    query: web::Query<PhotoQuery>,
    host: web::Data<dyn MediaHost>,
    settings: web::Data<PhotoSettings>,
) -> Result<HttpResponse, AppError> {
    let folder = query.validated_folder()?;
    let (page, limit) = (query.page(), query.limit());

    info!(?folder, category = ?query.category_filter(), page, limit, "fetching photos");

    let search = SearchQuery::for_folder(&settings.root_folder, folder, settings.max_results);
    let response = host.search(&search).await.map_err(|err| {
        error!(status = ?err.status_code(), message = %err, "media host search failed");
        AppError::from(err)
    })?;

    let Some(resources) = response.resources else {
        warn!(expression = %search.expression, "media host returned no resources");
        return Err(AppError::NoPhotosFound);
    };

    info!(total_count = response.total_count, returned = resources.len(), "media host search finished");

    let page_result = build_photo_page(resources, query.category_filter(), page, limit);

    info!(
        total = page_result.total,
        returned = page_result.photos.len(),
        has_more = page_result.has_more,
        "returning photo page"
    );

    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, settings.cache_control()))
        .insert_header((header::ETAG, page_etag(&page_result.photos)))
        .insert_header((header::VARY, "Accept-Encoding, Accept-Language"))
        .json(page_result))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use actix_web::App;
    use futures_util::future::{BoxFuture, FutureExt};

    use super::*;
    use crate::models::SearchResponse;
    use crate::utils::media_host::MediaHostError;

    struct FakeHost {
        resources: Option<Vec<Resource>>,
        fail: bool,
        expressions: Mutex<Vec<String>>,
    }

    impl FakeHost {
        fn with(resources: Vec<Resource>) -> Self {
            Self { resources: Some(resources), fail: false, expressions: Mutex::new(vec![]) }
        }
    }

    impl MediaHost for FakeHost {
        fn search<'a>(&'a self, query: &'a SearchQuery) -> BoxFuture<'a, Result<SearchResponse, MediaHostError>> {
            self.expressions.lock().unwrap().push(query.expression.clone());
            let result = if self.fail {
                Err(MediaHostError::Status { status: 401, message: "Invalid api_key".to_string() })
            } else {
                Ok(SearchResponse {
                    total_count: self.resources.as_ref().map_or(0, |r| r.len() as u64),
                    resources: self.resources.clone(),
                })
            };
            async move { result }.boxed()
        }

        fn ping(&self) -> BoxFuture<'_, Result<(), MediaHostError>> {
            async { Ok(()) }.boxed()
        }
    }

    fn resource(public_id: &str) -> Resource {
        Resource {
            public_id: public_id.to_string(),
            secure_url: format!("https://res.cloudinary.com/demo/image/upload/{public_id}.jpg"),
            width: 1200,
            height: 800,
            context: None,
        }
    }

    fn five_landscapes() -> Vec<Resource> {
        (1..=5).map(|i| resource(&format!("portfolio/landscape/shot-{i}"))).collect()
    }

    #[test]
    fn test_build_page_slices_and_reports_more() {
        let first = build_photo_page(five_landscapes(), None, 1, 2);
        assert_eq!(first.photos.len(), 2);
        assert!(first.has_more);
        assert_eq!(first.total, 5);

        let third = build_photo_page(five_landscapes(), None, 3, 2);
        assert_eq!(third.photos.len(), 1);
        assert!(!third.has_more);
        assert_eq!(third.photos[0].id, "portfolio/landscape/shot-5");
    }

    #[test]
    fn test_build_page_deduplicates_by_public_id() {
        let mut duplicate = resource("portfolio/street/alley");
        duplicate.width = 10;
        let resources = vec![resource("portfolio/street/alley"), duplicate];

        let page = build_photo_page(resources, None, 1, 12);
        assert_eq!(page.photos.len(), 1);
        assert_eq!(page.photos[0].width, 1200);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_build_page_categories_exclude_reserved() {
        let resources = vec![
            resource("portfolio/thumbnail/hero"),
            resource("portfolio/loose-file"),
            resource("portfolio/street/alley"),
            resource("portfolio/landscape/dunes"),
            resource("portfolio/street/market"),
        ];

        let page = build_photo_page(resources, None, 1, 12);
        assert_eq!(page.categories, vec!["street", "landscape"]);
        assert_eq!(page.total, 5);
    }

    #[test]
    fn test_build_page_filters_case_insensitively() {
        let resources = vec![
            resource("portfolio/street/alley"),
            resource("portfolio/landscape/dunes"),
            resource("portfolio/street/market"),
        ];

        let page = build_photo_page(resources, Some("Street"), 1, 12);
        assert_eq!(page.total, 2);
        assert!(page.photos.iter().all(|photo| photo.category == "street"));
        assert_eq!(page.categories, vec!["street", "landscape"]);
    }

    #[test]
    fn test_query_defaults_and_bounds() {
        let query = PhotoQuery::default();
        assert_eq!((query.page(), query.limit()), (1, DEFAULT_LIMIT));
        assert_eq!(query.category_filter(), None);

        let query = PhotoQuery {
            page: Some(0),
            limit: Some(10_000),
            category: Some("All".to_string()),
            folder: Some("street".to_string()),
        };
        assert_eq!((query.page(), query.limit()), (1, MAX_LIMIT));
        assert_eq!(query.category_filter(), None);
    }

    #[test]
    fn test_etag_is_quoted_prefix() {
        let page = build_photo_page(five_landscapes(), None, 1, 2);
        let etag = page_etag(&page.photos);
        assert!(etag.starts_with('"') && etag.ends_with('"'));
        assert_eq!(etag.len(), 34);
    }

    async fn call(host: FakeHost, uri: &str) -> (actix_web::http::StatusCode, actix_web::http::header::HeaderMap, serde_json::Value) {
        let host: Arc<dyn MediaHost> = Arc::new(host);
        let app = actix_web::test::init_service(
            App::new()
                .app_data(web::Data::from(host))
                .app_data(web::Data::new(PhotoSettings::default()))
                .service(get_photos),
        )
        .await;

        let req = actix_web::test::TestRequest::get().uri(uri).to_request();
        let resp = actix_web::test::call_service(&app, req).await;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = actix_web::test::read_body(resp).await;
        (status, headers, serde_json::from_slice(&body).unwrap())
    }

    #[actix_web::test]
    async fn test_get_photos_first_page() {
        let (status, headers, body) = call(FakeHost::with(five_landscapes()), "/api/photos?limit=2&page=1").await;

        assert!(status.is_success());
        assert_eq!(body["photos"].as_array().unwrap().len(), 2);
        assert_eq!(body["hasMore"], true);
        assert_eq!(body["total"], 5);
        assert_eq!(body["categories"], serde_json::json!(["landscape"]));
        assert_eq!(
            headers.get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=86400, stale-while-revalidate=604800"
        );
        assert!(headers.contains_key(header::ETAG));
    }

    #[actix_web::test]
    async fn test_get_photos_last_page() {
        let (_, _, body) = call(FakeHost::with(five_landscapes()), "/api/photos?limit=2&page=3").await;

        assert_eq!(body["photos"].as_array().unwrap().len(), 1);
        assert_eq!(body["hasMore"], false);
    }

    #[actix_web::test]
    async fn test_get_photos_scopes_search_to_folder() {
        let host: Arc<FakeHost> = Arc::new(FakeHost::with(vec![resource("portfolio/thumbnail/hero")]));
        let app = actix_web::test::init_service(
            App::new()
                .app_data(web::Data::from(host.clone() as Arc<dyn MediaHost>))
                .app_data(web::Data::new(PhotoSettings::default()))
                .service(get_photos),
        )
        .await;

        let req = actix_web::test::TestRequest::get().uri("/api/photos?folder=thumbnail").to_request();
        let resp = actix_web::test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        assert_eq!(body["photos"][0]["category"], "thumbnail");
        assert_eq!(body["categories"], serde_json::json!([]));
        assert_eq!(
            host.expressions.lock().unwrap().as_slice(),
            ["folder:portfolio/thumbnail/*".to_string()]
        );
    }

    #[actix_web::test]
    async fn test_get_photos_rejects_control_characters_in_folder() {
        let (status, _, body) = call(FakeHost::with(vec![]), "/api/photos?folder=street%0A").await;
        assert_eq!(status, actix_web::http::StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid query"));
    }

    #[actix_web::test]
    async fn test_get_photos_accepts_punctuated_and_unicode_folders() {
        let host: Arc<FakeHost> = Arc::new(FakeHost::with(vec![resource("portfolio/black&white/pier")]));
        let app = actix_web::test::init_service(
            App::new()
                .app_data(web::Data::from(host.clone() as Arc<dyn MediaHost>))
                .app_data(web::Data::new(PhotoSettings::default()))
                .service(get_photos),
        )
        .await;

        for uri in [
            "/api/photos?folder=black%26white",
            "/api/photos?folder=st.ives",
            "/api/photos?folder=%E9%A2%A8%E6%99%AF",
        ] {
            let req = actix_web::test::TestRequest::get().uri(uri).to_request();
            let resp = actix_web::test::call_service(&app, req).await;
            assert!(resp.status().is_success(), "{uri} returned {}", resp.status());
        }

        assert_eq!(
            host.expressions.lock().unwrap().as_slice(),
            [
                r"folder:portfolio/black\&white/*".to_string(),
                "folder:portfolio/st.ives/*".to_string(),
                "folder:portfolio/風景/*".to_string(),
            ]
        );
    }

    #[actix_web::test]
    async fn test_get_photos_host_failure() {
        let host = FakeHost { resources: None, fail: true, expressions: Mutex::new(vec![]) };
        let (status, headers, body) = call(host, "/api/photos").await;

        assert_eq!(status, actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch photos");
        assert!(body["details"].as_str().unwrap().contains("401"));
        assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-store, must-revalidate");
    }

    #[actix_web::test]
    async fn test_get_photos_without_resources() {
        let host = FakeHost { resources: None, fail: false, expressions: Mutex::new(vec![]) };
        let (status, _, body) = call(host, "/api/photos").await;

        assert_eq!(status, actix_web::http::StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({ "error": "No photos found" }));
    }
}
