use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;
use tracing::{error, warn};

use crate::config::MediaHostConfig;
use crate::utils::media_host::MediaHost;

/// Reports which media host variables are missing, by name only, and
/// checks the configured credentials against the host.
#[get("/api/test-env")]
pub async fn test_env(
    config: web::Data<MediaHostConfig>,
    host: web::Data<dyn MediaHost>,
) -> impl Responder {
    let missing = config.missing_vars();
    if !missing.is_empty() {
        warn!(?missing, "media host configuration incomplete");
        return HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Missing environment variables",
            "missing": missing,
        }));
    }

    match host.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": "Environment variables are correctly configured",
            "cloudName": config.cloud_name,
            "hasApiKey": config.api_key.is_some(),
            "hasApiSecret": config.api_secret.is_some(),
            "uploadPreset": config.upload_preset,
        })),
        Err(e) => {
            error!(status = ?e.status_code(), message = %e, "media host credential check failed");
            HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "Cloudinary configuration test failed",
                "error": e.to_string(),
            }))
        }
    }
}
