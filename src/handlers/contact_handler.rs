use actix_web::{post, web, HttpResponse};
use serde_json::json;
use tracing::info;

use crate::config::Config;
use crate::message::AppError;
use crate::models::ContactRequest;

#[post("/api/contact")]
pub async fn submit_contact(
    config: web::Data<Config>,
    payload: web::Json<ContactRequest>,
) -> Result<HttpResponse, AppError> {
    let recipient = config.contact_email.as_deref().ok_or(AppError::ContactUnavailable)?;

    if !payload.is_complete() {
        return Err(AppError::IncompleteContactForm);
    }

    info!(name = %payload.name.trim(), "contact message prepared");

    Ok(HttpResponse::Ok().json(json!({ "mailto": payload.mailto(recipient) })))
}
