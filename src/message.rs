use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use derive_more::Display;
use serde::Serialize;

use crate::utils::media_host::MediaHostError;

#[derive(Debug, Display)]
pub enum AppError {
    #[display(fmt = "No photos found")]
    NoPhotosFound,
    #[display(fmt = "Failed to fetch photos")]
    FetchPhotosFailed(MediaHostError),
    #[display(fmt = "Invalid query: {}", _0)]
    InvalidQuery(String),
    #[display(fmt = "Name and message are required")]
    IncompleteContactForm,
    #[display(fmt = "Contact form is not available")]
    ContactUnavailable,
}

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Upstream detail worth showing to a developer. Credentials never end up here.
    pub fn details(&self) -> Option<String> {
        match self {
            AppError::FetchPhotosFailed(err) => Some(err.to_string()),
            _ => None,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NoPhotosFound => StatusCode::NOT_FOUND,
            AppError::FetchPhotosFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidQuery(_) | AppError::IncompleteContactForm => StatusCode::BAD_REQUEST,
            AppError::ContactUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header((header::CACHE_CONTROL, "no-store, must-revalidate"))
            .insert_header((header::PRAGMA, "no-cache"))
            .json(ErrorBody {
                error: self.message(),
                details: self.details(),
            })
    }
}

impl From<MediaHostError> for AppError {
    fn from(err: MediaHostError) -> Self {
        AppError::FetchPhotosFailed(err)
    }
}
