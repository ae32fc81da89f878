use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

pub const CLOUD_NAME_VAR: &str = "CLOUDINARY_CLOUD_NAME";
pub const PUBLIC_CLOUD_NAME_VAR: &str = "NEXT_PUBLIC_CLOUDINARY_CLOUD_NAME";
pub const API_KEY_VAR: &str = "CLOUDINARY_API_KEY";
pub const API_SECRET_VAR: &str = "CLOUDINARY_API_SECRET";
pub const UPLOAD_PRESET_VAR: &str = "CLOUDINARY_UPLOAD_PRESET";

#[derive(Debug, Clone, Default)]
pub struct MediaHostConfig {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub upload_preset: Option<String>,
}

/// Listing and caching knobs for `/api/photos`.
#[derive(Debug, Clone)]
pub struct PhotoSettings {
    pub root_folder: String,
    pub max_results: u32,
    pub cache_max_age: u64,
    pub cache_stale_while_revalidate: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub media_host: MediaHostConfig,
    pub photos: PhotoSettings,
    pub contact_email: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", 8000),
            media_host: MediaHostConfig::load(),
            photos: PhotoSettings {
                root_folder: optional("PHOTO_ROOT_FOLDER").unwrap_or_else(|| "portfolio".to_string()),
                max_results: try_load("PHOTO_MAX_RESULTS", 500),
                cache_max_age: try_load("PHOTO_CACHE_MAX_AGE", 86_400),
                cache_stale_while_revalidate: try_load("PHOTO_CACHE_SWR", 604_800),
            },
            contact_email: optional("CONTACT_EMAIL"),
        }
    }
}

impl MediaHostConfig {
    pub fn load() -> Self {
        Self {
            cloud_name: optional(CLOUD_NAME_VAR).or_else(|| optional(PUBLIC_CLOUD_NAME_VAR)),
            api_key: optional(API_KEY_VAR),
            api_secret: optional(API_SECRET_VAR),
            upload_preset: optional(UPLOAD_PRESET_VAR),
        }
    }

    /// Names of the required variables that are absent. Never includes values.
    pub fn missing_vars(&self) -> Vec<&'static str> {
        [
            (CLOUD_NAME_VAR, &self.cloud_name),
            (API_KEY_VAR, &self.api_key),
            (API_SECRET_VAR, &self.api_secret),
            (UPLOAD_PRESET_VAR, &self.upload_preset),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

impl PhotoSettings {
    pub fn cache_control(&self) -> String {
        format!(
            "public, max-age={}, stale-while-revalidate={}",
            self.cache_max_age, self.cache_stale_while_revalidate
        )
    }
}

impl Default for PhotoSettings {
    fn default() -> Self {
        Self {
            root_folder: "portfolio".to_string(),
            max_results: 500,
            cache_max_age: 86_400,
            cache_stale_while_revalidate: 604_800,
        }
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match optional(key) {
        None => {
            info!("{key} not set, using default: {default}");
            default
        }
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
    }
}
