pub mod contact_handler;
pub mod env_handler;
pub mod health_handler;
pub mod photo_handler;
