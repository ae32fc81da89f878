pub mod config;
pub mod handlers;
pub mod message;
pub mod models;
pub mod portfolio;
pub mod routes;
pub mod utils;
