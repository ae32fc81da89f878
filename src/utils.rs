pub mod media_host;
pub mod pagination;
