pub mod contact;
pub mod photo;
pub mod resource;

pub use contact::ContactRequest;
pub use photo::{Photo, PhotoPage};
pub use resource::{Resource, SearchResponse};
