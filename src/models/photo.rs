use serde::{Deserialize, Serialize};

use super::resource::Resource;

pub const UNCATEGORIZED: &str = "uncategorized";
pub const THUMBNAIL: &str = "thumbnail";
const DEFAULT_ALT: &str = "Photography portfolio image";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub public_id: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub description: String,
    pub category: String,
    pub alt: String,
}

/// One page of the photo listing.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhotoPage {
    pub photos: Vec<Photo>,
    pub has_more: bool,
    pub total: usize,
    pub categories: Vec<String>,
}

impl Photo {
    pub fn is_portrait(&self) -> bool {
        self.height > 0 && (self.width as f64) / (self.height as f64) < 1.0
    }
}

/// `portfolio/<category>/<name>` yields `<category>`. Only folder segments
/// count, so an image sitting directly under the root has no category.
pub fn category_from_public_id(public_id: &str) -> String {
    let mut segments: Vec<&str> = public_id.split('/').collect();
    segments.pop();

    segments
        .get(1)
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_lowercase())
        .unwrap_or_else(|| UNCATEGORIZED.to_string())
}

pub fn alt_from_public_id(public_id: &str) -> String {
    public_id
        .rsplit('/')
        .next()
        .map(|name| name.replace('-', " "))
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ALT.to_string())
}

pub fn is_reserved_category(category: &str) -> bool {
    category.eq_ignore_ascii_case(THUMBNAIL) || category.eq_ignore_ascii_case(UNCATEGORIZED)
}

impl From<Resource> for Photo {
    fn from(resource: Resource) -> Self {
        let description = resource.custom("description").unwrap_or_default().to_string();

        let category = resource
            .custom("category")
            .map(str::to_lowercase)
            .unwrap_or_else(|| category_from_public_id(&resource.public_id));

        let alt = if description.is_empty() {
            alt_from_public_id(&resource.public_id)
        } else {
            description.clone()
        };

        Photo {
            id: resource.public_id.clone(),
            public_id: resource.public_id,
            url: resource.secure_url,
            width: resource.width,
            height: resource.height,
            description,
            category,
            alt,
        }
    }
}
