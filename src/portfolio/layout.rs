use tokio::sync::OnceCell;
use tracing::{info, warn};
use uuid::Uuid;

use super::client::{PageRequest, PhotoSource};
use crate::models::photo::THUMBNAIL;

pub const FALLBACK_HERO_URL: &str =
    "https://images.unsplash.com/photo-1506744038136-46273834b3fb?auto=format&fit=crop&w=1200&q=80";
const HERO_CANDIDATES: u32 = 50;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeroImage {
    pub url: String,
    pub public_id: Option<String>,
}

impl HeroImage {
    pub fn placeholder() -> Self {
        Self {
            url: FALLBACK_HERO_URL.to_string(),
            public_id: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.public_id.is_none()
    }
}

/// Site chrome shared by every page. Holds the home page's hero background,
/// which is fetched at most once.
#[derive(Debug, Default)]
pub struct LayoutShell {
    hero: OnceCell<HeroImage>,
}

impl LayoutShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn hero(&self, source: &dyn PhotoSource) -> &HeroImage {
        self.hero.get_or_init(|| preload_hero(source)).await
    }

    pub fn loaded_hero(&self) -> Option<&HeroImage> {
        self.hero.get()
    }
}

/// Picks a random photo from the thumbnail folder. Any failure, including an
/// empty folder, yields the static placeholder. No retries.
pub async fn preload_hero(source: &dyn PhotoSource) -> HeroImage {
    let request = PageRequest::folder(THUMBNAIL, HERO_CANDIDATES);

    let photos = match source.fetch_page(&request).await {
        Ok(page) => page.photos,
        Err(e) => {
            warn!(error = %e, "could not fetch hero thumbnails, using placeholder");
            return HeroImage::placeholder();
        }
    };

    if photos.is_empty() {
        info!("no hero thumbnails available, using placeholder");
        return HeroImage::placeholder();
    }

    let index = (Uuid::new_v4().as_u128() % photos.len() as u128) as usize;
    let photo = &photos[index];

    HeroImage {
        url: photo.url.clone(),
        public_id: Some(photo.public_id.clone()),
    }
}
