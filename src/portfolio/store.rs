use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use derive_more::Display;

use crate::models::Photo;

pub const ALL: &str = "all";

/// What is known about one category after the pages fetched so far.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CacheEntry {
    pub photos: Vec<Photo>,
    pub has_more: bool,
    /// Size of the category on the server. Unknown until a page for the
    /// category itself has been fetched.
    pub total: Option<usize>,
    /// Last page merged into `photos`. Zero when the entry was derived
    /// locally and no page has been fetched for it yet.
    pub page: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PortfolioState {
    selected_category: String,
    photos: Vec<Photo>,
    categories: Vec<String>,
    cache: HashMap<String, CacheEntry>,
}

impl Default for PortfolioState {
    fn default() -> Self {
        Self {
            selected_category: ALL.to_string(),
            photos: Vec::new(),
            categories: Vec::new(),
            cache: HashMap::new(),
        }
    }
}

impl PortfolioState {
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn set_photos(&mut self, photos: Vec<Photo>) {
        self.photos = photos;
    }

    pub fn selected_category(&self) -> &str {
        &self.selected_category
    }

    pub fn set_selected_category(&mut self, category: &str) {
        self.selected_category = category.to_lowercase();
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn set_categories(&mut self, categories: Vec<String>) {
        self.categories = categories;
    }

    pub fn cached(&self, category: &str) -> Option<&CacheEntry> {
        self.cache.get(category)
    }

    pub fn cache_entry(&mut self, category: &str) -> &mut CacheEntry {
        self.cache.entry(category.to_string()).or_default()
    }

    pub fn store(&mut self, category: &str, entry: CacheEntry) {
        self.cache.insert(category.to_string(), entry);
    }

    /// Appends photos whose id is not already present and returns those.
    pub fn append_unique(&mut self, photos: &[Photo]) -> Vec<Photo> {
        let fresh: Vec<Photo> = photos
            .iter()
            .filter(|photo| !self.photos.iter().any(|known| known.id == photo.id))
            .cloned()
            .collect();
        self.photos.extend(fresh.iter().cloned());
        fresh
    }
}

#[derive(Debug, Display, PartialEq, Eq)]
pub enum StoreError {
    #[display(fmt = "portfolio state accessed outside of its PortfolioProvider")]
    OutsideProvider,
}

impl std::error::Error for StoreError {}

/// Owns the portfolio state for the lifetime of the page that shows it.
///
/// Components get a [`PortfolioHandle`]; once the provider is dropped every
/// handle refuses access instead of handing out a fresh default.
#[derive(Default)]
pub struct PortfolioProvider {
    state: Arc<Mutex<PortfolioState>>,
}

#[derive(Clone)]
pub struct PortfolioHandle {
    state: Weak<Mutex<PortfolioState>>,
}

impl PortfolioProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> PortfolioHandle {
        PortfolioHandle {
            state: Arc::downgrade(&self.state),
        }
    }
}

impl PortfolioHandle {
    /// A handle that was never attached to a provider.
    pub fn detached() -> Self {
        Self { state: Weak::new() }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut PortfolioState) -> R) -> Result<R, StoreError> {
        let state = self.state.upgrade().ok_or(StoreError::OutsideProvider)?;
        let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(f(&mut guard))
    }
}
