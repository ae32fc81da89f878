use tracing::{debug, warn};

use super::client::{ApiResult, PageRequest};
use super::lightbox::Lightbox;
use super::store::{CacheEntry, PortfolioState, ALL};
use super::thumbnail::ThumbnailTracker;
use crate::models::{Photo, PhotoPage};

pub const DEFAULT_PAGE_SIZE: u32 = 12;
const LOAD_FAILED: &str = "Failed to load photos";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GalleryPhase {
    Idle,
    InitialLoading,
    CategorySwitching,
    Loaded,
    LoadingMore,
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchKind {
    Initial,
    Category,
    More,
}

/// A page request the gallery wants issued. The ticket ties the response
/// back to the state the request was made in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fetch {
    pub ticket: u64,
    pub kind: FetchKind,
    pub request: PageRequest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Stale,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryLabel {
    pub value: String,
    pub label: String,
}

/// View state of the portfolio grid.
///
/// The gallery never performs I/O. Every transition that needs the network
/// hands back a [`Fetch`]; the caller runs it and feeds the outcome to
/// [`Gallery::resolve`]. At most one fetch is outstanding at a time, and a
/// response whose ticket is no longer the pending one is ignored.
#[derive(Debug)]
pub struct Gallery {
    page_size: u32,
    phase: GalleryPhase,
    page: u32,
    has_more: bool,
    total: Option<usize>,
    next_ticket: u64,
    pending: Option<u64>,
    mounted: bool,
    load_more_error: Option<String>,
    pub thumbnails: ThumbnailTracker,
    pub lightbox: Lightbox,
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Gallery {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            phase: GalleryPhase::Idle,
            page: 0,
            has_more: false,
            total: None,
            next_ticket: 1,
            pending: None,
            mounted: false,
            load_more_error: None,
            thumbnails: ThumbnailTracker::default(),
            lightbox: Lightbox::default(),
        }
    }

    pub fn phase(&self) -> &GalleryPhase {
        &self.phase
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// `None` while the grid shows photos no server page has counted yet.
    pub fn total(&self) -> Option<usize> {
        self.total
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_loading_more(&self) -> bool {
        self.phase == GalleryPhase::LoadingMore
    }

    pub fn load_more_error(&self) -> Option<&str> {
        self.load_more_error.as_deref()
    }

    pub fn mount(&mut self, state: &mut PortfolioState) -> Option<Fetch> {
        if self.mounted {
            return None;
        }
        self.mounted = true;

        if !state.photos().is_empty() {
            let category = state.selected_category().to_string();
            let entry = match state.cached(&category) {
                Some(entry) => entry.clone(),
                None => {
                    // Photos put in place without a fetch; let the server
                    // say whether there is more.
                    let entry = CacheEntry {
                        photos: state.photos().to_vec(),
                        has_more: true,
                        total: None,
                        page: state.photos().len() as u32 / self.page_size,
                    };
                    state.store(&category, entry.clone());
                    entry
                }
            };
            self.adopt_counters(&entry);
            self.phase = GalleryPhase::Loaded;
            return None;
        }

        self.phase = GalleryPhase::InitialLoading;
        let category = state.selected_category().to_string();
        Some(self.issue(FetchKind::Initial, PageRequest::category(&category, 1, self.page_size)))
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
        self.pending = None;
    }

    pub fn select_category(&mut self, state: &mut PortfolioState, category: &str) -> Option<Fetch> {
        let category = category.to_lowercase();
        let settled = matches!(self.phase, GalleryPhase::Loaded | GalleryPhase::LoadingMore);
        if settled && state.selected_category() == category {
            return None;
        }

        state.set_selected_category(&category);
        self.pending = None;
        self.load_more_error = None;

        if let Some(entry) = state.cached(&category).filter(|entry| !entry.photos.is_empty()) {
            debug!(%category, photos = entry.photos.len(), "category served from cache");
            let entry = entry.clone();
            self.adopt(state, &entry);
            return None;
        }

        if let Some(entry) = self.derive_from_all(state, &category) {
            debug!(%category, photos = entry.photos.len(), "category derived from cached listing");
            state.store(&category, entry.clone());
            self.adopt(state, &entry);
            return None;
        }

        state.set_photos(Vec::new());
        self.page = 0;
        self.has_more = false;
        self.total = None;
        self.phase = GalleryPhase::CategorySwitching;
        Some(self.issue(FetchKind::Category, PageRequest::category(&category, 1, self.page_size)))
    }

    /// Starts the next page unless one is already on its way.
    pub fn load_more(&mut self, state: &PortfolioState) -> Option<Fetch> {
        if self.phase != GalleryPhase::Loaded || !self.has_more || self.pending.is_some() {
            return None;
        }

        self.phase = GalleryPhase::LoadingMore;
        self.load_more_error = None;
        let category = state.selected_category().to_string();
        Some(self.issue(FetchKind::More, PageRequest::category(&category, self.page + 1, self.page_size)))
    }

    pub fn resolve(
        &mut self,
        state: &mut PortfolioState,
        fetch: &Fetch,
        result: ApiResult<PhotoPage>,
    ) -> Resolution {
        if !self.mounted || self.pending != Some(fetch.ticket) {
            debug!(ticket = fetch.ticket, "discarding stale photo page");
            return Resolution::Stale;
        }
        self.pending = None;

        let category = fetch.request.category.as_str();
        match (fetch.kind, result) {
            (FetchKind::Initial | FetchKind::Category, Ok(page)) => {
                if fetch.kind == FetchKind::Initial || !page.categories.is_empty() {
                    state.set_categories(page.categories.clone());
                }
                self.page = 1;
                self.has_more = page.has_more && !page.photos.is_empty();
                self.total = Some(page.total);
                state.set_photos(page.photos.clone());
                state.store(category, self.entry_for(page.photos));
                self.phase = GalleryPhase::Loaded;
            }
            (FetchKind::More, Ok(page)) => {
                let fresh = state.append_unique(&page.photos);
                self.page = fetch.request.page;
                self.has_more = page.has_more && !fresh.is_empty();
                self.total = Some(page.total.max(state.photos().len()));

                let (page_no, has_more, total) = (self.page, self.has_more, self.total);
                let entry = state.cache_entry(category);
                entry.photos.extend(fresh);
                entry.page = page_no;
                entry.has_more = has_more;
                entry.total = total;
                self.phase = GalleryPhase::Loaded;
            }
            (FetchKind::More, Err(err)) => {
                warn!(%category, page = fetch.request.page, error = %err, "loading more photos failed");
                self.load_more_error = Some(LOAD_FAILED.to_string());
                self.phase = GalleryPhase::Loaded;
            }
            (_, Err(err)) => {
                warn!(%category, error = %err, "loading photos failed");
                self.phase = GalleryPhase::Error(LOAD_FAILED.to_string());
            }
        }

        Resolution::Applied
    }

    /// Filter bar entries: `all` first, then the known categories.
    pub fn filter_labels(&self, state: &PortfolioState) -> Vec<CategoryLabel> {
        std::iter::once(ALL)
            .chain(state.categories().iter().map(String::as_str))
            .map(|value| CategoryLabel {
                value: value.to_string(),
                label: capitalize(value),
            })
            .collect()
    }

    fn issue(&mut self, kind: FetchKind, request: PageRequest) -> Fetch {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending = Some(ticket);
        Fetch { ticket, kind, request }
    }

    fn entry_for(&self, photos: Vec<Photo>) -> CacheEntry {
        CacheEntry {
            photos,
            has_more: self.has_more,
            total: self.total,
            page: self.page,
        }
    }

    fn adopt(&mut self, state: &mut PortfolioState, entry: &CacheEntry) {
        state.set_photos(entry.photos.clone());
        self.adopt_counters(entry);
        self.phase = GalleryPhase::Loaded;
    }

    fn adopt_counters(&mut self, entry: &CacheEntry) {
        self.page = entry.page;
        self.has_more = entry.has_more;
        self.total = entry.total;
    }

    // The cached `all` listing is a newest-first prefix of every category, so
    // the photos it holds for `category` are that category's first photos.
    // The page counter is set to the last page those photos fill completely;
    // the next fetch may overlap them and the merge drops the duplicates.
    fn derive_from_all(&self, state: &PortfolioState, category: &str) -> Option<CacheEntry> {
        if category == ALL {
            return None;
        }

        let all = state.cached(ALL)?;
        let photos: Vec<Photo> = all
            .photos
            .iter()
            .filter(|photo| photo.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect();
        if photos.is_empty() {
            return None;
        }

        Some(CacheEntry {
            page: photos.len() as u32 / self.page_size,
            has_more: all.has_more,
            total: None,
            photos,
        })
    }
}

/// Rows a tile spans in the grid; portrait shots get two.
pub fn row_span(photo: &Photo) -> u8 {
    if photo.is_portrait() {
        2
    } else {
        1
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
