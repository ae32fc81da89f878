use std::collections::HashMap;

pub const MAX_RETRIES: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThumbnailStatus {
    NotLoaded,
    Loaded,
    Failed { can_retry: bool },
}

#[derive(Clone, Copy, Debug, Default)]
struct Entry {
    loaded: bool,
    failed: bool,
    retries: u32,
}

/// Per-photo load state of the grid tiles, keyed by photo id.
#[derive(Debug, Default)]
pub struct ThumbnailTracker {
    entries: HashMap<String, Entry>,
}

impl ThumbnailTracker {
    pub fn status(&self, id: &str) -> ThumbnailStatus {
        match self.entries.get(id) {
            Some(entry) if entry.failed => ThumbnailStatus::Failed {
                can_retry: entry.retries < MAX_RETRIES,
            },
            Some(entry) if entry.loaded => ThumbnailStatus::Loaded,
            _ => ThumbnailStatus::NotLoaded,
        }
    }

    pub fn mark_loaded(&mut self, id: &str) {
        let entry = self.entries.entry(id.to_string()).or_default();
        entry.loaded = true;
        entry.failed = false;
    }

    pub fn mark_failed(&mut self, id: &str) {
        let entry = self.entries.entry(id.to_string()).or_default();
        entry.loaded = false;
        entry.failed = true;
    }

    /// Clears the failure so the tile loads again. Returns the attempt number,
    /// or `None` when the tile is not failed or has used up its retries.
    pub fn retry(&mut self, id: &str) -> Option<u32> {
        let entry = self.entries.get_mut(id)?;
        if !entry.failed || entry.retries >= MAX_RETRIES {
            return None;
        }

        entry.failed = false;
        entry.retries += 1;
        Some(entry.retries)
    }

    pub fn retries(&self, id: &str) -> u32 {
        self.entries.get(id).map_or(0, |entry| entry.retries)
    }
}

/// Adds a cache-busting attempt marker so a retried tile does not hit the
/// browser's cached failure.
pub fn retry_url(url: &str, attempt: u32) -> String {
    if attempt == 0 {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}retry={attempt}")
}
