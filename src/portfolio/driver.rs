use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::debug;

use super::client::PhotoSource;
use super::gallery::{Fetch, Gallery, Resolution};
use super::store::{PortfolioHandle, StoreError};
use super::trigger::{LoadTrigger, ScrollMetrics, TriggerConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and applied.
    Applied,
    /// Served from state already in memory, nothing was requested.
    Cached,
    /// The gallery was busy or had nothing more to load.
    Skipped,
    /// The response arrived after it stopped being relevant.
    Discarded,
}

/// Runs the gallery's fetches against a [`PhotoSource`].
///
/// Clones share the same gallery, so scroll and intersection handlers can
/// each hold one. Dropping the view should call [`GalleryDriver::unmount`],
/// which cancels whatever is in flight.
#[derive(Clone)]
pub struct GalleryDriver {
    source: Arc<dyn PhotoSource>,
    store: PortfolioHandle,
    gallery: Arc<Mutex<Gallery>>,
    trigger: Arc<Mutex<LoadTrigger>>,
    cancel: Arc<watch::Sender<bool>>,
}

impl GalleryDriver {
    pub fn new(source: Arc<dyn PhotoSource>, store: PortfolioHandle, gallery: Gallery) -> Self {
        Self::with_trigger(source, store, gallery, TriggerConfig::default())
    }

    pub fn with_trigger(
        source: Arc<dyn PhotoSource>,
        store: PortfolioHandle,
        gallery: Gallery,
        trigger: TriggerConfig,
    ) -> Self {
        let (cancel, _) = watch::channel(false);
        Self {
            source,
            store,
            gallery: Arc::new(Mutex::new(gallery)),
            trigger: Arc::new(Mutex::new(LoadTrigger::new(trigger))),
            cancel: Arc::new(cancel),
        }
    }

    pub fn gallery(&self) -> MutexGuard<'_, Gallery> {
        self.gallery.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn store(&self) -> &PortfolioHandle {
        &self.store
    }

    fn trigger(&self) -> MutexGuard<'_, LoadTrigger> {
        self.trigger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mounting again after [`GalleryDriver::unmount`] lifts the cancellation;
    /// responses issued before the unmount stay stale through their tickets.
    pub async fn mount(&self) -> Result<LoadOutcome, StoreError> {
        self.cancel.send_replace(false);
        let fetch = self.store.with(|state| self.gallery().mount(state))?;
        match fetch {
            Some(fetch) => self.run(fetch).await,
            None => Ok(LoadOutcome::Cached),
        }
    }

    pub async fn select_category(&self, category: &str) -> Result<LoadOutcome, StoreError> {
        let fetch = self
            .store
            .with(|state| self.gallery().select_category(state, category))?;
        match fetch {
            Some(fetch) => self.run(fetch).await,
            None => Ok(LoadOutcome::Cached),
        }
    }

    pub async fn load_more(&self) -> Result<LoadOutcome, StoreError> {
        let fetch = self.store.with(|state| self.gallery().load_more(state))?;
        match fetch {
            Some(fetch) => {
                let outcome = self.run(fetch).await;
                self.trigger().rearm();
                outcome
            }
            None => Ok(LoadOutcome::Skipped),
        }
    }

    /// Cancels in-flight requests; their responses are never applied.
    pub fn unmount(&self) {
        self.cancel.send_replace(true);
        self.gallery().unmount();
    }

    pub fn on_scroll(&self, metrics: ScrollMetrics) -> Option<JoinHandle<Result<LoadOutcome, StoreError>>> {
        self.trigger().on_scroll(metrics, Instant::now())?;
        if self.gallery().is_loading_more() {
            return None;
        }

        let driver = self.clone();
        Some(tokio::spawn(async move { driver.load_more().await }))
    }

    /// Sentinel visibility changed. When it becomes visible a check is
    /// scheduled after the debounce delay.
    pub fn on_intersection(&self, visible: bool) -> Option<JoinHandle<Result<LoadOutcome, StoreError>>> {
        let debounce = {
            let mut trigger = self.trigger();
            trigger.on_intersection(visible, Instant::now());
            trigger.config().debounce
        };
        if !visible {
            return None;
        }

        let driver = self.clone();
        Some(tokio::spawn(async move {
            sleep(debounce).await;
            if driver.trigger().poll(Instant::now()).is_none() {
                return Ok(LoadOutcome::Skipped);
            }
            driver.load_more().await
        }))
    }

    async fn run(&self, fetch: Fetch) -> Result<LoadOutcome, StoreError> {
        let mut cancelled = self.cancel.subscribe();
        if *cancelled.borrow() {
            return Ok(LoadOutcome::Discarded);
        }

        let result = tokio::select! {
            result = self.source.fetch_page(&fetch.request) => result,
            _ = until_cancelled(&mut cancelled) => {
                debug!(ticket = fetch.ticket, "photo request cancelled");
                return Ok(LoadOutcome::Discarded);
            }
        };

        let resolution = self
            .store
            .with(|state| self.gallery().resolve(state, &fetch, result))?;

        Ok(match resolution {
            Resolution::Applied => LoadOutcome::Applied,
            Resolution::Stale => LoadOutcome::Discarded,
        })
    }
}

async fn until_cancelled(cancelled: &mut watch::Receiver<bool>) {
    // A dropped sender also ends the wait.
    let _ = cancelled.wait_for(|cancelled| *cancelled).await;
}
