use std::time::Duration;

use tokio::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerSource {
    Intersection,
    Scroll,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

impl ScrollMetrics {
    pub fn distance_to_bottom(&self) -> f64 {
        (self.document_height - (self.scroll_top + self.viewport_height)).max(0.0)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TriggerConfig {
    /// Distance from the bottom at which a slow scroll starts loading.
    pub threshold_px: f64,
    /// How long the sentinel must stay visible before it counts.
    pub debounce: Duration,
    /// How far ahead, in time, a fast scroll is projected.
    pub lookahead: Duration,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            threshold_px: 800.0,
            debounce: Duration::from_millis(100),
            lookahead: Duration::from_millis(500),
        }
    }
}

/// Decides when the bottom of the grid is close enough to load more.
///
/// Two independent signals feed it: sentinel visibility and scroll position.
/// Either one may fire; the gallery's in-flight guard keeps that down to a
/// single request.
#[derive(Debug)]
pub struct LoadTrigger {
    config: TriggerConfig,
    sentinel_visible_since: Option<Instant>,
    sentinel_fired: bool,
    last_scroll: Option<(Instant, f64)>,
}

impl LoadTrigger {
    pub fn new(config: TriggerConfig) -> Self {
        Self {
            config,
            sentinel_visible_since: None,
            sentinel_fired: false,
            last_scroll: None,
        }
    }

    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    pub fn on_intersection(&mut self, visible: bool, now: Instant) {
        if !visible {
            self.sentinel_visible_since = None;
            self.sentinel_fired = false;
        } else if self.sentinel_visible_since.is_none() {
            self.sentinel_visible_since = Some(now);
        }
    }

    /// Fires once per visibility span, after the debounce has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<TriggerSource> {
        let since = self.sentinel_visible_since?;
        if self.sentinel_fired || now.duration_since(since) < self.config.debounce {
            return None;
        }

        self.sentinel_fired = true;
        Some(TriggerSource::Intersection)
    }

    /// Lets a still-visible sentinel fire again, e.g. after a page was appended
    /// that did not push it out of view.
    pub fn rearm(&mut self) {
        self.sentinel_fired = false;
    }

    pub fn on_scroll(&mut self, metrics: ScrollMetrics, now: Instant) -> Option<TriggerSource> {
        let velocity = match self.last_scroll {
            Some((at, top)) => {
                let elapsed = now.duration_since(at).as_secs_f64() * 1000.0;
                if elapsed > 0.0 {
                    ((metrics.scroll_top - top) / elapsed).max(0.0)
                } else {
                    0.0
                }
            }
            None => 0.0,
        };
        self.last_scroll = Some((now, metrics.scroll_top));

        let lookahead_ms = self.config.lookahead.as_secs_f64() * 1000.0;
        let reach = self.config.threshold_px + velocity * lookahead_ms;

        (metrics.distance_to_bottom() <= reach).then_some(TriggerSource::Scroll)
    }
}

impl Default for LoadTrigger {
    fn default() -> Self {
        Self::new(TriggerConfig::default())
    }
}
