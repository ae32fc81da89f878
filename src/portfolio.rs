//! Client-side view state of the portfolio: the photo store, the gallery's
//! incremental loading, and the layout shell's hero preload.

pub mod client;
pub mod driver;
pub mod gallery;
pub mod layout;
pub mod lightbox;
pub mod store;
pub mod thumbnail;
pub mod trigger;

pub use client::{PageRequest, PhotoApiClient, PhotoSource};
pub use driver::{GalleryDriver, LoadOutcome};
pub use gallery::{Gallery, GalleryPhase};
pub use layout::{HeroImage, LayoutShell};
pub use store::{PortfolioHandle, PortfolioProvider, PortfolioState};
