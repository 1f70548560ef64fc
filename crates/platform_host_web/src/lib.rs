//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! Every adapter compiles on native targets too, where it degrades to the same behavior as the
//! matching no-op service. That keeps the desktop runtime testable without a browser.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Host bundle assembly for the browser entry point.
pub mod adapters;
pub mod audio;
pub mod display;
pub mod storage;

pub use adapters::{build_host_services, selected_host_strategy, SHELL_CHROME_HEIGHT};
pub use audio::WebAudioSoundService;
pub use display::BrowserDisplayService;
pub use storage::local_prefs::WebPrefsStore;
