//! Typed host capability contracts shared by the desktop runtime and its adapters.
//!
//! The window manager never reaches into browser globals directly. Preference storage, audible
//! feedback, display bounds and activity clocks are exposed here as small object-safe traits with no-op and
//! in-memory implementations so the runtime can be driven headless in tests.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod audio;
pub mod host;
pub mod storage;
pub mod time;

pub use audio::{
    MemorySoundService, NoopSoundService, SoundCue, SoundFuture, SoundService, ToneSpec,
};
pub use host::{
    DisplayBounds, DisplayService, FixedDisplayService, HostServices, HostStrategy,
    DEFAULT_DISPLAY_BOUNDS,
};
pub use storage::prefs::{
    load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore, PrefsStore, PrefsStoreFuture,
};
pub use time::{unix_time_ms_now, ActivityClock, ManualActivityClock, SystemActivityClock};
