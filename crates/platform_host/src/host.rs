//! Host service bundle injected into the desktop runtime.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::{
    ActivityClock, MemoryPrefsStore, MemorySoundService, NoopPrefsStore, NoopSoundService,
    PrefsStore, SoundService, SystemActivityClock,
};

/// Display bounds used when the host cannot report any.
pub const DEFAULT_DISPLAY_BOUNDS: DisplayBounds = DisplayBounds {
    width: 1280,
    height: 720,
};

/// Stable host strategy selected for the current composition path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Browser-backed runtime composition.
    Browser,
    /// Headless composition with in-memory or no-op adapters.
    Headless,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Headless => "headless",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Size of the area windows are laid out in, in CSS pixels.
pub struct DisplayBounds {
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

/// Reports the current display bounds.
pub trait DisplayService {
    /// Returns the current bounds, or `None` when the host cannot tell.
    fn display_bounds(&self) -> Option<DisplayBounds>;
}

#[derive(Debug, Clone, Copy)]
/// Display service with constant bounds.
pub struct FixedDisplayService(pub DisplayBounds);

impl Default for FixedDisplayService {
    fn default() -> Self {
        Self(DEFAULT_DISPLAY_BOUNDS)
    }
}

impl DisplayService for FixedDisplayService {
    fn display_bounds(&self) -> Option<DisplayBounds> {
        Some(self.0)
    }
}

/// Runtime-selected host service bundle.
#[derive(Clone)]
pub struct HostServices {
    /// Shell-level preference store.
    pub prefs: Rc<dyn PrefsStore>,
    /// Audible feedback output.
    pub sound: Rc<dyn SoundService>,
    /// Display bounds query.
    pub display: Rc<dyn DisplayService>,
    /// Stamps window activity.
    pub clock: Rc<dyn ActivityClock>,
    /// Stable strategy identifier for diagnostics.
    pub host_strategy: HostStrategy,
}

impl HostServices {
    /// Bundle with no persistence and no audio.
    pub fn noop() -> Self {
        Self {
            prefs: Rc::new(NoopPrefsStore),
            sound: Rc::new(NoopSoundService),
            display: Rc::new(FixedDisplayService::default()),
            clock: Rc::new(SystemActivityClock::default()),
            host_strategy: HostStrategy::Headless,
        }
    }

    /// Bundle backed by in-memory adapters.
    pub fn memory(prefs: MemoryPrefsStore, sound: MemorySoundService) -> Self {
        Self {
            prefs: Rc::new(prefs),
            sound: Rc::new(sound),
            display: Rc::new(FixedDisplayService::default()),
            clock: Rc::new(SystemActivityClock::default()),
            host_strategy: HostStrategy::Headless,
        }
    }

    /// Replaces the activity clock, e.g. with a [`crate::ManualActivityClock`] for replays.
    pub fn with_clock(mut self, clock: Rc<dyn ActivityClock>) -> Self {
        self.clock = clock;
        self
    }
}
