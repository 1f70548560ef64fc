use std::rc::Rc;

use platform_host::{HostServices, HostStrategy, SystemActivityClock};

use crate::{BrowserDisplayService, WebAudioSoundService, WebPrefsStore};

/// Combined height of the menu bar and dock, excluded from the maximize area.
pub const SHELL_CHROME_HEIGHT: i32 = 28 + 72;

/// Returns the compile-time selected host strategy.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(target_arch = "wasm32")]
    {
        HostStrategy::Browser
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        HostStrategy::Headless
    }
}

/// Assembles the browser host bundle injected into the desktop runtime.
pub fn build_host_services() -> HostServices {
    HostServices {
        prefs: Rc::new(WebPrefsStore),
        sound: Rc::new(WebAudioSoundService::default()),
        display: Rc::new(BrowserDisplayService {
            reserved_height: SHELL_CHROME_HEIGHT,
        }),
        clock: Rc::new(SystemActivityClock::default()),
        host_strategy: selected_host_strategy(),
    }
}
