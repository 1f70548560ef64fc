//! Viewport-backed display bounds.

use platform_host::{DisplayBounds, DisplayService};

#[derive(Debug, Clone, Copy, Default)]
/// Reports `window.innerWidth` / `window.innerHeight` minus the shell chrome.
pub struct BrowserDisplayService {
    /// Height reserved for the menu bar and dock.
    pub reserved_height: i32,
}

impl DisplayService for BrowserDisplayService {
    fn display_bounds(&self) -> Option<DisplayBounds> {
        #[cfg(target_arch = "wasm32")]
        {
            let window = web_sys::window()?;
            let width = window.inner_width().ok()?.as_f64()? as i32;
            let height = window.inner_height().ok()?.as_f64()? as i32;
            Some(DisplayBounds {
                width: width.max(0),
                height: (height - self.reserved_height).max(0),
            })
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = self.reserved_height;
            None
        }
    }
}
