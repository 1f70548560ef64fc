//! Window-manager data model shared by the reducer, launch coordinator and shell surface.

use desktop_app_contract::{ApplicationId, WindowRuntimeId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Size given to windows opened without an explicit size.
pub const DEFAULT_WINDOW_SIZE: WindowSize = WindowSize {
    width: 640,
    height: 420,
};
/// Interactive-resize floor for windows opened without an explicit minimum.
pub const DEFAULT_MIN_WINDOW_SIZE: WindowSize = WindowSize {
    width: 360,
    height: 260,
};
/// Viewport used by maximize when neither the caller nor the host supplies one.
pub const DEFAULT_VIEWPORT: WindowSize = WindowSize {
    width: 1280,
    height: 720,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl WindowId {
    pub fn runtime_id(self) -> WindowRuntimeId {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

impl WindowPosition {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: i32,
    pub height: i32,
}

impl Default for WindowSize {
    fn default() -> Self {
        DEFAULT_WINDOW_SIZE
    }
}

/// One open, user-manipulable application surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowInstance {
    pub id: WindowId,
    pub app_id: ApplicationId,
    pub title: String,
    pub position: WindowPosition,
    pub size: WindowSize,
    pub min_size: WindowSize,
    /// Geometry to return to on un-maximize. `Some` only while `maximized`.
    pub previous_position: Option<WindowPosition>,
    pub previous_size: Option<WindowSize>,
    /// Stacking order; higher draws on top.
    pub z_index: u32,
    pub is_focused: bool,
    pub minimized: bool,
    pub maximized: bool,
    pub resizable: bool,
    pub created_at_ms: u64,
    /// Bumped on focus, move and resize. Drives "most recent window per app" lookups.
    pub last_active_at_ms: u64,
    pub payload: Value,
}

/// The window collection plus the active-window pointer.
///
/// `windows` keeps insertion order; stacking order lives in [`WindowInstance::z_index`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowStoreState {
    pub next_window_id: u64,
    pub windows: Vec<WindowInstance>,
    pub active_window_id: Option<WindowId>,
}

impl Default for WindowStoreState {
    fn default() -> Self {
        Self {
            next_window_id: 1,
            windows: Vec::new(),
            active_window_id: None,
        }
    }
}

impl WindowStoreState {
    pub fn window(&self, window_id: WindowId) -> Option<&WindowInstance> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn active_window(&self) -> Option<&WindowInstance> {
        self.active_window_id.and_then(|id| self.window(id))
    }

    pub fn focused_window_id(&self) -> Option<WindowId> {
        self.windows.iter().find(|w| w.is_focused).map(|w| w.id)
    }

    /// Windows ordered front to back.
    pub fn windows_by_stack(&self) -> Vec<&WindowInstance> {
        let mut ordered: Vec<&WindowInstance> = self.windows.iter().collect();
        ordered.sort_by(|a, b| b.z_index.cmp(&a.z_index));
        ordered
    }

    /// Most recently active window owned by `app_id`, if any. Ties keep the earlier window.
    pub fn latest_window_for_app(&self, app_id: &ApplicationId) -> Option<&WindowInstance> {
        self.windows
            .iter()
            .filter(|w| &w.app_id == app_id)
            .reduce(|best, w| {
                if w.last_active_at_ms > best.last_active_at_ms {
                    w
                } else {
                    best
                }
            })
    }
}

/// Parameters for opening a window directly, bypassing the launch reuse policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub app_id: ApplicationId,
    pub title: String,
    pub position: Option<WindowPosition>,
    pub size: Option<WindowSize>,
    pub min_size: Option<WindowSize>,
    pub resizable: Option<bool>,
    pub payload: Value,
}

impl OpenWindowRequest {
    pub fn new(app_id: ApplicationId, title: impl Into<String>) -> Self {
        Self {
            app_id,
            title: title.into(),
            position: None,
            size: None,
            min_size: None,
            resizable: None,
            payload: Value::Null,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}
