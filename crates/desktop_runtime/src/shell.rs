//! Gesture-to-intent mapping for the menu bar, dock, window palette and global shortcuts.
//!
//! Nothing here keeps window state of its own. Every function reads the current
//! [`WindowStoreState`] and returns the intents the runtime should dispatch.

use std::collections::BTreeMap;

use desktop_app_contract::{AppCommandEvent, AppHostCommand, ApplicationId};
use serde_json::json;

use crate::{
    apps::{app_registry, welcome_application_id},
    launch::LaunchOptions,
    model::{OpenWindowRequest, WindowId, WindowInstance, WindowSize, WindowStoreState},
    reducer::WindowAction,
};

const WELCOME_MESSAGE: &str = "Select an application from the dock or menu bar to begin.";
const FALLBACK_NEW_WINDOW_APP: &str = "notes";

/// Work the runtime performs in response to a shell gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellIntent {
    /// Apply a window-store transition.
    Window(WindowAction),
    /// Run the reuse-or-create launch policy.
    Launch {
        app_id: ApplicationId,
        options: LaunchOptions,
    },
    /// Forward an edit command to the focused app.
    SendCommand(AppCommandEvent),
    ToggleDock,
    ToggleWindowPalette,
}

impl ShellIntent {
    fn launch(app_id: &str) -> Self {
        Self::Launch {
            app_id: ApplicationId::trusted(app_id),
            options: LaunchOptions::default(),
        }
    }
}

/// Modifier state and key of a keydown, detached from the DOM event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
    /// Upper-case tag name of the element the event was dispatched to.
    pub target_tag: Option<String>,
}

impl KeyChord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_ctrl_alt(mut self) -> Self {
        self.ctrl = true;
        self.alt = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn from_keyboard_event(ev: &web_sys::KeyboardEvent) -> Self {
        use wasm_bindgen::JsCast;

        let target_tag = ev
            .target()
            .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
            .map(|element| element.tag_name().to_ascii_uppercase());
        Self {
            key: ev.key(),
            ctrl: ev.ctrl_key(),
            alt: ev.alt_key(),
            shift: ev.shift_key(),
            meta: ev.meta_key(),
            target_tag,
        }
    }

    fn targets_text_field(&self) -> bool {
        matches!(self.target_tag.as_deref(), Some("INPUT" | "TEXTAREA"))
    }
}

/// Global desktop shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// `Alt+F4`.
    CloseActiveWindow,
    /// `Ctrl+Alt+<letter>`.
    Launch(&'static str),
}

/// Maps a keydown to a shortcut. Keys typed into text fields never match.
pub fn resolve_shortcut(chord: &KeyChord) -> Option<Shortcut> {
    if chord.targets_text_field() {
        return None;
    }
    if chord.alt && chord.key == "F4" {
        return Some(Shortcut::CloseActiveWindow);
    }
    if chord.ctrl && chord.alt && !chord.shift {
        let app_id = match chord.key.to_ascii_lowercase().as_str() {
            "n" => "notes",
            "c" => "calculator",
            "b" => "browser",
            _ => return None,
        };
        return Some(Shortcut::Launch(app_id));
    }
    None
}

pub fn shortcut_intents(state: &WindowStoreState, shortcut: Shortcut) -> Vec<ShellIntent> {
    match shortcut {
        Shortcut::CloseActiveWindow => close_active(state),
        Shortcut::Launch(app_id) => vec![ShellIntent::launch(app_id)],
    }
}

/// Menu bar entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    NewWindow,
    CloseWindow,
    Exit,
    Copy,
    Paste,
    ToggleDock,
    ChangeWallpaper,
    ListWindows,
    About,
}

impl MenuAction {
    pub const ALL: [MenuAction; 9] = [
        Self::NewWindow,
        Self::CloseWindow,
        Self::Exit,
        Self::Copy,
        Self::Paste,
        Self::ToggleDock,
        Self::ChangeWallpaper,
        Self::ListWindows,
        Self::About,
    ];

    pub fn label(self, dock_visible: bool) -> &'static str {
        match self {
            Self::NewWindow => "New Window",
            Self::CloseWindow => "Close Window",
            Self::Exit => "Exit MBA OS",
            Self::Copy => "Copy",
            Self::Paste => "Paste",
            Self::ToggleDock if dock_visible => "Hide Dock",
            Self::ToggleDock => "Show Dock",
            Self::ChangeWallpaper => "Change Wallpaper",
            Self::ListWindows => "List Windows",
            Self::About => "About MBA OS",
        }
    }

    /// Entries acting on the active window are disabled while there is none.
    pub fn is_enabled(self, state: &WindowStoreState) -> bool {
        match self {
            Self::CloseWindow | Self::Copy | Self::Paste => state.active_window().is_some(),
            _ => true,
        }
    }
}

pub fn menu_intents(state: &WindowStoreState, action: MenuAction) -> Vec<ShellIntent> {
    match action {
        MenuAction::NewWindow => {
            let app_id = state
                .active_window()
                .map(|w| w.app_id.clone())
                .unwrap_or_else(|| ApplicationId::trusted(FALLBACK_NEW_WINDOW_APP));
            vec![ShellIntent::Launch {
                app_id,
                options: LaunchOptions::default(),
            }]
        }
        MenuAction::CloseWindow => close_active(state),
        MenuAction::Exit => state
            .windows
            .iter()
            .map(|w| ShellIntent::Window(WindowAction::CloseWindow { window_id: w.id }))
            .collect(),
        MenuAction::Copy => command_intent(state, AppHostCommand::Copy),
        MenuAction::Paste => command_intent(state, AppHostCommand::Paste),
        MenuAction::ToggleDock => vec![ShellIntent::ToggleDock],
        MenuAction::ChangeWallpaper => vec![ShellIntent::Window(WindowAction::OpenWindow(
            wallpaper_request(),
        ))],
        MenuAction::ListWindows => vec![ShellIntent::ToggleWindowPalette],
        MenuAction::About => vec![ShellIntent::Window(WindowAction::OpenWindow(
            about_request(),
        ))],
    }
}

fn close_active(state: &WindowStoreState) -> Vec<ShellIntent> {
    state
        .active_window_id
        .map(|window_id| ShellIntent::Window(WindowAction::CloseWindow { window_id }))
        .into_iter()
        .collect()
}

fn command_intent(state: &WindowStoreState, command: AppHostCommand) -> Vec<ShellIntent> {
    state
        .active_window_id
        .map(|window_id| {
            ShellIntent::SendCommand(AppCommandEvent {
                window_id: window_id.runtime_id(),
                command,
            })
        })
        .into_iter()
        .collect()
}

/// Dock badge data for one app with open windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningAppInfo {
    pub count: usize,
    /// Most recently active window of the app.
    pub window_id: WindowId,
    pub minimized: bool,
    pub last_active_at_ms: u64,
}

/// Summarizes open windows per app. Ties on activity time keep the earlier window.
pub fn running_apps(state: &WindowStoreState) -> BTreeMap<ApplicationId, RunningAppInfo> {
    let mut running: BTreeMap<ApplicationId, RunningAppInfo> = BTreeMap::new();
    for window in &state.windows {
        running
            .entry(window.app_id.clone())
            .and_modify(|info| {
                info.count += 1;
                if window.last_active_at_ms > info.last_active_at_ms {
                    info.window_id = window.id;
                    info.minimized = window.minimized;
                    info.last_active_at_ms = window.last_active_at_ms;
                }
            })
            .or_insert(RunningAppInfo {
                count: 1,
                window_id: window.id,
                minimized: window.minimized,
                last_active_at_ms: window.last_active_at_ms,
            });
    }
    running
}

/// Dock icon press: launch when nothing runs, otherwise bring back the most recent window.
pub fn dock_click_intent(state: &WindowStoreState, app_id: &ApplicationId) -> ShellIntent {
    match state.latest_window_for_app(app_id) {
        None => ShellIntent::Launch {
            app_id: app_id.clone(),
            options: LaunchOptions::default(),
        },
        Some(window) if window.minimized => ShellIntent::Window(WindowAction::RestoreWindow {
            window_id: window.id,
        }),
        Some(window) => ShellIntent::Window(WindowAction::FocusWindow {
            window_id: window.id,
        }),
    }
}

/// Dock entry for one catalog app.
#[derive(Debug, Clone, PartialEq)]
pub struct DockItem {
    pub app_id: ApplicationId,
    pub title: &'static str,
    pub icon: &'static str,
    pub running: Option<RunningAppInfo>,
}

pub fn dock_items(state: &WindowStoreState) -> Vec<DockItem> {
    let running = running_apps(state);
    app_registry()
        .iter()
        .map(|entry| {
            let app_id = entry.app_id();
            DockItem {
                running: running.get(&app_id).copied(),
                app_id,
                title: entry.title,
                icon: entry.icon,
            }
        })
        .collect()
}

/// Icon on the desktop surface that launches its app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesktopShortcut {
    pub app_id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

impl DesktopShortcut {
    pub fn aria_label(&self) -> String {
        format!("Open {}", self.label)
    }

    pub fn launch_intent(&self) -> ShellIntent {
        ShellIntent::launch(self.app_id)
    }
}

const DESKTOP_SHORTCUTS: [DesktopShortcut; 3] = [
    DesktopShortcut {
        app_id: "notes",
        label: "Notes",
        icon: "📝",
    },
    DesktopShortcut {
        app_id: "todo",
        label: "Tasks",
        icon: "✅",
    },
    DesktopShortcut {
        app_id: "calendar",
        label: "Calendar",
        icon: "📅",
    },
];

pub fn desktop_shortcuts() -> &'static [DesktopShortcut] {
    &DESKTOP_SHORTCUTS
}

/// Whether a key pressed on a focused desktop shortcut opens it. Double-click always does.
pub fn activates_desktop_shortcut(key: &str) -> bool {
    matches!(key, "Enter" | " ")
}

/// Windows front to back, as listed by the window palette.
pub fn window_palette(state: &WindowStoreState) -> Vec<&WindowInstance> {
    state.windows_by_stack()
}

pub fn palette_select_action(window: &WindowInstance) -> WindowAction {
    if window.minimized {
        WindowAction::RestoreWindow {
            window_id: window.id,
        }
    } else {
        WindowAction::FocusWindow {
            window_id: window.id,
        }
    }
}

pub fn desktop_background_action() -> WindowAction {
    WindowAction::ClearActive
}

/// Welcome window opened once at boot.
pub fn welcome_request() -> OpenWindowRequest {
    let mut req = OpenWindowRequest::new(welcome_application_id(), "Welcome Center");
    req.size = Some(WindowSize {
        width: 480,
        height: 360,
    });
    req.min_size = Some(WindowSize {
        width: 380,
        height: 280,
    });
    req.resizable = Some(true);
    req.payload = json!({ "message": WELCOME_MESSAGE });
    req
}

pub fn about_request() -> OpenWindowRequest {
    welcome_pane("About MBA OS", 420, 280, "about")
}

pub fn wallpaper_request() -> OpenWindowRequest {
    welcome_pane("Wallpapers", 420, 320, "wallpaper")
}

fn welcome_pane(title: &str, width: i32, height: i32, purpose: &str) -> OpenWindowRequest {
    let mut req = OpenWindowRequest::new(welcome_application_id(), title);
    req.size = Some(WindowSize { width, height });
    req.payload = json!({ "purpose": purpose });
    req
}
