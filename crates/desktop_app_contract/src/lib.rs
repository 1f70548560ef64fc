//! Shared contract types between the desktop window manager runtime and hosted apps.
//!
//! A hosted app only ever sees its own window id and the opaque payload it was launched with.
//! It talks back to the shell through [`AppCommandEvent`] values which the runtime routes to the
//! focused window; the window manager itself never interprets them.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use futures::future::LocalBoxFuture;
use leptos::View;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable identifier for a runtime-managed window.
pub type WindowRuntimeId = u64;

/// Stable identifier for a launchable application.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Returns an app identifier when `raw` is a lowercase slug (`notes`, `todo`, `music-2`).
    pub fn new(raw: impl Into<String>) -> Result<Self, String> {
        let raw = raw.into();
        if is_valid_application_id(&raw) {
            Ok(Self(raw))
        } else {
            Err(format!(
                "invalid application id `{raw}`; expected a lowercase slug"
            ))
        }
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Creates an id without validation for compile-time trusted constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_valid_application_id(raw: &str) -> bool {
    if raw.is_empty() || raw.len() > 32 {
        return false;
    }
    let bytes = raw.as_bytes();
    if !bytes[0].is_ascii_lowercase() || raw.ends_with('-') {
        return false;
    }
    bytes
        .iter()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
}

/// DOM id an app gives its primary text field so the shell can focus it when the window opens.
pub fn window_primary_input_dom_id(window_id: WindowRuntimeId) -> String {
    format!("desktop-window-{window_id}-primary-input")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Commands the shell forwards to a hosted app (menu bar Edit actions).
pub enum AppHostCommand {
    /// Copy the app's current selection.
    Copy,
    /// Paste into the app's current insertion point.
    Paste,
}

impl AppHostCommand {
    /// Returns a stable string token for logging.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Paste => "paste",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A host command addressed to one window.
pub struct AppCommandEvent {
    /// Target window.
    pub window_id: WindowRuntimeId,
    /// Command to apply.
    pub command: AppHostCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Lifecycle events emitted by the desktop window manager.
pub enum AppLifecycleEvent {
    /// App view has been mounted into a managed window.
    Mounted,
    /// Window became focused.
    Focused,
    /// Window lost focus.
    Blurred,
    /// Window was minimized.
    Minimized,
    /// Window was restored from the minimized state.
    Restored,
    /// Window was closed.
    Closed,
}

impl AppLifecycleEvent {
    /// Returns a stable string token for persistence/debugging hooks.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Mounted => "mounted",
            Self::Focused => "focused",
            Self::Blurred => "blurred",
            Self::Minimized => "minimized",
            Self::Restored => "restored",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// App mount context injected by the desktop runtime per window instance.
pub struct AppMountContext {
    /// App id from the runtime catalog.
    pub app_id: ApplicationId,
    /// Stable runtime window id.
    pub window_id: WindowRuntimeId,
    /// Opaque payload supplied at launch time.
    pub payload: Value,
}

/// Static app mount function.
pub type AppMountFn = fn(AppMountContext) -> View;

#[derive(Debug, Clone, Copy)]
/// Loaded app module able to render into a managed window.
pub struct AppModule {
    mount_fn: AppMountFn,
}

impl AppModule {
    /// Creates a module from a mount function.
    pub const fn new(mount_fn: AppMountFn) -> Self {
        Self { mount_fn }
    }

    /// Mounts the app view with a runtime-provided context.
    pub fn mount(self, context: AppMountContext) -> View {
        (self.mount_fn)(context)
    }
}

/// Future resolving to a loaded [`AppModule`].
pub type AppModuleFuture = LocalBoxFuture<'static, Result<AppModule, String>>;

/// Deferred module loader stored on registry entries.
pub type AppContentFn = fn() -> AppModuleFuture;

/// Capability that turns an app id into a renderable module, possibly asynchronously.
pub trait AppContentLoader {
    /// Starts loading the module for `app_id`.
    fn load(&self, app_id: &ApplicationId) -> AppModuleFuture;
}
