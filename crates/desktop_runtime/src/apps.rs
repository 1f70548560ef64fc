//! Static application catalog and registry-backed content loading.

use desktop_app_contract::{
    AppContentFn, AppContentLoader, AppModule, AppModuleFuture, AppMountContext, ApplicationId,
};
use futures::FutureExt;
use leptos::*;
use serde::{Deserialize, Serialize};

use crate::model::{OpenWindowRequest, WindowSize};

/// App id of the built-in welcome/about/wallpaper panes. Opened directly, never listed.
pub const WELCOME_APP_ID: &str = "welcome";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppCategory {
    Productivity,
    Media,
    Web,
}

/// Immutable catalog entry for a launchable application.
#[derive(Clone, Copy)]
pub struct AppDefinition {
    pub id: &'static str,
    pub title: &'static str,
    /// Single glyph shown in the dock and window title bar.
    pub icon: &'static str,
    pub category: AppCategory,
    pub description: &'static str,
    pub default_size: WindowSize,
    pub min_size: WindowSize,
    pub resizable: bool,
    pub content: AppContentFn,
}

impl std::fmt::Debug for AppDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppDefinition")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

impl AppDefinition {
    pub fn app_id(&self) -> ApplicationId {
        ApplicationId::trusted(self.id)
    }

    /// Open request carrying this entry's title, size, minimum and resizability.
    pub fn open_request(&self) -> OpenWindowRequest {
        let mut req = OpenWindowRequest::new(self.app_id(), self.title);
        req.size = Some(self.default_size);
        req.min_size = Some(self.min_size);
        req.resizable = Some(self.resizable);
        req
    }
}

const fn size(width: i32, height: i32) -> WindowSize {
    WindowSize { width, height }
}

const APP_REGISTRY: [AppDefinition; 6] = [
    AppDefinition {
        id: "calculator",
        title: "Calculator",
        icon: "🧮",
        category: AppCategory::Productivity,
        description: "Perform quick calculations with memory support.",
        default_size: size(320, 420),
        min_size: size(280, 360),
        resizable: false,
        content: load_placeholder,
    },
    AppDefinition {
        id: "notes",
        title: "Notes",
        icon: "📝",
        category: AppCategory::Productivity,
        description: "Write, organize, and export notes.",
        default_size: size(640, 480),
        min_size: size(420, 320),
        resizable: true,
        content: load_placeholder,
    },
    AppDefinition {
        id: "calendar",
        title: "Calendar",
        icon: "📅",
        category: AppCategory::Productivity,
        description: "View months at a glance and manage events.",
        default_size: size(620, 480),
        min_size: size(480, 360),
        resizable: true,
        content: load_placeholder,
    },
    AppDefinition {
        id: "todo",
        title: "Tasks + Pomodoro",
        icon: "⏱️",
        category: AppCategory::Productivity,
        description: "Manage tasks and run pomodoro sessions.",
        default_size: size(780, 520),
        min_size: size(620, 420),
        resizable: true,
        content: load_placeholder,
    },
    AppDefinition {
        id: "music",
        title: "Winamp Player",
        icon: "🎵",
        category: AppCategory::Media,
        description: "Play music with playlists and visualizers.",
        default_size: size(520, 420),
        min_size: size(420, 320),
        resizable: true,
        content: load_placeholder,
    },
    AppDefinition {
        id: "browser",
        title: "Web Browser",
        icon: "🌐",
        category: AppCategory::Web,
        description: "Lightweight in-app web browser.",
        default_size: size(900, 560),
        min_size: size(640, 420),
        resizable: true,
        content: load_placeholder,
    },
];

/// Every launchable app in declared order.
pub fn app_registry() -> &'static [AppDefinition] {
    &APP_REGISTRY
}

/// Looks up a catalog entry. The welcome pseudo-app is not listed and yields `None`.
pub fn app_definition(app_id: &ApplicationId) -> Option<&'static AppDefinition> {
    app_registry()
        .iter()
        .find(|entry| entry.id == app_id.as_str())
}

pub fn welcome_application_id() -> ApplicationId {
    ApplicationId::trusted(WELCOME_APP_ID)
}

fn load_placeholder() -> AppModuleFuture {
    async { Ok(AppModule::new(mount_placeholder)) }.boxed_local()
}

fn load_welcome() -> AppModuleFuture {
    async { Ok(AppModule::new(mount_welcome)) }.boxed_local()
}

fn mount_placeholder(context: AppMountContext) -> View {
    let (title, description) = app_definition(&context.app_id)
        .map(|entry| (entry.title, entry.description))
        .unwrap_or(("Application", ""));
    view! {
        <div class="app app-placeholder" data-window-id=context.window_id.to_string()>
            <h2>{title}</h2>
            <p>{description}</p>
        </div>
    }
    .into_view()
}

fn mount_welcome(context: AppMountContext) -> View {
    let message = context
        .payload
        .get("message")
        .and_then(|value| value.as_str())
        .unwrap_or_default()
        .to_string();
    let purpose = context
        .payload
        .get("purpose")
        .and_then(|value| value.as_str())
        .unwrap_or("welcome")
        .to_string();
    view! {
        <div class="app app-welcome" data-purpose=purpose>
            <p>{message}</p>
        </div>
    }
    .into_view()
}

#[derive(Debug, Clone, Copy, Default)]
/// Content loader that resolves modules through the static catalog.
pub struct RegistryContentLoader;

impl AppContentLoader for RegistryContentLoader {
    fn load(&self, app_id: &ApplicationId) -> AppModuleFuture {
        if app_id.as_str() == WELCOME_APP_ID {
            return load_welcome();
        }
        match app_definition(app_id) {
            Some(entry) => (entry.content)(),
            None => {
                let message = format!("no content registered for app `{app_id}`");
                async move { Err(message) }.boxed_local()
            }
        }
    }
}
