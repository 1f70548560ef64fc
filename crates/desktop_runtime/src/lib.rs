//! Desktop window-management runtime: window store, app catalog, launch policy and shell wiring.

pub mod app_runtime;
pub mod apps;
pub mod effect_executor;
pub mod host;
pub mod launch;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod runtime_context;
pub mod shell;
pub mod window_manager;

pub use app_runtime::{mount_context, mount_window_content, ContentState, WindowAppSession};
pub use apps::{app_definition, app_registry, AppCategory, AppDefinition};
pub use launch::{launch_app, plan_launch, LaunchOptions, LaunchPlan};
pub use model::*;
pub use persistence::{ThemePreferences, Wallpaper};
pub use reducer::{reduce_windows, replay, transition, ReducerError, RuntimeEffect, WindowAction};
pub use runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};
