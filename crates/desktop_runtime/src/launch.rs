//! Reuse-or-create launch policy.
//!
//! Launching an app focuses its visible window when one exists and otherwise opens a new window
//! from the catalog defaults. Opening a window directly through
//! [`WindowAction::OpenWindow`](crate::reducer::WindowAction::OpenWindow) bypasses reuse.

use desktop_app_contract::ApplicationId;
use serde_json::Value;

use crate::{
    apps::app_definition,
    model::{OpenWindowRequest, WindowId, WindowInstance, WindowSize, WindowStoreState},
    reducer::{reduce_windows, WindowAction},
    window_manager::cascade_position,
};

/// Caller overrides merged over the catalog defaults when a new window is created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchOptions {
    pub title: Option<String>,
    pub size: Option<WindowSize>,
    pub min_size: Option<WindowSize>,
    pub resizable: Option<bool>,
    pub payload: Option<Value>,
}

/// Outcome of the reuse policy, before it is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum LaunchPlan {
    /// Bring an existing visible window to the front.
    Focus(WindowId),
    /// Create a new window.
    Open(OpenWindowRequest),
}

impl LaunchPlan {
    pub fn into_action(self) -> WindowAction {
        match self {
            Self::Focus(window_id) => WindowAction::FocusWindow { window_id },
            Self::Open(req) => WindowAction::OpenWindow(req),
        }
    }
}

/// Decides how to launch `app_id` against the current store.
///
/// Returns `None` for ids that are not in the catalog. A minimized window is not reused.
pub fn plan_launch(
    state: &WindowStoreState,
    app_id: &ApplicationId,
    options: LaunchOptions,
) -> Option<LaunchPlan> {
    let entry = app_definition(app_id)?;

    if let Some(existing) = state
        .windows
        .iter()
        .find(|w| &w.app_id == app_id && !w.minimized)
    {
        return Some(LaunchPlan::Focus(existing.id));
    }

    let mut req = entry.open_request();
    req.position = Some(cascade_position(state.windows.len()));
    if let Some(title) = options.title {
        req.title = title;
    }
    if let Some(size) = options.size {
        req.size = Some(size);
    }
    if let Some(min_size) = options.min_size {
        req.min_size = Some(min_size);
    }
    if let Some(resizable) = options.resizable {
        req.resizable = Some(resizable);
    }
    if let Some(payload) = options.payload {
        req.payload = payload;
    }
    Some(LaunchPlan::Open(req))
}

/// Plans and applies a launch, returning the focused or newly created window.
pub fn launch_app(
    state: &mut WindowStoreState,
    app_id: &ApplicationId,
    options: LaunchOptions,
    now_ms: u64,
) -> Option<WindowInstance> {
    let plan = plan_launch(state, app_id, options)?;
    let target = match &plan {
        LaunchPlan::Focus(window_id) => Some(*window_id),
        LaunchPlan::Open(_) => None,
    };
    reduce_windows(state, plan.into_action(), now_ms).ok()?;
    match target {
        Some(window_id) => state.window(window_id).cloned(),
        None => state.windows.last().cloned(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::WindowPosition;

    fn app(id: &str) -> ApplicationId {
        ApplicationId::trusted(id)
    }

    #[test]
    fn unknown_app_is_rejected_without_mutation() {
        let mut state = WindowStoreState::default();
        assert_eq!(
            plan_launch(&state, &app("paint"), LaunchOptions::default()),
            None
        );
        assert!(launch_app(&mut state, &app("paint"), LaunchOptions::default(), 1).is_none());
        assert_eq!(state, WindowStoreState::default());
    }

    #[test]
    fn first_launch_uses_catalog_defaults_and_cascade() {
        let mut state = WindowStoreState::default();
        let window =
            launch_app(&mut state, &app("calculator"), LaunchOptions::default(), 5).expect("open");

        assert_eq!(window.title, "Calculator");
        assert_eq!(window.position, WindowPosition { x: 40, y: 60 });
        assert_eq!(
            window.size,
            WindowSize {
                width: 320,
                height: 420
            }
        );
        assert!(!window.resizable);
        assert_eq!(state.active_window_id, Some(window.id));
    }

    #[test]
    fn relaunch_reuses_visible_window() {
        let mut state = WindowStoreState::default();
        let notes = launch_app(&mut state, &app("notes"), LaunchOptions::default(), 1).unwrap();
        launch_app(&mut state, &app("calendar"), LaunchOptions::default(), 2).unwrap();

        let again = launch_app(&mut state, &app("notes"), LaunchOptions::default(), 3).unwrap();
        assert_eq!(again.id, notes.id);
        assert_eq!(state.windows.len(), 2);
        assert_eq!(state.active_window_id, Some(notes.id));
        assert_eq!(again.last_active_at_ms, 3);
        assert!(again.is_focused);
    }

    #[test]
    fn minimized_window_is_not_reused() {
        let mut state = WindowStoreState::default();
        let first = launch_app(&mut state, &app("notes"), LaunchOptions::default(), 1).unwrap();
        reduce_windows(
            &mut state,
            WindowAction::MinimizeWindow {
                window_id: first.id,
            },
            2,
        )
        .unwrap();

        let second = launch_app(&mut state, &app("notes"), LaunchOptions::default(), 3).unwrap();
        assert_ne!(second.id, first.id);
        assert_eq!(state.windows.len(), 2);
        assert_eq!(second.position, WindowPosition { x: 60, y: 80 });
    }

    #[test]
    fn overrides_win_over_catalog_defaults() {
        let state = WindowStoreState::default();
        let options = LaunchOptions {
            title: Some("Scratch".into()),
            size: Some(WindowSize {
                width: 500,
                height: 400,
            }),
            min_size: None,
            resizable: Some(false),
            payload: Some(json!({ "file": "todo.md" })),
        };

        let Some(LaunchPlan::Open(req)) = plan_launch(&state, &app("notes"), options) else {
            panic!("expected open plan");
        };
        assert_eq!(req.title, "Scratch");
        assert_eq!(req.size.map(|s| s.width), Some(500));
        assert_eq!(req.min_size.map(|s| s.width), Some(420));
        assert_eq!(req.resizable, Some(false));
        assert_eq!(req.payload["file"], "todo.md");
    }

    #[test]
    fn direct_open_bypasses_reuse() {
        let mut state = WindowStoreState::default();
        launch_app(&mut state, &app("notes"), LaunchOptions::default(), 1).unwrap();
        let req = OpenWindowRequest::new(app("notes"), "Notes");
        reduce_windows(&mut state, WindowAction::OpenWindow(req), 2).unwrap();
        assert_eq!(state.windows.len(), 2);
    }
}
