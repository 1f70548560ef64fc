//! Window-store actions, side-effect intents, and transition logic.

use platform_host::SoundCue;
use thiserror::Error;

use crate::{
    model::{
        OpenWindowRequest, WindowId, WindowInstance, WindowPosition, WindowSize,
        WindowStoreState, DEFAULT_MIN_WINDOW_SIZE, DEFAULT_VIEWPORT, DEFAULT_WINDOW_SIZE,
    },
    window_manager::{
        cascade_position, constrain_below_menu_bar, next_z_index, restack_in_list_order,
    },
};

#[derive(Debug, Clone, PartialEq)]
/// Intents accepted by [`reduce_windows`].
pub enum WindowAction {
    /// Open a new window; the new window becomes focused and active.
    OpenWindow(OpenWindowRequest),
    /// Close a window.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Focus, raise and un-minimize a window.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Drop focus from every window.
    ClearActive,
    /// Minimize a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Un-minimize, focus and raise a window.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Minimize every window.
    MinimizeAll,
    /// Un-minimize every window and focus the last one in list order.
    RestoreAll,
    /// Move a window. The vertical coordinate is floored below the menu bar.
    MoveWindow {
        /// Window to move.
        window_id: WindowId,
        /// New top-left corner.
        position: WindowPosition,
    },
    /// Resize a window, optionally moving it in the same step (west/north edge drags).
    ResizeWindow {
        /// Window to resize.
        window_id: WindowId,
        /// New size. Callers are expected to have applied the window's minimum already.
        size: WindowSize,
        /// New top-left corner, when the drag moved it.
        position: Option<WindowPosition>,
    },
    /// Maximize a normal window or restore a maximized one.
    ToggleMaximize {
        /// Window to toggle.
        window_id: WindowId,
        /// Area to fill. Falls back to [`DEFAULT_VIEWPORT`].
        viewport: Option<WindowSize>,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_windows`] for the shell runtime to execute.
pub enum RuntimeEffect {
    /// Resolve and attach the app module for a newly opened window.
    LoadAppContent(WindowId),
    /// Move keyboard focus into the newly focused window's content.
    FocusWindowInput(WindowId),
    /// Play a shell sound cue.
    PlaySound(SoundCue),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reasons an action was rejected. A rejected action leaves the state untouched.
pub enum ReducerError {
    /// The target window id is not (or no longer) present.
    #[error("window {0:?} not found")]
    WindowNotFound(WindowId),
}

/// Applies a [`WindowAction`] to the window store and collects resulting side effects.
///
/// `now_ms` stamps creation and activity times, which keeps the transition a pure function of
/// its inputs.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when the action targets a window that does not exist.
/// The state is not modified in that case.
pub fn reduce_windows(
    state: &mut WindowStoreState,
    action: WindowAction,
    now_ms: u64,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        WindowAction::OpenWindow(req) => {
            let window_id = next_window_id(state);
            let position = req
                .position
                .unwrap_or_else(|| cascade_position(state.windows.len()));
            let z_index = next_z_index(&state.windows);
            for window in &mut state.windows {
                window.is_focused = false;
            }
            state.windows.push(WindowInstance {
                id: window_id,
                app_id: req.app_id,
                title: req.title,
                position,
                size: req.size.unwrap_or(DEFAULT_WINDOW_SIZE),
                min_size: req.min_size.unwrap_or(DEFAULT_MIN_WINDOW_SIZE),
                previous_position: None,
                previous_size: None,
                z_index,
                is_focused: true,
                minimized: false,
                maximized: false,
                resizable: req.resizable.unwrap_or(true),
                created_at_ms: now_ms,
                last_active_at_ms: now_ms,
                payload: req.payload,
            });
            state.active_window_id = Some(window_id);
            effects.push(RuntimeEffect::PlaySound(SoundCue::Open));
            effects.push(RuntimeEffect::LoadAppContent(window_id));
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        WindowAction::CloseWindow { window_id } => {
            let index = window_index(state, window_id)?;
            state.windows.remove(index);
            restack_in_list_order(&mut state.windows);
            if state.active_window_id == Some(window_id) {
                state.active_window_id = state
                    .windows
                    .iter()
                    .rev()
                    .find(|w| !w.minimized)
                    .map(|w| w.id);
                if let Some(promoted) = state.active_window_id {
                    effects.push(RuntimeEffect::FocusWindowInput(promoted));
                }
            }
            effects.push(RuntimeEffect::PlaySound(SoundCue::Close));
        }
        WindowAction::FocusWindow { window_id } => {
            window_index(state, window_id)?;
            raise_and_focus(state, window_id, Some(now_ms));
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        WindowAction::ClearActive => {
            state.active_window_id = None;
        }
        WindowAction::MinimizeWindow { window_id } => {
            let window = find_window_mut(state, window_id)?;
            window.minimized = true;
            window.is_focused = false;
            if state.active_window_id == Some(window_id) {
                state.active_window_id = None;
            }
        }
        WindowAction::RestoreWindow { window_id } => {
            window_index(state, window_id)?;
            raise_and_focus(state, window_id, None);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        WindowAction::MinimizeAll => {
            for window in &mut state.windows {
                window.minimized = true;
            }
            state.active_window_id = None;
        }
        WindowAction::RestoreAll => {
            let Some(last_id) = state.windows.last().map(|w| w.id) else {
                return Ok(effects);
            };
            for window in &mut state.windows {
                window.minimized = false;
            }
            restack_in_list_order(&mut state.windows);
            state.active_window_id = Some(last_id);
            effects.push(RuntimeEffect::FocusWindowInput(last_id));
        }
        WindowAction::MoveWindow {
            window_id,
            position,
        } => {
            let window = find_window_mut(state, window_id)?;
            window.position = constrain_below_menu_bar(position);
            window.last_active_at_ms = now_ms;
        }
        WindowAction::ResizeWindow {
            window_id,
            size,
            position,
        } => {
            let window = find_window_mut(state, window_id)?;
            window.size = size;
            if let Some(position) = position {
                window.position = position;
            }
            window.last_active_at_ms = now_ms;
        }
        WindowAction::ToggleMaximize {
            window_id,
            viewport,
        } => {
            let window = find_window_mut(state, window_id)?;
            if window.maximized {
                window.position = window.previous_position.take().unwrap_or(window.position);
                window.size = window.previous_size.take().unwrap_or(window.size);
                window.maximized = false;
            } else {
                window.previous_position = Some(window.position);
                window.previous_size = Some(window.size);
                window.position = WindowPosition::ORIGIN;
                window.size = viewport.unwrap_or(DEFAULT_VIEWPORT);
                window.maximized = true;
            }
            raise_and_focus(state, window_id, None);
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
    }

    sync_focus_flags(state);
    Ok(effects)
}

/// Applies `action` to a copy of `state`.
///
/// Unknown targets are no-ops: the returned state equals the input.
pub fn transition(state: &WindowStoreState, action: WindowAction, now_ms: u64) -> WindowStoreState {
    let mut next = state.clone();
    match reduce_windows(&mut next, action, now_ms) {
        Ok(_) => next,
        Err(_) => state.clone(),
    }
}

/// Folds a timestamped action sequence over `initial`.
pub fn replay<I>(initial: &WindowStoreState, actions: I) -> WindowStoreState
where
    I: IntoIterator<Item = (WindowAction, u64)>,
{
    actions
        .into_iter()
        .fold(initial.clone(), |state, (action, now_ms)| {
            transition(&state, action, now_ms)
        })
}

fn next_window_id(state: &mut WindowStoreState) -> WindowId {
    let id = WindowId(state.next_window_id);
    state.next_window_id = state.next_window_id.saturating_add(1);
    id
}

fn window_index(state: &WindowStoreState, window_id: WindowId) -> Result<usize, ReducerError> {
    state
        .windows
        .iter()
        .position(|w| w.id == window_id)
        .ok_or(ReducerError::WindowNotFound(window_id))
}

fn find_window_mut(
    state: &mut WindowStoreState,
    window_id: WindowId,
) -> Result<&mut WindowInstance, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| w.id == window_id)
        .ok_or(ReducerError::WindowNotFound(window_id))
}

/// Makes `window_id` the single focused, topmost, visible window.
///
/// A window that already sits focused on top keeps its stacking value.
fn raise_and_focus(state: &mut WindowStoreState, window_id: WindowId, touched_at_ms: Option<u64>) {
    let top = next_z_index(&state.windows);
    let already_on_top = state
        .windows
        .iter()
        .filter(|w| w.id != window_id)
        .all(|w| w.z_index + 1 < top);
    for window in &mut state.windows {
        if window.id != window_id {
            window.is_focused = false;
            continue;
        }
        let keep_stack = already_on_top && window.is_focused && !window.minimized;
        if !keep_stack {
            window.z_index = top;
        }
        window.minimized = false;
        window.is_focused = true;
        if let Some(now_ms) = touched_at_ms {
            window.last_active_at_ms = now_ms;
        }
    }
    state.active_window_id = Some(window_id);
}

/// Re-derives every focus flag from the active pointer.
///
/// Minimized windows can never be focused, so a minimized active window clears the pointer.
fn sync_focus_flags(state: &mut WindowStoreState) {
    if let Some(active) = state.active_window_id {
        let visible = state
            .windows
            .iter()
            .any(|w| w.id == active && !w.minimized);
        if !visible {
            state.active_window_id = None;
        }
    }
    for window in &mut state.windows {
        window.is_focused = state.active_window_id == Some(window.id);
    }
}
