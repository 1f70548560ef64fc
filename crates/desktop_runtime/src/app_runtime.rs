//! Per-window app sessions: lifecycle signals, host command inbox and content loading state.

use std::collections::{BTreeSet, HashMap};

use desktop_app_contract::{AppCommandEvent, AppLifecycleEvent, AppModule, AppMountContext};
use leptos::*;

use crate::model::{WindowId, WindowInstance, WindowStoreState};

const MAX_INBOX_COMMANDS: usize = 32;

#[derive(Debug, Clone)]
/// Content status of one window.
pub enum ContentState {
    /// The module is being fetched.
    Loading,
    /// The module is ready to mount.
    Ready(AppModule),
    /// Loading failed; the window shows a placeholder with the message.
    Failed(String),
}

#[derive(Clone, Copy)]
/// Reactive per-window app session signals.
pub struct WindowAppSession {
    /// Latest lifecycle signal value for the window.
    ///
    /// Mount and focus are coalesced: a window opened focused reads `Focused` after the sync that
    /// created it. The module's mount call is what tells an app it was mounted.
    pub lifecycle: RwSignal<AppLifecycleEvent>,
    /// Host commands delivered to the window, oldest first.
    pub commands: RwSignal<Vec<AppCommandEvent>>,
    /// Content loading status.
    pub content: RwSignal<ContentState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Identifies one content load request.
pub struct LoadTicket {
    pub window_id: WindowId,
    seq: u64,
}

/// Tracks the latest outstanding content load per window.
///
/// A completion is accepted only for the newest ticket of a window that is still open.
#[derive(Debug, Default)]
pub struct ContentLoads {
    next_seq: u64,
    pending: HashMap<WindowId, u64>,
}

impl ContentLoads {
    /// Starts a load, superseding any earlier one for the same window.
    pub fn begin(&mut self, window_id: WindowId) -> LoadTicket {
        self.next_seq += 1;
        self.pending.insert(window_id, self.next_seq);
        LoadTicket {
            window_id,
            seq: self.next_seq,
        }
    }

    /// Returns whether `ticket` is still current and clears it.
    pub fn settle(&mut self, ticket: LoadTicket) -> bool {
        match self.pending.get(&ticket.window_id) {
            Some(seq) if *seq == ticket.seq => {
                self.pending.remove(&ticket.window_id);
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self, window_id: WindowId) {
        self.pending.remove(&window_id);
    }

    pub fn is_pending(&self, window_id: WindowId) -> bool {
        self.pending.contains_key(&window_id)
    }
}

/// Lifecycle notifications implied by moving from `previous` to `next`.
///
/// Emitted per window in `next` order, then closures in `previous` order. A window that is both
/// minimized and blurred reports `Minimized` before `Blurred`.
pub fn lifecycle_transitions(
    previous: &[WindowInstance],
    next: &[WindowInstance],
) -> Vec<(WindowId, AppLifecycleEvent)> {
    let before: HashMap<WindowId, &WindowInstance> = previous.iter().map(|w| (w.id, w)).collect();
    let mut events = Vec::new();

    for window in next {
        match before.get(&window.id) {
            None => {
                events.push((window.id, AppLifecycleEvent::Mounted));
                if window.is_focused {
                    events.push((window.id, AppLifecycleEvent::Focused));
                }
            }
            Some(old) => {
                if !old.minimized && window.minimized {
                    events.push((window.id, AppLifecycleEvent::Minimized));
                } else if old.minimized && !window.minimized {
                    events.push((window.id, AppLifecycleEvent::Restored));
                }
                if !old.is_focused && window.is_focused {
                    events.push((window.id, AppLifecycleEvent::Focused));
                } else if old.is_focused && !window.is_focused {
                    events.push((window.id, AppLifecycleEvent::Blurred));
                }
            }
        }
    }

    let open: BTreeSet<WindowId> = next.iter().map(|w| w.id).collect();
    events.extend(
        previous
            .iter()
            .filter(|w| !open.contains(&w.id))
            .map(|w| (w.id, AppLifecycleEvent::Closed)),
    );
    events
}

/// Returns the window a host command should be delivered to, if any.
///
/// Only the focused window may receive a command, and only when the command names it.
pub fn route_command(state: &WindowStoreState, event: &AppCommandEvent) -> Option<WindowId> {
    state
        .focused_window_id()
        .filter(|focused| focused.runtime_id() == event.window_id)
}

#[derive(Default)]
/// Runtime-owned app session state.
pub struct AppRuntimeState {
    sessions: HashMap<WindowId, WindowAppSession>,
    loads: ContentLoads,
}

impl AppRuntimeState {
    pub fn session(&self, window_id: WindowId) -> Option<WindowAppSession> {
        self.sessions.get(&window_id).copied()
    }

    fn ensure_session(&mut self, window_id: WindowId) -> WindowAppSession {
        if let Some(session) = self.sessions.get(&window_id).copied() {
            return session;
        }

        let session = WindowAppSession {
            lifecycle: create_rw_signal(AppLifecycleEvent::Mounted),
            commands: create_rw_signal(Vec::new()),
            content: create_rw_signal(ContentState::Loading),
        };
        self.sessions.insert(window_id, session);
        session
    }

    fn remove_session(&mut self, window_id: WindowId) {
        if let Some(session) = self.sessions.remove(&window_id) {
            session.lifecycle.set(AppLifecycleEvent::Closed);
        }
        self.loads.cancel(window_id);
    }

    fn apply_transitions(&mut self, previous: &[WindowInstance], next: &[WindowInstance]) {
        for (window_id, event) in lifecycle_transitions(previous, next) {
            match event {
                AppLifecycleEvent::Closed => self.remove_session(window_id),
                AppLifecycleEvent::Mounted => {
                    self.ensure_session(window_id);
                }
                event => self.ensure_session(window_id).lifecycle.set(event),
            }
        }
    }

    fn deliver_command(&mut self, window_id: WindowId, event: AppCommandEvent) {
        let session = self.ensure_session(window_id);
        session.commands.update(|inbox| {
            inbox.push(event);
            if inbox.len() > MAX_INBOX_COMMANDS {
                let overflow = inbox.len() - MAX_INBOX_COMMANDS;
                inbox.drain(0..overflow);
            }
        });
    }

    fn begin_load(&mut self, window_id: WindowId) -> Option<LoadTicket> {
        let session = self.sessions.get(&window_id).copied()?;
        session.content.set(ContentState::Loading);
        Some(self.loads.begin(window_id))
    }

    fn finish_load(&mut self, ticket: LoadTicket, result: Result<AppModule, String>) -> bool {
        if !self.loads.settle(ticket) {
            return false;
        }
        let Some(session) = self.sessions.get(&ticket.window_id).copied() else {
            return false;
        };
        session.content.set(match result {
            Ok(module) => ContentState::Ready(module),
            Err(err) => ContentState::Failed(err),
        });
        true
    }
}

/// Ensures and returns a per-window runtime app session.
///
/// Returns `None` only once the runtime state signal has been disposed.
pub fn ensure_window_session(
    runtime_state: RwSignal<AppRuntimeState>,
    window_id: WindowId,
) -> Option<WindowAppSession> {
    if let Some(session) = runtime_state.with_untracked(|state| state.session(window_id)) {
        return Some(session);
    }
    runtime_state.try_update(|state| state.ensure_session(window_id))
}

/// Applies lifecycle changes between two window lists and returns newly mounted windows.
pub fn sync_runtime_sessions(
    runtime_state: RwSignal<AppRuntimeState>,
    previous: &[WindowInstance],
    next: &[WindowInstance],
) -> Vec<WindowId> {
    let known: BTreeSet<WindowId> = previous.iter().map(|w| w.id).collect();
    runtime_state.update(|state| state.apply_transitions(previous, next));
    next.iter()
        .map(|w| w.id)
        .filter(|id| !known.contains(id))
        .collect()
}

/// Delivers `event` to its target when that target is the focused window.
///
/// Returns whether the command was delivered.
pub fn deliver_window_command(
    runtime_state: RwSignal<AppRuntimeState>,
    state: &WindowStoreState,
    event: AppCommandEvent,
) -> bool {
    let Some(window_id) = route_command(state, &event) else {
        return false;
    };
    runtime_state.update(|runtime| runtime.deliver_command(window_id, event));
    true
}

/// Context handed to a window's module at mount: its app, runtime id and launch payload.
pub fn mount_context(window: &WindowInstance) -> AppMountContext {
    AppMountContext {
        app_id: window.app_id.clone(),
        window_id: window.id.runtime_id(),
        payload: window.payload.clone(),
    }
}

/// Mounts the loaded module of `window_id`.
///
/// Returns `None` while the content is still loading, after it failed, or when the window or its
/// session is gone.
pub fn mount_window_content(
    runtime_state: RwSignal<AppRuntimeState>,
    state: &WindowStoreState,
    window_id: WindowId,
) -> Option<View> {
    let window = state.window(window_id)?;
    let session = runtime_state.try_with_untracked(|rt| rt.session(window_id))??;
    let module = session.content.with_untracked(|content| match content {
        ContentState::Ready(module) => Some(*module),
        ContentState::Loading | ContentState::Failed(_) => None,
    })?;
    Some(module.mount(mount_context(window)))
}

/// Marks a window's content as loading. Returns `None` when the window has no session.
pub fn begin_content_load(
    runtime_state: RwSignal<AppRuntimeState>,
    window_id: WindowId,
) -> Option<LoadTicket> {
    runtime_state
        .try_update(|state| state.begin_load(window_id))
        .flatten()
}

/// Stores a load result. Returns `false` when the load was superseded or the window is gone.
pub fn finish_content_load(
    runtime_state: RwSignal<AppRuntimeState>,
    ticket: LoadTicket,
    result: Result<AppModule, String>,
) -> bool {
    runtime_state
        .try_update(|state| state.finish_load(ticket, result))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use desktop_app_contract::{AppHostCommand, ApplicationId};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{
        model::OpenWindowRequest,
        reducer::{reduce_windows, WindowAction},
        shell::about_request,
    };

    thread_local! {
        static LAST_MOUNT: RefCell<Option<AppMountContext>> = const { RefCell::new(None) };
    }

    fn record_mount(context: AppMountContext) -> View {
        LAST_MOUNT.with(|slot| *slot.borrow_mut() = Some(context));
        ().into_view()
    }

    fn open(state: &mut WindowStoreState, app: &str) -> WindowId {
        let req = OpenWindowRequest::new(ApplicationId::trusted(app), app);
        reduce_windows(state, WindowAction::OpenWindow(req), 1).expect("open");
        state.windows.last().expect("window").id
    }

    fn apply(
        state: &mut WindowStoreState,
        action: WindowAction,
    ) -> Vec<(WindowId, AppLifecycleEvent)> {
        let previous = state.windows.clone();
        reduce_windows(state, action, 2).expect("apply");
        lifecycle_transitions(&previous, &state.windows)
    }

    fn mount_nothing(_: AppMountContext) -> View {
        ().into_view()
    }

    #[test]
    fn open_mounts_new_window_and_blurs_previous() {
        let mut state = WindowStoreState::default();
        let a = open(&mut state, "notes");
        let previous = state.windows.clone();
        let b = open(&mut state, "calendar");

        assert_eq!(
            lifecycle_transitions(&previous, &state.windows),
            vec![
                (a, AppLifecycleEvent::Blurred),
                (b, AppLifecycleEvent::Mounted),
                (b, AppLifecycleEvent::Focused),
            ]
        );
    }

    #[test]
    fn minimize_restore_and_close_are_reported() {
        let mut state = WindowStoreState::default();
        let a = open(&mut state, "notes");

        assert_eq!(
            apply(&mut state, WindowAction::MinimizeWindow { window_id: a }),
            vec![(a, AppLifecycleEvent::Minimized), (a, AppLifecycleEvent::Blurred)]
        );
        assert_eq!(
            apply(&mut state, WindowAction::RestoreWindow { window_id: a }),
            vec![(a, AppLifecycleEvent::Restored), (a, AppLifecycleEvent::Focused)]
        );
        assert_eq!(
            apply(&mut state, WindowAction::CloseWindow { window_id: a }),
            vec![(a, AppLifecycleEvent::Closed)]
        );
    }

    #[test]
    fn geometry_changes_emit_nothing() {
        let mut state = WindowStoreState::default();
        let a = open(&mut state, "notes");
        let events = apply(
            &mut state,
            WindowAction::MoveWindow {
                window_id: a,
                position: crate::model::WindowPosition { x: 200, y: 200 },
            },
        );
        assert!(events.is_empty());
    }

    #[test]
    fn commands_only_reach_the_focused_window() {
        let mut state = WindowStoreState::default();
        let a = open(&mut state, "notes");
        let b = open(&mut state, "calendar");
        let to = |window_id: WindowId| AppCommandEvent {
            window_id: window_id.runtime_id(),
            command: AppHostCommand::Copy,
        };

        assert_eq!(route_command(&state, &to(b)), Some(b));
        assert_eq!(route_command(&state, &to(a)), None);

        reduce_windows(&mut state, WindowAction::ClearActive, 3).unwrap();
        assert_eq!(route_command(&state, &to(b)), None);
    }

    #[test]
    fn superseded_and_cancelled_loads_are_discarded() {
        let mut loads = ContentLoads::default();
        let first = loads.begin(WindowId(1));
        let second = loads.begin(WindowId(1));
        assert!(!loads.settle(first));
        assert!(loads.is_pending(WindowId(1)));
        assert!(loads.settle(second));
        assert!(!loads.settle(second));

        let other = loads.begin(WindowId(2));
        loads.cancel(WindowId(2));
        assert!(!loads.settle(other));
    }

    #[test]
    fn sessions_follow_window_list_and_drop_late_loads() {
        let _ = leptos::create_runtime();
        let runtime_state = create_rw_signal(AppRuntimeState::default());
        let mut state = WindowStoreState::default();
        let a = open(&mut state, "notes");

        let mounted = sync_runtime_sessions(runtime_state, &[], &state.windows);
        assert_eq!(mounted, vec![a]);
        let session = ensure_window_session(runtime_state, a).expect("session");
        assert_eq!(session.lifecycle.get_untracked(), AppLifecycleEvent::Focused);

        let ticket = begin_content_load(runtime_state, a).expect("session exists");
        let delivered = deliver_window_command(
            runtime_state,
            &state,
            AppCommandEvent {
                window_id: a.runtime_id(),
                command: AppHostCommand::Paste,
            },
        );
        assert!(delivered);
        assert_eq!(session.commands.get_untracked().len(), 1);

        let previous = state.windows.clone();
        reduce_windows(&mut state, WindowAction::CloseWindow { window_id: a }, 4).unwrap();
        let mounted = sync_runtime_sessions(runtime_state, &previous, &state.windows);
        assert!(mounted.is_empty());
        assert_eq!(session.lifecycle.get_untracked(), AppLifecycleEvent::Closed);
        assert!(runtime_state.with_untracked(|rt| rt.session(a).is_none()));

        let late = Ok(AppModule::new(mount_nothing));
        assert!(!finish_content_load(runtime_state, ticket, late));
    }

    #[test]
    fn current_load_marks_content_ready_or_failed() {
        let _ = leptos::create_runtime();
        let runtime_state = create_rw_signal(AppRuntimeState::default());
        let mut state = WindowStoreState::default();
        let a = open(&mut state, "notes");
        sync_runtime_sessions(runtime_state, &[], &state.windows);

        let ticket = begin_content_load(runtime_state, a).expect("ticket");
        assert!(finish_content_load(runtime_state, ticket, Ok(AppModule::new(mount_nothing))));
        let session = ensure_window_session(runtime_state, a).expect("session");
        assert!(matches!(session.content.get_untracked(), ContentState::Ready(_)));

        let ticket = begin_content_load(runtime_state, a).expect("ticket");
        assert!(finish_content_load(runtime_state, ticket, Err("offline".into())));
        assert!(matches!(
            session.content.get_untracked(),
            ContentState::Failed(message) if message == "offline"
        ));
        assert!(begin_content_load(runtime_state, WindowId(42)).is_none());
    }

    #[test]
    fn lifecycle_of_a_new_window_coalesces_mount_and_focus() {
        let _ = leptos::create_runtime();
        let runtime_state = create_rw_signal(AppRuntimeState::default());
        let mut state = WindowStoreState::default();
        let a = open(&mut state, "notes");
        sync_runtime_sessions(runtime_state, &[], &state.windows);
        let session = ensure_window_session(runtime_state, a).expect("session");
        assert_eq!(session.lifecycle.get_untracked(), AppLifecycleEvent::Focused);

        let previous = state.windows.clone();
        let b = open(&mut state, "calendar");
        sync_runtime_sessions(runtime_state, &previous, &state.windows);
        assert_eq!(session.lifecycle.get_untracked(), AppLifecycleEvent::Blurred);
        let other = ensure_window_session(runtime_state, b).expect("session");
        assert_eq!(other.lifecycle.get_untracked(), AppLifecycleEvent::Focused);
    }

    #[test]
    fn ready_content_mounts_with_window_id_and_payload() {
        let _ = leptos::create_runtime();
        let runtime_state = create_rw_signal(AppRuntimeState::default());
        let mut state = WindowStoreState::default();
        reduce_windows(&mut state, WindowAction::OpenWindow(about_request()), 1).expect("open");
        let about = state.windows[0].id;
        sync_runtime_sessions(runtime_state, &[], &state.windows);

        let context = mount_context(&state.windows[0]);
        assert_eq!(context.app_id.as_str(), "welcome");
        assert_eq!(context.window_id, about.runtime_id());
        assert_eq!(context.payload, json!({ "purpose": "about" }));

        let ticket = begin_content_load(runtime_state, about).expect("ticket");
        assert!(mount_window_content(runtime_state, &state, about).is_none());

        assert!(finish_content_load(runtime_state, ticket, Ok(AppModule::new(record_mount))));
        assert!(mount_window_content(runtime_state, &state, about).is_some());
        let mounted = LAST_MOUNT.with(|slot| slot.borrow_mut().take());
        assert_eq!(mounted, Some(context));

        assert!(mount_window_content(runtime_state, &state, WindowId(99)).is_none());
    }
}
