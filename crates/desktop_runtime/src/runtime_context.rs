//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived window store container, the runtime effect queue, app-session
//! state and shell preferences. Gesture interpretation lives in [`crate::shell`]; rendering is left
//! to the embedding UI.

use desktop_app_contract::{AppCommandEvent, ApplicationId};
use leptos::*;
use platform_host::HostServices;

use crate::{
    app_runtime::{
        deliver_window_command, mount_window_content, sync_runtime_sessions, AppRuntimeState,
    },
    effect_executor,
    host::DesktopHostContext,
    launch::{plan_launch, LaunchOptions},
    model::{WindowId, WindowStoreState},
    persistence::{load_theme, persist_theme, ThemePreferences, Wallpaper},
    reducer::{reduce_windows, RuntimeEffect, WindowAction},
    shell::{self, DesktopShortcut, KeyChord, MenuAction, ShellIntent},
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop runtime state and dispatching [`WindowAction`] values.
pub struct DesktopRuntimeContext {
    /// Host service bundle for executing runtime side effects and environment queries.
    pub host: StoredValue<DesktopHostContext>,
    /// Reactive window store.
    pub state: RwSignal<WindowStoreState>,
    /// Queue of runtime effects emitted by the reducer and processed by the executor.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Runtime app-session state.
    pub app_runtime: RwSignal<AppRuntimeState>,
    /// Dock visibility and wallpaper.
    pub theme: RwSignal<ThemePreferences>,
    /// Whether the window palette is shown.
    pub window_palette_open: RwSignal<bool>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<WindowAction>,
}

impl DesktopRuntimeContext {
    /// Creates the runtime signals and dispatcher. Must run inside a reactive owner.
    pub fn new(host_services: HostServices) -> Self {
        let host = store_value(DesktopHostContext::new(host_services));
        let state = create_rw_signal(WindowStoreState::default());
        let effects = create_rw_signal(Vec::<RuntimeEffect>::new());
        let app_runtime = create_rw_signal(AppRuntimeState::default());

        let dispatch = Callback::new(move |action: WindowAction| {
            let mut store = state.get_untracked();
            let previous = store.clone();

            let now_ms = host.with_value(|host| host.next_activity_ms());
            match reduce_windows(&mut store, action, now_ms) {
                Ok(new_effects) => {
                    if store.windows != previous.windows {
                        sync_runtime_sessions(app_runtime, &previous.windows, &store.windows);
                    }
                    if store != previous {
                        state.set(store);
                    }
                    if !new_effects.is_empty() {
                        effects.update(|queue| queue.extend(new_effects));
                    }
                }
                Err(err) => logging::warn!("window reducer error: {err}"),
            }
        });

        Self {
            host,
            state,
            effects,
            app_runtime,
            theme: create_rw_signal(ThemePreferences::default()),
            window_palette_open: create_rw_signal(false),
            dispatch,
        }
    }

    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: WindowAction) {
        self.dispatch.call(action);
    }

    /// Applies the reuse-or-create launch policy. Returns `false` for unknown apps.
    pub fn launch_app(&self, app_id: &ApplicationId, options: LaunchOptions) -> bool {
        let plan = self
            .state
            .with_untracked(|state| plan_launch(state, app_id, options));
        match plan {
            Some(plan) => {
                self.dispatch_action(plan.into_action());
                true
            }
            None => {
                logging::warn!("launch of unknown app `{app_id}` ignored");
                false
            }
        }
    }

    /// Maximizes or restores a window using the host viewport.
    pub fn toggle_maximize(&self, window_id: WindowId) {
        let viewport = self.host.with_value(|host| host.viewport());
        self.dispatch_action(WindowAction::ToggleMaximize {
            window_id,
            viewport: Some(viewport),
        });
    }

    /// Mounts the window's loaded app module with its id and launch payload.
    pub fn mount_window(&self, window_id: WindowId) -> Option<View> {
        self.state
            .with_untracked(|state| mount_window_content(self.app_runtime, state, window_id))
    }

    pub fn run_intents(&self, intents: Vec<ShellIntent>) {
        for intent in intents {
            self.run_intent(intent);
        }
    }

    pub fn run_intent(&self, intent: ShellIntent) {
        match intent {
            ShellIntent::Window(action) => self.dispatch_action(action),
            ShellIntent::Launch { app_id, options } => {
                self.launch_app(&app_id, options);
            }
            ShellIntent::SendCommand(event) => self.send_command(event),
            ShellIntent::ToggleDock => self.update_theme(ThemePreferences::toggle_dock),
            ShellIntent::ToggleWindowPalette => {
                self.window_palette_open.update(|open| *open = !*open)
            }
        }
    }

    /// Handles a global keydown. Returns whether it matched a shortcut.
    pub fn handle_keydown(&self, chord: &KeyChord) -> bool {
        let Some(shortcut) = shell::resolve_shortcut(chord) else {
            return false;
        };
        let intents = self
            .state
            .with_untracked(|state| shell::shortcut_intents(state, shortcut));
        self.run_intents(intents);
        true
    }

    pub fn select_menu(&self, action: MenuAction) {
        let intents = self
            .state
            .with_untracked(|state| shell::menu_intents(state, action));
        self.run_intents(intents);
    }

    pub fn click_dock(&self, app_id: &ApplicationId) {
        let intent = self
            .state
            .with_untracked(|state| shell::dock_click_intent(state, app_id));
        self.run_intent(intent);
    }

    pub fn select_palette_window(&self, window_id: WindowId) {
        let action = self.state.with_untracked(|state| {
            state.window(window_id).map(shell::palette_select_action)
        });
        if let Some(action) = action {
            self.window_palette_open.set(false);
            self.dispatch_action(action);
        }
    }

    /// Double-click, or Enter/Space, on a desktop icon.
    pub fn activate_desktop_shortcut(&self, shortcut: &DesktopShortcut) {
        self.run_intent(shortcut.launch_intent());
    }

    pub fn press_desktop_background(&self) {
        self.dispatch_action(shell::desktop_background_action());
    }

    pub fn set_wallpaper(&self, wallpaper: Wallpaper) {
        self.update_theme(|theme| theme.set_wallpaper(wallpaper));
    }

    fn send_command(&self, event: AppCommandEvent) {
        let delivered = self
            .state
            .with_untracked(|state| deliver_window_command(self.app_runtime, state, event));
        if !delivered {
            logging::log!(
                "dropped `{}` command for unfocused window {}",
                event.command.token(),
                event.window_id
            );
        }
    }

    fn update_theme(&self, f: impl FnOnce(&mut ThemePreferences)) {
        self.theme.update(f);
        let theme = self.theme.get_untracked();
        let prefs = self.host.with_value(|host| host.prefs_store());
        spawn_local(persist_theme(prefs, theme));
    }
}

fn install_runtime_orchestration(runtime: DesktopRuntimeContext) {
    let prefs = runtime.host.with_value(|host| host.prefs_store());
    spawn_local(async move {
        let theme = load_theme(prefs).await;
        runtime.theme.set(theme);
    });

    effect_executor::install(runtime);

    let keydown = window_event_listener(ev::keydown, move |ev| {
        if runtime.handle_keydown(&KeyChord::from_keyboard_event(&ev)) {
            ev.prevent_default();
        }
    });
    let audio = runtime.host.with_value(|host| host.audio());
    on_cleanup(move || {
        keydown.remove();
        audio.shutdown();
    });

    runtime.dispatch_action(WindowAction::OpenWindow(shell::welcome_request()));
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components and opens the welcome window.
pub fn DesktopProvider(
    /// Injected browser or headless host bundle assembled by the entry layer.
    host_services: HostServices,
    children: Children,
) -> impl IntoView {
    let runtime = DesktopRuntimeContext::new(host_services);
    provide_context(runtime);
    install_runtime_orchestration(runtime);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
