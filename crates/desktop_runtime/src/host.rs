//! Host-side runtime helpers for executing reducer effects and querying the environment.

use std::{cell::Cell, rc::Rc};

use desktop_app_contract::AppContentLoader;
use leptos::{logging, spawn_local, SignalWithUntracked};
use platform_host::{
    ActivityClock, DisplayService, HostServices, PrefsStore, SoundCue, SoundService,
};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

use crate::{
    app_runtime::{begin_content_load, finish_content_load},
    apps::RegistryContentLoader,
    model::{WindowId, WindowSize, DEFAULT_VIEWPORT},
    reducer::RuntimeEffect,
    runtime_context::DesktopRuntimeContext,
};

/// Shell audio cues on top of the host [`SoundService`].
///
/// The service opens its output on the first cue; [`AudioFeedback::shutdown`] releases it when the
/// shell is torn down.
pub struct AudioFeedback {
    service: Rc<dyn SoundService>,
    enabled: Cell<bool>,
}

impl AudioFeedback {
    pub fn new(service: Rc<dyn SoundService>) -> Self {
        Self {
            service,
            enabled: Cell::new(true),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    /// Plays `cue` and logs any output failure.
    pub async fn play_cue(&self, cue: SoundCue) {
        if !self.enabled.get() {
            return;
        }
        if let Err(err) = self.service.play(cue).await {
            logging::warn!("sound cue {cue:?} failed: {err}");
        }
    }

    /// Fire-and-forget variant of [`Self::play_cue`] for the effect executor.
    pub fn play(self: &Rc<Self>, cue: SoundCue) {
        let audio = Rc::clone(self);
        spawn_local(async move { audio.play_cue(cue).await });
    }

    pub fn shutdown(&self) {
        self.service.shutdown();
    }
}

#[derive(Clone)]
/// Host service bundle for desktop runtime side effects.
pub struct DesktopHostContext {
    prefs: Rc<dyn PrefsStore>,
    audio: Rc<AudioFeedback>,
    display: Rc<dyn DisplayService>,
    clock: Rc<dyn ActivityClock>,
    content: Rc<dyn AppContentLoader>,
    host_strategy_name: &'static str,
}

impl DesktopHostContext {
    /// Wraps injected host services. App content resolves through the static catalog.
    pub fn new(services: HostServices) -> Self {
        Self {
            prefs: services.prefs,
            audio: Rc::new(AudioFeedback::new(services.sound)),
            display: services.display,
            clock: services.clock,
            content: Rc::new(RegistryContentLoader),
            host_strategy_name: services.host_strategy.as_str(),
        }
    }

    /// Replaces the content loader, e.g. with one that fetches split bundles.
    pub fn with_content_loader(mut self, loader: Rc<dyn AppContentLoader>) -> Self {
        self.content = loader;
        self
    }

    /// Returns the configured lightweight preference service.
    pub fn prefs_store(&self) -> Rc<dyn PrefsStore> {
        self.prefs.clone()
    }

    pub fn audio(&self) -> Rc<AudioFeedback> {
        self.audio.clone()
    }

    pub fn content_loader(&self) -> Rc<dyn AppContentLoader> {
        self.content.clone()
    }

    /// Returns the stable name of the selected host strategy.
    pub fn host_strategy_name(&self) -> &'static str {
        self.host_strategy_name
    }

    /// Activity stamp for the next window-store transition.
    pub fn next_activity_ms(&self) -> u64 {
        self.clock.next_stamp_ms()
    }

    /// Area a maximized window fills. Falls back to [`DEFAULT_VIEWPORT`].
    pub fn viewport(&self) -> WindowSize {
        self.display
            .display_bounds()
            .filter(|bounds| bounds.width > 0 && bounds.height > 0)
            .map_or(DEFAULT_VIEWPORT, |bounds| WindowSize {
                width: bounds.width,
                height: bounds.height,
            })
    }

    /// Executes a single [`RuntimeEffect`] emitted by the reducer.
    pub fn run_runtime_effect(&self, runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
        match effect {
            RuntimeEffect::LoadAppContent(window_id) => self.load_app_content(runtime, window_id),
            RuntimeEffect::FocusWindowInput(window_id) => focus_window_input(window_id),
            RuntimeEffect::PlaySound(cue) => self.audio.play(cue),
        }
    }

    /// Starts loading the module of `window_id`. A result arriving after the window closed, or
    /// after a newer load for it started, is dropped.
    fn load_app_content(&self, runtime: DesktopRuntimeContext, window_id: WindowId) {
        let Some(app_id) = runtime
            .state
            .with_untracked(|state| state.window(window_id).map(|w| w.app_id.clone()))
        else {
            return;
        };
        let Some(ticket) = begin_content_load(runtime.app_runtime, window_id) else {
            return;
        };
        let loader = self.content_loader();
        spawn_local(async move {
            let result = loader.load(&app_id).await;
            if let Err(err) = &result {
                logging::warn!("content for `{app_id}` failed to load: {err}");
            }
            if !finish_content_load(runtime.app_runtime, ticket, result) {
                logging::log!("discarded stale content for window {}", window_id.0);
            }
        });
    }
}

/// Moves keyboard focus into the window's primary input on the next tick, if the app renders one.
fn focus_window_input(window_id: WindowId) {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let dom_id = desktop_app_contract::window_primary_input_dom_id(window_id.runtime_id());
        let Some(element) = document.get_element_by_id(&dom_id) else {
            return;
        };
        let Ok(element) = element.dyn_into::<web_sys::HtmlElement>() else {
            return;
        };
        let callback = Closure::once_into_js(move || {
            let _ = element.focus();
        });
        let _ = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0);
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = window_id;
}
