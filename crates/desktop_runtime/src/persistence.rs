//! Shell preferences backed by the host [`PrefsStore`].
//!
//! Preference IO never fails the caller: read and write errors are logged and the in-memory value
//! stays authoritative for the rest of the session.

use std::rc::Rc;

use leptos::logging;
use platform_host::{load_pref_with, save_pref_with, PrefsStore};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Storage key of the dock/wallpaper preferences.
pub const THEME_KEY: &str = "desktop.theme.v1";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wallpaper {
    #[default]
    Bliss,
    Aurora,
    Sunset,
}

impl Wallpaper {
    pub const ALL: [Wallpaper; 3] = [Self::Bliss, Self::Aurora, Self::Sunset];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bliss => "bliss",
            Self::Aurora => "aurora",
            Self::Sunset => "sunset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePreferences {
    pub dock_visible: bool,
    pub wallpaper: Wallpaper,
}

impl Default for ThemePreferences {
    fn default() -> Self {
        Self {
            dock_visible: true,
            wallpaper: Wallpaper::Bliss,
        }
    }
}

impl ThemePreferences {
    pub fn toggle_dock(&mut self) {
        self.dock_visible = !self.dock_visible;
    }

    pub fn set_wallpaper(&mut self, wallpaper: Wallpaper) {
        self.wallpaper = wallpaper;
    }
}

/// A named preference value with a write-through to the host store.
pub struct PreferenceCell<T> {
    key: &'static str,
    value: T,
    store: Rc<dyn PrefsStore>,
}

impl<T> PreferenceCell<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    /// Creates a cell holding `default` until [`Self::hydrate`] finds a stored value.
    pub fn new(key: &'static str, default: T, store: Rc<dyn PrefsStore>) -> Self {
        Self {
            key,
            value: default,
            store,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replaces the in-memory value with the stored one, if any.
    ///
    /// Missing, unreadable or malformed entries leave the current value in place.
    pub async fn hydrate(&mut self) -> &T {
        match load_pref_with::<_, T>(self.store.as_ref(), self.key).await {
            Ok(Some(stored)) => self.value = stored,
            Ok(None) => {}
            Err(err) => logging::warn!("preference `{}` load failed: {err}", self.key),
        }
        &self.value
    }

    /// Sets the value and writes it through. The new value is kept even when the write fails.
    pub async fn set(&mut self, value: T) {
        self.value = value;
        if let Err(err) = save_pref_with(self.store.as_ref(), self.key, &self.value).await {
            logging::warn!("preference `{}` save failed: {err}", self.key);
        }
    }

    /// Applies `f` to a copy of the value and stores the result.
    pub async fn update(&mut self, f: impl FnOnce(&mut T)) -> T {
        let mut next = self.value.clone();
        f(&mut next);
        self.set(next.clone()).await;
        next
    }
}

/// Loads theme preferences, falling back to defaults on any failure.
pub async fn load_theme(store: Rc<dyn PrefsStore>) -> ThemePreferences {
    let mut cell = PreferenceCell::new(THEME_KEY, ThemePreferences::default(), store);
    *cell.hydrate().await
}

/// Persists theme preferences. Failures are logged and swallowed.
pub async fn persist_theme(store: Rc<dyn PrefsStore>, theme: ThemePreferences) {
    PreferenceCell::new(THEME_KEY, theme, store).set(theme).await;
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{MemoryPrefsStore, PrefsStoreFuture};
    use pretty_assertions::assert_eq;

    use super::*;

    struct FailingPrefsStore;

    impl PrefsStore for FailingPrefsStore {
        fn load_pref<'a>(
            &'a self,
            _key: &'a str,
        ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
            Box::pin(async { Err("storage disabled".to_string()) })
        }

        fn save_pref<'a>(
            &'a self,
            _key: &'a str,
            _raw_json: &'a str,
        ) -> PrefsStoreFuture<'a, Result<(), String>> {
            Box::pin(async { Err("quota exceeded".to_string()) })
        }

        fn delete_pref<'a>(&'a self, _key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
            Box::pin(async { Err("storage disabled".to_string()) })
        }
    }

    #[test]
    fn theme_defaults_show_dock_with_bliss() {
        let theme = ThemePreferences::default();
        assert!(theme.dock_visible);
        assert_eq!(theme.wallpaper, Wallpaper::Bliss);
        assert_eq!(
            serde_json::to_string(&theme).unwrap(),
            r#"{"dockVisible":true,"wallpaper":"bliss"}"#
        );
    }

    #[test]
    fn theme_round_trips_through_store() {
        let store = MemoryPrefsStore::default();
        let mut theme = ThemePreferences::default();
        theme.toggle_dock();
        theme.set_wallpaper(Wallpaper::Sunset);

        block_on(persist_theme(Rc::new(store.clone()), theme));
        assert_eq!(
            store.raw(THEME_KEY).as_deref(),
            Some(r#"{"dockVisible":false,"wallpaper":"sunset"}"#)
        );
        assert_eq!(block_on(load_theme(Rc::new(store))), theme);
    }

    #[test]
    fn malformed_stored_value_keeps_defaults() {
        let store = MemoryPrefsStore::seeded([(THEME_KEY, r#"{"dockVisible":"yes"}"#)]);
        assert_eq!(
            block_on(load_theme(Rc::new(store))),
            ThemePreferences::default()
        );

        let unknown = MemoryPrefsStore::seeded([(
            THEME_KEY,
            r#"{"dockVisible":false,"wallpaper":"nebula"}"#,
        )]);
        assert_eq!(
            block_on(load_theme(Rc::new(unknown))),
            ThemePreferences::default()
        );
    }

    #[test]
    fn failing_store_degrades_to_memory_only() {
        let mut cell = PreferenceCell::new(
            THEME_KEY,
            ThemePreferences::default(),
            Rc::new(FailingPrefsStore),
        );
        assert_eq!(*block_on(cell.hydrate()), ThemePreferences::default());

        let updated = block_on(cell.update(ThemePreferences::toggle_dock));
        assert!(!updated.dock_visible);
        assert!(!cell.get().dock_visible);
    }

    #[test]
    fn hydrate_picks_up_stored_value() {
        let store = MemoryPrefsStore::seeded([("shell.sound.v1", "false")]);
        let mut cell = PreferenceCell::new("shell.sound.v1", true, Rc::new(store.clone()));
        assert!(!*block_on(cell.hydrate()));

        block_on(cell.set(true));
        assert_eq!(store.raw("shell.sound.v1").as_deref(), Some("true"));
        assert_eq!(cell.key(), "shell.sound.v1");
    }
}
