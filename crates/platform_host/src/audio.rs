//! Audible feedback capability for shell events.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

use serde::{Deserialize, Serialize};

/// Object-safe boxed future used by [`SoundService`].
pub type SoundFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Named shell sound cues.
pub enum SoundCue {
    /// A window was opened.
    Open,
    /// A window was closed.
    Close,
    /// Generic attention cue.
    Notification,
}

impl SoundCue {
    /// Returns the sine tone used to render this cue.
    pub const fn tone(self) -> ToneSpec {
        let frequency_hz = match self {
            Self::Open => 660,
            Self::Close => 440,
            Self::Notification => 880,
        };
        ToneSpec {
            frequency_hz,
            duration_ms: 250,
            gain_milli: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// A short sine beep with an exponential fade-out.
pub struct ToneSpec {
    /// Oscillator frequency.
    pub frequency_hz: u32,
    /// Time until the gain ramps to silence.
    pub duration_ms: u32,
    /// Starting gain in thousandths.
    pub gain_milli: u32,
}

/// Host audio output.
///
/// Implementations may hold an expensive output context; it is created on first use and released
/// by [`SoundService::shutdown`].
pub trait SoundService {
    /// Plays one cue.
    fn play<'a>(&'a self, cue: SoundCue) -> SoundFuture<'a, Result<(), String>>;

    /// Releases any output context held by the service.
    fn shutdown(&self);
}

#[derive(Debug, Clone, Copy, Default)]
/// Silent sound service.
pub struct NoopSoundService;

impl SoundService for NoopSoundService {
    fn play<'a>(&'a self, _cue: SoundCue) -> SoundFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn shutdown(&self) {}
}

#[derive(Debug, Clone, Default)]
/// Sound service that records played cues instead of producing audio.
pub struct MemorySoundService {
    played: Rc<RefCell<Vec<SoundCue>>>,
    shutdowns: Rc<RefCell<u32>>,
}

impl MemorySoundService {
    /// Returns every cue played so far, oldest first.
    pub fn played(&self) -> Vec<SoundCue> {
        self.played.borrow().clone()
    }

    /// Returns how many times the service was shut down.
    pub fn shutdown_count(&self) -> u32 {
        *self.shutdowns.borrow()
    }
}

impl SoundService for MemorySoundService {
    fn play<'a>(&'a self, cue: SoundCue) -> SoundFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.played.borrow_mut().push(cue);
            Ok(())
        })
    }

    fn shutdown(&self) {
        *self.shutdowns.borrow_mut() += 1;
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cue_tones_match_shell_palette() {
        assert_eq!(SoundCue::Open.tone().frequency_hz, 660);
        assert_eq!(SoundCue::Close.tone().frequency_hz, 440);
        assert_eq!(SoundCue::Notification.tone().frequency_hz, 880);
        assert_eq!(SoundCue::Open.tone().duration_ms, 250);
    }

    #[test]
    fn memory_service_records_cues_in_order() {
        let service = MemorySoundService::default();
        block_on(service.play(SoundCue::Open)).expect("play");
        block_on(service.play(SoundCue::Close)).expect("play");
        service.shutdown();

        assert_eq!(service.played(), vec![SoundCue::Open, SoundCue::Close]);
        assert_eq!(service.shutdown_count(), 1);
    }
}
