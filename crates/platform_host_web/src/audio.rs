//! Web Audio sine-beep output.

use std::cell::RefCell;

use platform_host::{SoundCue, SoundFuture, SoundService};
#[cfg(target_arch = "wasm32")]
use platform_host::ToneSpec;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[derive(Debug, Default)]
/// Plays cues through a lazily created `AudioContext`.
///
/// The context is created by the first cue (browsers only allow it after a user gesture) and
/// closed by [`SoundService::shutdown`]. A later cue creates a fresh one.
pub struct WebAudioSoundService {
    context: RefCell<Option<web_sys::AudioContext>>,
}

impl WebAudioSoundService {
    /// Returns whether an output context is currently open.
    pub fn is_open(&self) -> bool {
        self.context.borrow().is_some()
    }

    #[cfg(target_arch = "wasm32")]
    fn context(&self) -> Result<web_sys::AudioContext, String> {
        if let Some(ctx) = self.context.borrow().as_ref() {
            return Ok(ctx.clone());
        }
        let ctx = web_sys::AudioContext::new().map_err(js_error)?;
        *self.context.borrow_mut() = Some(ctx.clone());
        Ok(ctx)
    }
}

impl SoundService for WebAudioSoundService {
    fn play<'a>(&'a self, cue: SoundCue) -> SoundFuture<'a, Result<(), String>> {
        Box::pin(async move {
            #[cfg(target_arch = "wasm32")]
            {
                let ctx = self.context()?;
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let resumed = ctx.resume().map_err(js_error)?;
                    wasm_bindgen_futures::JsFuture::from(resumed)
                        .await
                        .map_err(js_error)?;
                }
                beep(&ctx, cue.tone()).map_err(js_error)
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                let _ = cue;
                Ok(())
            }
        })
    }

    fn shutdown(&self) {
        if let Some(ctx) = self.context.borrow_mut().take() {
            let _ = ctx.close();
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn beep(ctx: &web_sys::AudioContext, tone: ToneSpec) -> Result<(), JsValue> {
    let oscillator = ctx.create_oscillator()?;
    let gain = ctx.create_gain()?;
    oscillator.set_type(web_sys::OscillatorType::Sine);
    oscillator.frequency().set_value(tone.frequency_hz as f32);
    oscillator.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;

    let start = ctx.current_time();
    let end = start + f64::from(tone.duration_ms) / 1000.0;
    gain.gain().set_value_at_time(tone.gain_milli as f32 / 1000.0, start)?;
    gain.gain().exponential_ramp_to_value_at_time(0.001, end)?;
    oscillator.start()?;
    oscillator.stop_with_when(end)?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn js_error(err: JsValue) -> String {
    format!("web audio failed: {err:?}")
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn native_build_never_opens_a_context() {
        let service = WebAudioSoundService::default();
        block_on(service.play(SoundCue::Open)).expect("play");
        assert!(!service.is_open());
        service.shutdown();
        assert!(!service.is_open());
    }
}
