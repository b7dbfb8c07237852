//! **Local synthesis** — the fallback voice used when no remote audio clip is
//! available or remote playback fails.
//!
//! Implement `SynthBackend` for a platform speech engine; `NativeSynth` wraps
//! the OS synthesizer (feature `native-synth`), `PlaceholderSynth` stays
//! silent so the chain can run headless.

use crate::error::VoiceResult;

/// One voice offered by a synthesizer, as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthVoice {
    /// Engine-specific identifier, stable across queries.
    pub id: String,
    /// Human-readable name (e.g. "Samantha", "English (America)").
    pub name: String,
}

impl SynthVoice {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Backend that turns text into audible speech on the local machine.
pub trait SynthBackend: Send + Sync {
    /// Speak `text`, interrupting any utterance already in progress.
    fn speak(&self, text: &str) -> VoiceResult<()>;

    /// Cancel the current utterance, if any. Must be idempotent.
    fn stop(&self) -> VoiceResult<()>;

    /// Whether an utterance is currently being spoken.
    fn is_speaking(&self) -> VoiceResult<bool>;

    /// Voices the engine currently offers. May be empty before the engine
    /// has finished loading its list.
    fn voices(&self) -> VoiceResult<Vec<SynthVoice>>;

    /// Use `voice` for subsequent utterances.
    fn set_voice(&self, voice: &SynthVoice) -> VoiceResult<()>;
}

/// Placeholder synthesizer: accepts every request and produces no sound.
/// Use for tests and for environments without a speech engine.
#[derive(Debug, Default)]
pub struct PlaceholderSynth;

impl PlaceholderSynth {
    pub fn new() -> Self {
        Self
    }
}

impl SynthBackend for PlaceholderSynth {
    fn speak(&self, text: &str) -> VoiceResult<()> {
        tracing::debug!("PlaceholderSynth: dropping utterance ({} chars)", text.len());
        Ok(())
    }

    fn stop(&self) -> VoiceResult<()> {
        Ok(())
    }

    fn is_speaking(&self) -> VoiceResult<bool> {
        Ok(false)
    }

    fn voices(&self) -> VoiceResult<Vec<SynthVoice>> {
        Ok(Vec::new())
    }

    fn set_voice(&self, _voice: &SynthVoice) -> VoiceResult<()> {
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Platform synthesizer (optional feature). Speech-dispatcher on Linux, SAPI on
// Windows, AVSpeechSynthesizer on macOS.
// -----------------------------------------------------------------------------
#[cfg(feature = "native-synth")]
mod native_synth {
    use super::*;
    use crate::error::VoiceError;
    use std::sync::Mutex;

    /// Local speech via the platform engine. The engine handle is not
    /// re-entrant, so all calls go through a mutex.
    pub struct NativeSynth {
        inner: Mutex<tts::Tts>,
    }

    impl NativeSynth {
        /// Bind to the platform's default speech engine.
        pub fn new() -> VoiceResult<Self> {
            let engine = tts::Tts::default().map_err(|e| VoiceError::Synth(e.to_string()))?;
            Ok(Self {
                inner: Mutex::new(engine),
            })
        }

        fn lock(&self) -> VoiceResult<std::sync::MutexGuard<'_, tts::Tts>> {
            self.inner
                .lock()
                .map_err(|_| VoiceError::Synth("synthesizer lock poisoned".to_string()))
        }
    }

    impl SynthBackend for NativeSynth {
        fn speak(&self, text: &str) -> VoiceResult<()> {
            let mut engine = self.lock()?;
            engine
                .speak(text, true)
                .map_err(|e| VoiceError::Synth(e.to_string()))?;
            Ok(())
        }

        fn stop(&self) -> VoiceResult<()> {
            let mut engine = self.lock()?;
            engine.stop().map_err(|e| VoiceError::Synth(e.to_string()))?;
            Ok(())
        }

        fn is_speaking(&self) -> VoiceResult<bool> {
            let engine = self.lock()?;
            engine
                .is_speaking()
                .map_err(|e| VoiceError::Synth(e.to_string()))
        }

        fn voices(&self) -> VoiceResult<Vec<SynthVoice>> {
            let engine = self.lock()?;
            let voices = engine
                .voices()
                .map_err(|e| VoiceError::Synth(e.to_string()))?;
            Ok(voices
                .into_iter()
                .map(|v| SynthVoice::new(v.id(), v.name()))
                .collect())
        }

        fn set_voice(&self, voice: &SynthVoice) -> VoiceResult<()> {
            let mut engine = self.lock()?;
            let platform_voices = engine
                .voices()
                .map_err(|e| VoiceError::Synth(e.to_string()))?;
            let target = platform_voices
                .iter()
                .find(|v| v.id() == voice.id)
                .ok_or_else(|| {
                    VoiceError::Synth(format!("voice {:?} no longer offered", voice.name))
                })?;
            engine
                .set_voice(target)
                .map_err(|e| VoiceError::Synth(e.to_string()))
        }
    }
}

#[cfg(feature = "native-synth")]
pub use native_synth::NativeSynth;

/// Create the best available synthesizer.
/// Priority: (1) the platform engine when the `native-synth` feature is on and
/// the engine initializes, (2) `PlaceholderSynth`.
pub fn create_best_synth() -> Box<dyn SynthBackend> {
    #[cfg(feature = "native-synth")]
    {
        match NativeSynth::new() {
            Ok(s) => return Box::new(s),
            Err(e) => {
                tracing::warn!("platform synthesizer unavailable ({e}), staying silent");
            }
        }
    }
    Box::new(PlaceholderSynth::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_accepts_everything() {
        let synth = PlaceholderSynth::new();
        synth.speak("hello").unwrap();
        synth.stop().unwrap();
        assert!(!synth.is_speaking().unwrap());
        assert!(synth.voices().unwrap().is_empty());
    }

    #[test]
    fn placeholder_set_voice_is_a_noop() {
        let synth = PlaceholderSynth::new();
        let voice = SynthVoice::new("v1", "Samantha");
        synth.set_voice(&voice).unwrap();
    }
}
