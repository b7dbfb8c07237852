//! **Voice selection** — pick the interviewer's fallback voice from whatever
//! the platform engine offers.
//!
//! Voice lists can be empty while the engine is still warming up, so the
//! selection is recomputed on every refresh and cached once it sticks.

use crate::error::VoiceResult;
use crate::synth::{SynthBackend, SynthVoice};

/// Voice names that usually map to a female-sounding voice across the common
/// desktop engines. Matched case-insensitively as substrings.
const FEMALE_VOICE_HINTS: &[&str] = &[
    "samantha", "victoria", "karen", "moira", "tessa", "fiona", "veena", "kate", "susan",
    "allison", "ava", "zira", "hazel", "jenny", "aria", "female",
];

/// Chooses and caches one voice for local synthesis.
///
/// Policy: prefer a name matching [`FEMALE_VOICE_HINTS`], otherwise the first
/// voice offered, otherwise leave the selection unset (the engine keeps its
/// own default).
#[derive(Debug, Default)]
pub struct VoiceSelector {
    chosen: Option<SynthVoice>,
}

impl VoiceSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the selection from `voices`. An empty list leaves any cached
    /// choice untouched so a transient empty report cannot unset a working
    /// voice.
    pub fn refresh(&mut self, voices: &[SynthVoice]) -> Option<&SynthVoice> {
        if voices.is_empty() {
            return self.chosen.as_ref();
        }
        let preferred = voices.iter().find(|v| {
            let name = v.name.to_lowercase();
            FEMALE_VOICE_HINTS.iter().any(|hint| name.contains(hint))
        });
        self.chosen = Some(preferred.unwrap_or(&voices[0]).clone());
        self.chosen.as_ref()
    }

    /// Query the backend's current list, recompute, and apply the choice to
    /// the backend. Returns the voice now in effect, if any.
    pub fn select_on(&mut self, synth: &dyn SynthBackend) -> VoiceResult<Option<SynthVoice>> {
        let voices = synth.voices()?;
        if self.refresh(&voices).is_none() {
            return Ok(None);
        }
        if let Some(ref voice) = self.chosen {
            synth.set_voice(voice)?;
        }
        Ok(self.chosen.clone())
    }

    /// The currently selected voice, if one has been found yet.
    pub fn current(&self) -> Option<&SynthVoice> {
        self.chosen.as_ref()
    }
}
