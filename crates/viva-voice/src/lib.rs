//! # Viva Voice - Interviewer Speech Output
//!
//! Turns interviewer replies into audible speech: the hosted TTS clip plays
//! when the service produced one, and the platform synthesizer covers
//! everything else.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      SpeechOutput                          │
//! │  reply (text, audio_url?)                                  │
//! │        │                                                   │
//! │        ├── clip present ──→ ┌────────────────┐             │
//! │        │                    │  RemoteAudio   │── failure ─┐│
//! │        │                    │    (rodio)     │            ││
//! │        │                    └────────────────┘            ││
//! │        └── no clip ──────────────────────────────────────┐││
//! │                                                          ▼▼│
//! │  ┌───────────────┐   voice list    ┌──────────────────────┐│
//! │  │ VoiceSelector │◄───────────────►│     SynthBackend     ││
//! │  │ (name hints)  │   set_voice     │ (platform / silent)  ││
//! │  └───────────────┘                 └──────────────────────┘│
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod playback;
pub mod remote;
pub mod select;
pub mod synth;

pub use error::{VoiceError, VoiceResult};
pub use playback::{SpeechOutput, SpeechSink};
pub use remote::{decode_data_url, PlaceholderRemoteAudio, RemoteAudio, RodioRemoteAudio};
pub use select::VoiceSelector;
pub use synth::{create_best_synth, PlaceholderSynth, SynthBackend, SynthVoice};
#[cfg(feature = "native-synth")]
pub use synth::NativeSynth;
