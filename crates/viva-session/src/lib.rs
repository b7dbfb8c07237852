//! # Viva Session - Interview Rehearsal Core
//!
//! The session core behind the rehearsal shell: one controller owns the
//! session identity, the transcript, and the in-flight flags, and drives the
//! remote interviewer agent through a narrow transport trait. Replies are
//! voiced through the `viva-voice` fallback chain.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     SessionController                        │
//! │  settings ─┐                                                 │
//! │            ▼                                                 │
//! │  ┌──────────────────┐   requests    ┌─────────────────────┐  │
//! │  │ session id,      │──────────────►│ InterviewTransport  │  │
//! │  │ transcript,      │◄──────────────│  (HTTP backend)     │  │
//! │  │ flags, error slot│   replies     └─────────────────────┘  │
//! │  └──────────────────┘                                        │
//! │      │          ▲                                            │
//! │      │          │ context snapshot (per send)                │
//! │      │      ┌───┴─────────┐        ┌──────────────────────┐  │
//! │      │      │ ContextSlot │        │ SpeechSink           │  │
//! │      └─────►│ (one view)  │        │ (viva-voice chain)   │  │
//! │  reply text └─────────────┘        └──────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod context;
pub mod controller;
pub mod error;
pub mod settings;
pub mod transcript;
pub mod transport;

pub use context::{ContextFn, ContextSlot};
pub use controller::{SessionController, DETACHED_SESSION_ID};
pub use error::{SessionError, SessionResult};
pub use settings::{
    InterviewSettings, InterviewType, ProblemSource, SettingsPatch, Tone, Verbosity,
};
pub use transcript::{Message, Role};
pub use transport::{
    AnalyzeSessionRequest, HttpTransport, InterviewTransport, RespondRequest, RespondResponse,
    SaveAck, SaveSessionRequest, SessionAnalysis, StartSessionRequest, StartSessionResponse,
};
