//! **Session controller** — single source of truth for one interview attempt.
//!
//! Owns the session identity, the transcript, and the in-flight flags, and
//! exposes the operations that start, advance, save, analyze, and end a
//! session. Every operation takes `&mut self`, so a second request cannot be
//! issued while one is in flight; per-session requests are serialized by the
//! exclusive borrow rather than a lock.

use crate::context::{ContextFn, ContextSlot};
use crate::error::{SessionError, SessionResult};
use crate::settings::{InterviewSettings, SettingsPatch};
use crate::transcript::Message;
use crate::transport::{
    AnalyzeSessionRequest, InterviewTransport, RespondRequest, RespondResponse, SaveAck,
    SaveSessionRequest, SessionAnalysis, StartSessionRequest, StartSessionResponse,
};
use std::sync::Arc;
use tracing::{info, warn};
use viva_voice::SpeechSink;

/// Session id sent when analyzing a transcript after its session ended.
pub const DETACHED_SESSION_ID: &str = "detached";

/// Drives one interview attempt against the remote service.
pub struct SessionController {
    transport: Arc<dyn InterviewTransport>,
    speech: Arc<dyn SpeechSink>,
    settings: InterviewSettings,
    session_id: Option<String>,
    transcript: Vec<Message>,
    context: ContextSlot,
    last_error: Option<String>,
    loading: bool,
    recording: bool,
    complete: bool,
}

impl SessionController {
    pub fn new(
        transport: Arc<dyn InterviewTransport>,
        speech: Arc<dyn SpeechSink>,
        settings: InterviewSettings,
    ) -> Self {
        Self {
            transport,
            speech,
            settings,
            session_id: None,
            transcript: Vec::new(),
            context: ContextSlot::new(),
            last_error: None,
            loading: false,
            recording: false,
            complete: false,
        }
    }

    /// Start a new session from the current settings.
    ///
    /// A still-active session is ended first (best effort) so at most one
    /// session is ever active. On success the transcript is reset to the
    /// interviewer's opening message and that message is played; on failure
    /// the error is recorded and no partial session is left behind.
    pub async fn start_session(&mut self) -> SessionResult<()> {
        if let Some(prior) = self.session_id.take() {
            self.speech.stop();
            if let Err(err) = self.transport.end_session(&prior).await {
                warn!("failed to end previous session {prior}: {err}");
            }
        }

        self.loading = true;
        let req = StartSessionRequest::from(&self.settings);
        let result = self.transport.start_session(&req).await;
        self.loading = false;

        match result {
            Ok(StartSessionResponse {
                session_id,
                opening_text,
                audio_url,
            }) => {
                info!("session {session_id} started ({})", self.settings.interview_type.label());
                self.session_id = Some(session_id);
                self.transcript = vec![Message::interviewer(opening_text.clone())];
                self.complete = false;
                self.last_error = None;
                self.speech.speak(&opening_text, audio_url.as_deref()).await;
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    /// Send one user turn and append the interviewer's reply.
    ///
    /// The user message is appended before the network call settles and is
    /// never rolled back: visible input must survive a failed reply. Context
    /// resolves from the explicit argument, else the registered provider,
    /// else nothing.
    pub async fn send_response(
        &mut self,
        user_message: impl Into<String>,
        context: Option<String>,
    ) -> SessionResult<()> {
        let Some(session_id) = self.session_id.clone() else {
            return self.fail(SessionError::NoActiveSession);
        };
        let user_message = user_message.into();
        let context = context.or_else(|| self.context.snapshot());

        // Optimistic append: the turn is part of the transcript whether or
        // not the interviewer manages to reply.
        self.transcript.push(Message::user(user_message.clone()));

        self.loading = true;
        let req = RespondRequest {
            session_id,
            user_message,
            context,
        };
        let result = self.transport.respond(&req).await;
        self.loading = false;

        match result {
            Ok(RespondResponse {
                response_text,
                audio_url,
                is_complete,
            }) => {
                self.transcript.push(Message::interviewer(response_text.clone()));
                self.complete = is_complete;
                self.last_error = None;
                self.speech.speak(&response_text, audio_url.as_deref()).await;
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    /// End the session. Remote teardown is best effort; local cleanup always
    /// happens: audio stops, and session id, transcript, and error are
    /// cleared.
    pub async fn end_session(&mut self) {
        if let Some(session_id) = self.session_id.take() {
            if let Err(err) = self.transport.end_session(&session_id).await {
                warn!("remote end of session {session_id} failed (cleaning up anyway): {err}");
            }
        }
        self.speech.stop();
        self.transcript.clear();
        self.last_error = None;
        self.loading = false;
        self.complete = false;
    }

    /// Store the transcript for later review. Needs an active session with at
    /// least one message.
    pub async fn save_session(&mut self) -> SessionResult<SaveAck> {
        let Some(session_id) = self.session_id.clone() else {
            return self.fail(SessionError::NothingToSave);
        };
        if self.transcript.is_empty() {
            return self.fail(SessionError::NothingToSave);
        }

        self.loading = true;
        let req = SaveSessionRequest {
            session_id,
            interview_type: self.settings.interview_type,
            messages: self.transcript.clone(),
            problem: self.settings.problem_description.clone(),
        };
        let result = self.transport.save_session(&req).await;
        self.loading = false;

        match result {
            Ok(ack) => Ok(ack),
            Err(err) => self.fail(err),
        }
    }

    /// Request structured feedback on the conversation so far. Works with or
    /// without an active session (so a finished interview can still be
    /// analyzed), but needs at least one full exchange.
    pub async fn analyze_session(&mut self) -> SessionResult<SessionAnalysis> {
        if self.transcript.len() < 2 {
            return self.fail(SessionError::NotEnoughTranscript);
        }

        self.loading = true;
        let req = AnalyzeSessionRequest {
            session_id: self
                .session_id
                .clone()
                .unwrap_or_else(|| DETACHED_SESSION_ID.to_string()),
            messages: self.transcript.clone(),
            interview_type: self.settings.interview_type,
        };
        let result = self.transport.analyze_session(&req).await;
        self.loading = false;

        match result {
            Ok(analysis) => Ok(analysis),
            Err(err) => self.fail(err),
        }
    }

    /// Shallow-merge a settings patch. The controller accepts changes at any
    /// time; whether to allow edits mid-session is the caller's concern.
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.settings.apply(patch);
    }

    /// Install the active view's context provider, replacing any previous
    /// one. Its output is attached to each subsequent turn sent without
    /// explicit context.
    pub fn set_context_provider(&mut self, provider: ContextFn) {
        self.context.set(provider);
    }

    /// Remove the context provider; subsequent turns carry no context.
    pub fn clear_context_provider(&mut self) {
        self.context.clear();
    }

    /// Stop any interviewer audio, from either playback stage.
    pub fn stop_audio(&self) {
        self.speech.stop();
    }

    pub fn settings(&self) -> &InterviewSettings {
        &self.settings
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.session_id.is_some()
    }

    /// The transcript, oldest first. Read-only; only controller operations
    /// append.
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True once the interviewer has wrapped the interview up.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_playing(&self) -> bool {
        self.speech.is_playing()
    }

    /// Advisory microphone flag. Callers should not record while interviewer
    /// audio is playing; the controller only tracks the state.
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
    }

    /// Record `err` in the error slot and hand it back to the caller.
    fn fail<T>(&mut self, err: SessionError) -> SessionResult<T> {
        self.last_error = Some(err.to_string());
        Err(err)
    }
}
