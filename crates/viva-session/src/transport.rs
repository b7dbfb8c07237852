//! **Transport client** — request/response wrapper around the interview
//! backend.
//!
//! The controller only sees the `InterviewTransport` trait; `HttpTransport`
//! is the production implementation. Wire shapes mirror the backend's
//! snake_case JSON exactly.

use crate::error::{SessionError, SessionResult};
use crate::settings::{InterviewSettings, InterviewType, ProblemSource, Tone, Verbosity};
use crate::transcript::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Payload for starting a session.
#[derive(Debug, Clone, Serialize)]
pub struct StartSessionRequest {
    pub interview_type: InterviewType,
    pub verbosity: Verbosity,
    pub tone: Tone,
    pub problem_source: ProblemSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_url: Option<String>,
}

impl From<&InterviewSettings> for StartSessionRequest {
    fn from(settings: &InterviewSettings) -> Self {
        Self {
            interview_type: settings.interview_type,
            verbosity: settings.verbosity,
            tone: settings.tone,
            problem_source: settings.problem_source,
            problem_description: settings.problem_description.clone(),
            problem_url: settings.problem_url.clone(),
        }
    }
}

/// The backend's answer to a session start.
#[derive(Debug, Clone, Deserialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub opening_text: String,
    /// Hosted clip URL or inlined `data:audio/mpeg;base64,…`; absent when the
    /// TTS service was unavailable.
    #[serde(default)]
    pub audio_url: Option<String>,
}

/// One user turn sent for a reply.
#[derive(Debug, Clone, Serialize)]
pub struct RespondRequest {
    pub session_id: String,
    pub user_message: String,
    /// Supplementary text from the active interview view (e.g. current code
    /// and program output), attached to this turn only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// The interviewer's reply to one user turn.
#[derive(Debug, Clone, Deserialize)]
pub struct RespondResponse {
    pub response_text: String,
    #[serde(default)]
    pub audio_url: Option<String>,
    /// True once the interviewer considers the interview wrapped up.
    #[serde(default)]
    pub is_complete: bool,
}

/// Full session snapshot sent for durable storage.
#[derive(Debug, Clone, Serialize)]
pub struct SaveSessionRequest {
    pub session_id: String,
    pub interview_type: InterviewType,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
}

/// Acknowledgment for a save.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveAck {
    pub message: String,
    pub session_id: String,
    pub saved_at: String,
}

/// Transcript sent for post-hoc feedback.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeSessionRequest {
    pub session_id: String,
    pub messages: Vec<Message>,
    pub interview_type: InterviewType,
}

/// Structured feedback for a completed (or abandoned) interview.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionAnalysis {
    pub overall_score: u8,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub detailed_feedback: String,
    pub recommendations: Vec<String>,
}

/// The remote interview service, as the controller sees it.
#[async_trait]
pub trait InterviewTransport: Send + Sync {
    /// Open a session; the backend picks the problem and writes the opener.
    async fn start_session(&self, req: &StartSessionRequest) -> SessionResult<StartSessionResponse>;

    /// Send one user turn and get the interviewer's reply.
    async fn respond(&self, req: &RespondRequest) -> SessionResult<RespondResponse>;

    /// Tear down a session server-side. Callers treat failures as advisory.
    async fn end_session(&self, session_id: &str) -> SessionResult<()>;

    /// Store the transcript for later review.
    async fn save_session(&self, req: &SaveSessionRequest) -> SessionResult<SaveAck>;

    /// Request structured feedback on the transcript.
    async fn analyze_session(&self, req: &AnalyzeSessionRequest) -> SessionResult<SessionAnalysis>;
}

/// HTTP implementation of [`InterviewTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Base URL without trailing slash (e.g. http://127.0.0.1:8000).
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create with an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> SessionResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Build from the environment: `VIVA_API_URL`, default local backend.
    pub fn from_env() -> SessionResult<Self> {
        let base_url =
            std::env::var("VIVA_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn read_error(res: reqwest::Response) -> SessionError {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        SessionError::Transport(format!("API error {}: {}", status, body))
    }
}

#[async_trait]
impl InterviewTransport for HttpTransport {
    async fn start_session(&self, req: &StartSessionRequest) -> SessionResult<StartSessionResponse> {
        let res = self
            .client
            .post(self.url("/api/voice/start"))
            .json(req)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::read_error(res).await);
        }
        Ok(res.json().await?)
    }

    async fn respond(&self, req: &RespondRequest) -> SessionResult<RespondResponse> {
        let res = self
            .client
            .post(self.url("/api/voice/respond"))
            .json(req)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::read_error(res).await);
        }
        Ok(res.json().await?)
    }

    async fn end_session(&self, session_id: &str) -> SessionResult<()> {
        let res = self
            .client
            .delete(self.url(&format!("/api/voice/session/{session_id}")))
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::read_error(res).await);
        }
        Ok(())
    }

    async fn save_session(&self, req: &SaveSessionRequest) -> SessionResult<SaveAck> {
        let res = self
            .client
            .post(self.url("/api/session/save"))
            .json(req)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::read_error(res).await);
        }
        Ok(res.json().await?)
    }

    async fn analyze_session(&self, req: &AnalyzeSessionRequest) -> SessionResult<SessionAnalysis> {
        let res = self
            .client
            .post(self.url("/api/session/analyze"))
            .json(req)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(Self::read_error(res).await);
        }
        Ok(res.json().await?)
    }
}
