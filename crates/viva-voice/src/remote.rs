//! **Remote audio** — playback of interviewer clips synthesized by the hosted
//! TTS service.
//!
//! The service returns either a hosted URL or the MP3 inlined as a
//! `data:audio/mpeg;base64,…` URL; both decode into the same rodio sink. The
//! `OutputStream` is not `Send`, so it lives on a dedicated keeper thread and
//! the handle only touches the (thread-safe) `Sink`.

use crate::error::{VoiceError, VoiceResult};
use async_trait::async_trait;
use base64::Engine;
use rodio::{Decoder, OutputStream, Sink, Source};
use std::io::Cursor;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// A player for remotely-synthesized audio clips.
#[async_trait]
pub trait RemoteAudio: Send + Sync {
    /// Fetch/decode `url` and start playing it, replacing any clip already
    /// playing. Returns an error if the clip never starts.
    async fn play_url(&self, url: &str) -> VoiceResult<()>;

    /// Stop playback immediately. Must be idempotent.
    fn stop(&self);

    /// Whether a clip is currently playing or queued.
    fn is_playing(&self) -> bool;
}

/// Placeholder player: reports failure on every clip so the caller falls
/// through to local synthesis. Use when no output device exists.
#[derive(Debug, Default)]
pub struct PlaceholderRemoteAudio;

#[async_trait]
impl RemoteAudio for PlaceholderRemoteAudio {
    async fn play_url(&self, _url: &str) -> VoiceResult<()> {
        Err(VoiceError::Playback("no audio output available".to_string()))
    }

    fn stop(&self) {}

    fn is_playing(&self) -> bool {
        false
    }
}

/// Decode a `data:<mediatype>;base64,<payload>` URL into raw audio bytes.
pub fn decode_data_url(url: &str) -> VoiceResult<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| VoiceError::Decode("not a data: URL".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| VoiceError::Decode("data: URL without payload".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(VoiceError::Decode(
            "data: URL payload is not base64-encoded".to_string(),
        ));
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| VoiceError::Decode(format!("invalid base64 payload: {e}")))
}

/// Rodio-backed remote player (default output device).
pub struct RodioRemoteAudio {
    sink: Arc<Sink>,
    client: reqwest::Client,
    // Dropping this wakes the keeper thread, which drops the OutputStream.
    _shutdown_tx: mpsc::Sender<()>,
}

impl RodioRemoteAudio {
    /// Open the default output device. Fails when the host has none (use
    /// [`PlaceholderRemoteAudio`] there).
    pub fn new() -> VoiceResult<Self> {
        let (ready_tx, ready_rx) = mpsc::channel::<Result<Arc<Sink>, String>>();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        // The OutputStream must stay alive for playback to continue but is
        // not Send, so a keeper thread owns it for the player's lifetime.
        thread::spawn(move || {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                    return;
                }
            };
            let sink = match Sink::try_new(&handle) {
                Ok(s) => Arc::new(s),
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                    return;
                }
            };
            let _ = ready_tx.send(Ok(Arc::clone(&sink)));
            // Parks until the handle (and its shutdown sender) is dropped.
            let _ = shutdown_rx.recv();
            drop(stream);
        });

        let sink = ready_rx
            .recv()
            .map_err(|_| VoiceError::AudioDevice("audio keeper thread died".to_string()))?
            .map_err(VoiceError::AudioDevice)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        info!("RodioRemoteAudio: output sink ready");
        Ok(Self {
            sink,
            client,
            _shutdown_tx: shutdown_tx,
        })
    }

    async fn resolve_bytes(&self, url: &str) -> VoiceResult<Vec<u8>> {
        if url.starts_with("data:") {
            return decode_data_url(url);
        }
        if url.starts_with("http://") || url.starts_with("https://") {
            let res = self.client.get(url).send().await?;
            if !res.status().is_success() {
                return Err(VoiceError::Fetch(format!(
                    "audio fetch failed with status {}",
                    res.status()
                )));
            }
            return Ok(res.bytes().await?.to_vec());
        }
        Err(VoiceError::Fetch(format!("unsupported audio URL: {url}")))
    }
}

#[async_trait]
impl RemoteAudio for RodioRemoteAudio {
    async fn play_url(&self, url: &str) -> VoiceResult<()> {
        let bytes = self.resolve_bytes(url).await?;
        if bytes.is_empty() {
            return Err(VoiceError::Decode("empty audio clip".to_string()));
        }
        // One clip at a time: clear whatever is still queued.
        self.sink.stop();
        let source = Decoder::new(Cursor::new(bytes))
            .map_err(|e| VoiceError::Decode(format!("clip decode failed: {e}")))?;
        self.sink.append(source.convert_samples::<f32>());
        debug!("RodioRemoteAudio: clip queued");
        Ok(())
    }

    fn stop(&self) {
        self.sink.stop();
    }

    fn is_playing(&self) -> bool {
        !self.sink.empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_round_trips_payload() {
        let url = format!(
            "data:audio/mpeg;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(b"mp3-bytes")
        );
        assert_eq!(decode_data_url(&url).unwrap(), b"mp3-bytes");
    }

    #[test]
    fn data_url_without_base64_marker_is_rejected() {
        let err = decode_data_url("data:audio/mpeg,plain-payload").unwrap_err();
        assert!(matches!(err, VoiceError::Decode(_)));
    }

    #[test]
    fn data_url_with_bad_payload_is_rejected() {
        let err = decode_data_url("data:audio/mpeg;base64,@@@").unwrap_err();
        assert!(matches!(err, VoiceError::Decode(_)));
    }

    #[test]
    fn non_data_urls_are_rejected_by_the_decoder() {
        assert!(decode_data_url("https://example.com/a.mp3").is_err());
    }

    #[tokio::test]
    async fn placeholder_always_fails_playback() {
        let player = PlaceholderRemoteAudio;
        assert!(player.play_url("data:audio/mpeg;base64,AAAA").await.is_err());
        assert!(!player.is_playing());
        player.stop();
    }
}
