//! **Speech output** — the two-stage playback chain for interviewer replies.
//!
//! Stage one plays the remotely-synthesized clip when the service provided
//! one; stage two speaks the reply text through the local synthesizer when
//! there is no clip or the clip fails. If the reply has text, the user hears
//! something regardless of which stage is available.

use crate::error::VoiceResult;
use crate::remote::{PlaceholderRemoteAudio, RemoteAudio, RodioRemoteAudio};
use crate::select::VoiceSelector;
use crate::synth::{create_best_synth, SynthBackend, SynthVoice};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// The seam the session layer speaks through. One call per interviewer reply.
#[async_trait]
pub trait SpeechSink: Send + Sync {
    /// Voice the reply: remote clip first, local synthesis as fallback.
    /// Playback problems are logged, never surfaced — a silent reply must not
    /// fail the conversation.
    async fn speak(&self, text: &str, audio_url: Option<&str>);

    /// Cancel whatever is being spoken, from either stage. Idempotent.
    fn stop(&self);

    /// Whether either stage is currently producing audio.
    fn is_playing(&self) -> bool;
}

/// Remote-first playback with local fallback.
pub struct SpeechOutput {
    remote: Arc<dyn RemoteAudio>,
    synth: Arc<dyn SynthBackend>,
    selector: Mutex<VoiceSelector>,
}

impl SpeechOutput {
    pub fn new(remote: Arc<dyn RemoteAudio>, synth: Arc<dyn SynthBackend>) -> Self {
        Self {
            remote,
            synth,
            selector: Mutex::new(VoiceSelector::new()),
        }
    }

    /// Wire the best chain this host supports: rodio playback when an output
    /// device exists (placeholder otherwise) and the best available
    /// synthesizer.
    pub fn best_available() -> Self {
        let remote: Arc<dyn RemoteAudio> = match RodioRemoteAudio::new() {
            Ok(player) => Arc::new(player),
            Err(e) => {
                warn!("remote audio unavailable ({e}), replies fall back to local synthesis");
                Arc::new(PlaceholderRemoteAudio)
            }
        };
        Self::new(remote, Arc::from(create_best_synth()))
    }

    /// Recompute the fallback voice from the engine's current list. Call when
    /// the platform reports the list changed; also runs lazily before the
    /// first local utterance.
    pub fn refresh_voices(&self) -> VoiceResult<Option<SynthVoice>> {
        let mut selector = self
            .selector
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        selector.select_on(self.synth.as_ref())
    }

    /// The fallback voice currently in effect, if one has been found.
    pub fn current_voice(&self) -> Option<SynthVoice> {
        let selector = self
            .selector
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        selector.current().cloned()
    }

    fn speak_locally(&self, text: &str) {
        // The voice list may have been empty at startup; keep re-attempting
        // selection until a voice sticks.
        if self.current_voice().is_none() {
            if let Err(e) = self.refresh_voices() {
                debug!("voice selection failed ({e}), engine default stays in effect");
            }
        }
        if let Err(e) = self.synth.speak(text) {
            warn!("local synthesis failed: {e}");
        }
    }
}

#[async_trait]
impl SpeechSink for SpeechOutput {
    async fn speak(&self, text: &str, audio_url: Option<&str>) {
        let Some(url) = audio_url else {
            if !text.trim().is_empty() {
                // Never overlap: whatever is still audible goes quiet first.
                self.stop();
                self.speak_locally(text);
            }
            return;
        };

        self.stop();
        match self.remote.play_url(url).await {
            Ok(()) => {}
            Err(e) => {
                warn!("remote clip failed ({e}), falling back to local synthesis");
                if !text.trim().is_empty() {
                    self.speak_locally(text);
                }
            }
        }
    }

    fn stop(&self) {
        self.remote.stop();
        if let Err(e) = self.synth.stop() {
            debug!("synthesizer stop failed: {e}");
        }
    }

    fn is_playing(&self) -> bool {
        self.remote.is_playing() || self.synth.is_speaking().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VoiceError;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct ScriptedRemote {
        fail: bool,
        plays: Mutex<Vec<String>>,
        stops: AtomicUsize,
        playing: AtomicBool,
    }

    impl ScriptedRemote {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn play_count(&self) -> usize {
            self.plays.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RemoteAudio for ScriptedRemote {
        async fn play_url(&self, url: &str) -> VoiceResult<()> {
            self.plays.lock().unwrap().push(url.to_string());
            if self.fail {
                return Err(VoiceError::Playback("scripted failure".to_string()));
            }
            self.playing.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
            self.playing.store(false, Ordering::SeqCst);
        }

        fn is_playing(&self) -> bool {
            self.playing.load(Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    struct RecordingSynth {
        voices: Vec<SynthVoice>,
        spoken: Mutex<Vec<String>>,
        stops: AtomicUsize,
        selected: Mutex<Option<SynthVoice>>,
    }

    impl RecordingSynth {
        fn with_voices(voices: Vec<SynthVoice>) -> Self {
            Self {
                voices,
                ..Self::default()
            }
        }

        fn spoken_count(&self) -> usize {
            self.spoken.lock().unwrap().len()
        }
    }

    impl SynthBackend for RecordingSynth {
        fn speak(&self, text: &str) -> VoiceResult<()> {
            self.spoken.lock().unwrap().push(text.to_string());
            Ok(())
        }

        fn stop(&self) -> VoiceResult<()> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn is_speaking(&self) -> VoiceResult<bool> {
            Ok(false)
        }

        fn voices(&self) -> VoiceResult<Vec<SynthVoice>> {
            Ok(self.voices.clone())
        }

        fn set_voice(&self, voice: &SynthVoice) -> VoiceResult<()> {
            *self.selected.lock().unwrap() = Some(voice.clone());
            Ok(())
        }
    }

    fn chain(remote: Arc<ScriptedRemote>, synth: Arc<RecordingSynth>) -> SpeechOutput {
        SpeechOutput::new(remote, synth)
    }

    #[tokio::test]
    async fn text_without_clip_is_spoken_locally_once() {
        let remote = Arc::new(ScriptedRemote::default());
        let synth = Arc::new(RecordingSynth::default());
        let out = chain(Arc::clone(&remote), Arc::clone(&synth));

        out.speak("tell me about hash maps", None).await;

        assert_eq!(synth.spoken_count(), 1);
        assert_eq!(remote.play_count(), 0);
    }

    #[tokio::test]
    async fn empty_reply_stays_silent() {
        let synth = Arc::new(RecordingSynth::default());
        let out = chain(Arc::new(ScriptedRemote::default()), Arc::clone(&synth));

        out.speak("   ", None).await;

        assert_eq!(synth.spoken_count(), 0);
    }

    #[tokio::test]
    async fn working_clip_never_reaches_the_synthesizer() {
        let remote = Arc::new(ScriptedRemote::default());
        let synth = Arc::new(RecordingSynth::default());
        let out = chain(Arc::clone(&remote), Arc::clone(&synth));

        out.speak("the reply", Some("https://tts.example/clip.mp3")).await;

        assert_eq!(remote.play_count(), 1);
        assert_eq!(synth.spoken_count(), 0);
        assert!(out.is_playing());
    }

    #[tokio::test]
    async fn failed_clip_falls_back_to_local_synthesis_once() {
        let remote = Arc::new(ScriptedRemote::failing());
        let synth = Arc::new(RecordingSynth::default());
        let out = chain(Arc::clone(&remote), Arc::clone(&synth));

        out.speak("the reply", Some("https://tts.example/clip.mp3")).await;

        assert_eq!(remote.play_count(), 1);
        assert_eq!(synth.spoken_count(), 1);
        assert_eq!(synth.spoken.lock().unwrap()[0], "the reply");
    }

    #[tokio::test]
    async fn failed_clip_with_no_text_stays_silent() {
        let remote = Arc::new(ScriptedRemote::failing());
        let synth = Arc::new(RecordingSynth::default());
        let out = chain(remote, Arc::clone(&synth));

        out.speak("", Some("https://tts.example/clip.mp3")).await;

        assert_eq!(synth.spoken_count(), 0);
    }

    #[tokio::test]
    async fn new_clip_silences_the_previous_one_first() {
        let remote = Arc::new(ScriptedRemote::default());
        let synth = Arc::new(RecordingSynth::default());
        let out = chain(Arc::clone(&remote), Arc::clone(&synth));

        out.speak("first", Some("https://tts.example/1.mp3")).await;
        out.speak("second", Some("https://tts.example/2.mp3")).await;

        // Both stages were stopped before each clip started.
        assert!(remote.stops.load(Ordering::SeqCst) >= 2);
        assert!(synth.stops.load(Ordering::SeqCst) >= 2);
        assert_eq!(remote.play_count(), 2);
    }

    #[tokio::test]
    async fn stop_is_idempotent_and_hits_both_stages() {
        let remote = Arc::new(ScriptedRemote::default());
        let synth = Arc::new(RecordingSynth::default());
        let out = chain(Arc::clone(&remote), Arc::clone(&synth));

        out.stop();
        out.stop();

        assert_eq!(remote.stops.load(Ordering::SeqCst), 2);
        assert_eq!(synth.stops.load(Ordering::SeqCst), 2);
        assert!(!out.is_playing());
    }

    #[tokio::test]
    async fn local_speech_applies_the_selected_voice_first() {
        let synth = Arc::new(RecordingSynth::with_voices(vec![
            SynthVoice::new("v1", "Daniel"),
            SynthVoice::new("v2", "Samantha"),
        ]));
        let out = chain(Arc::new(ScriptedRemote::default()), Arc::clone(&synth));

        out.speak("hello", None).await;

        let selected = synth.selected.lock().unwrap().clone();
        assert_eq!(selected.unwrap().id, "v2");
        assert_eq!(out.current_voice().unwrap().id, "v2");
    }
}
