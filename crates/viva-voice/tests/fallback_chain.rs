//! The fallback chain exercised through the public API: a flaky remote stage
//! must never leave a textual reply silent.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use viva_voice::{
    RemoteAudio, SpeechOutput, SpeechSink, SynthBackend, SynthVoice, VoiceError, VoiceResult,
};

/// Remote stage that works for the first `good_plays` clips, then fails.
struct FlakyRemote {
    good_plays: usize,
    attempts: AtomicUsize,
    playing: AtomicBool,
}

impl FlakyRemote {
    fn new(good_plays: usize) -> Self {
        Self {
            good_plays,
            attempts: AtomicUsize::new(0),
            playing: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl RemoteAudio for FlakyRemote {
    async fn play_url(&self, _url: &str) -> VoiceResult<()> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt >= self.good_plays {
            return Err(VoiceError::Playback("service degraded".to_string()));
        }
        self.playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) {
        self.playing.store(false, Ordering::SeqCst);
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct ScriptedSynth {
    voices: Vec<SynthVoice>,
    spoken: Mutex<Vec<String>>,
}

impl SynthBackend for ScriptedSynth {
    fn speak(&self, text: &str) -> VoiceResult<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn stop(&self) -> VoiceResult<()> {
        Ok(())
    }

    fn is_speaking(&self) -> VoiceResult<bool> {
        Ok(false)
    }

    fn voices(&self) -> VoiceResult<Vec<SynthVoice>> {
        Ok(self.voices.clone())
    }

    fn set_voice(&self, _voice: &SynthVoice) -> VoiceResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn every_textual_reply_is_heard_even_as_the_service_degrades() {
    let remote = Arc::new(FlakyRemote::new(1));
    let synth = Arc::new(ScriptedSynth::default());
    let out = SpeechOutput::new(Arc::clone(&remote) as _, Arc::clone(&synth) as _);

    // First reply: clip plays, no fallback.
    out.speak("first question", Some("https://tts.example/1.mp3")).await;
    assert!(synth.spoken.lock().unwrap().is_empty());

    // Second reply: clip fails, text falls back to the synthesizer.
    out.speak("second question", Some("https://tts.example/2.mp3")).await;
    assert_eq!(
        synth.spoken.lock().unwrap().as_slice(),
        ["second question".to_string()]
    );

    // Third reply: the service stops sending clips at all.
    out.speak("third question", None).await;
    assert_eq!(synth.spoken.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn voice_selection_sticks_once_a_list_appears() {
    let synth = Arc::new(ScriptedSynth {
        voices: vec![
            SynthVoice::new("v1", "Alex"),
            SynthVoice::new("v2", "Victoria"),
        ],
        ..ScriptedSynth::default()
    });
    let out = SpeechOutput::new(
        Arc::new(FlakyRemote::new(0)) as _,
        Arc::clone(&synth) as _,
    );

    assert!(out.current_voice().is_none());
    let chosen = out.refresh_voices().unwrap();
    assert_eq!(chosen.unwrap().name, "Victoria");
    assert_eq!(out.current_voice().unwrap().id, "v2");
}
