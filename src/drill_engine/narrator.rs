//! Speech playback.
//!
//! A [`SpeechBackend`] wraps whatever actually talks (browser speech
//! synthesis, a native TTS engine, a test double). [`Narrator`] sits in front
//! of it and enforces one utterance at a time: starting a new one cancels the
//! one in flight. Each started utterance hands back a [`SpeechCompletion`]
//! future, so "say A, then B" is two awaits instead of nested callbacks.
//!
//! Backends are event driven: when the engine reports that an utterance ended
//! (or failed), the glue code calls [`Narrator::finished`] with its id.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::drill_engine::error::SpeechError;

/// Voice names tried first within the requested language.
pub const PREFERRED_VOICE_HINTS: &[&str] = &["Female", "Zira", "Karen"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    /// BCP 47 tag, e.g. `en-US`.
    pub lang: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        // Slightly slow so learners can follow.
        VoiceSettings { rate: 0.9, pitch: 1.0, volume: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UtteranceId(pub u64);

/// Everything a backend needs to speak one string.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    pub locale: String,
    /// `None` leaves the choice to the backend.
    pub voice: Option<Voice>,
    pub settings: VoiceSettings,
}

pub trait SpeechBackend {
    /// `false` when the device has no speech engine at all.
    fn is_supported(&self) -> bool {
        true
    }

    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    /// Begin speaking. Completion is reported later through
    /// [`Narrator::finished`].
    fn start(&mut self, utterance: &Utterance) -> Result<(), SpeechError>;

    /// Stop whatever is speaking.
    fn cancel(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutcome {
    Finished,
    Cancelled,
    Failed(SpeechError),
}

/// Resolves once the utterance ends, is cancelled, or fails.
#[derive(Debug)]
pub struct SpeechCompletion {
    id: UtteranceId,
    rx: oneshot::Receiver<SpeechOutcome>,
}

impl SpeechCompletion {
    pub fn id(&self) -> UtteranceId {
        self.id
    }

    /// Non-blocking peek; `None` while still speaking.
    pub fn try_outcome(&mut self) -> Option<SpeechOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::Canceled) => Some(SpeechOutcome::Cancelled),
        }
    }
}

impl Future for SpeechCompletion {
    type Output = SpeechOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // A dropped sender means the narrator went away mid-utterance.
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|r| r.unwrap_or(SpeechOutcome::Cancelled))
    }
}

struct InFlight {
    id: UtteranceId,
    done: oneshot::Sender<SpeechOutcome>,
}

/// Pick a voice for `locale`: a preferred voice in its language, else any
/// voice in its language, else none.
pub fn select_voice<'v>(voices: &'v [Voice], locale: &str) -> Option<&'v Voice> {
    let language = locale
        .split(|c: char| c == '-' || c == '_')
        .next()
        .unwrap_or(locale)
        .to_lowercase();
    let same_language = |v: &&Voice| v.lang.to_lowercase().starts_with(&language);

    voices
        .iter()
        .filter(same_language)
        .find(|v| PREFERRED_VOICE_HINTS.iter().any(|hint| v.name.contains(hint)))
        .or_else(|| voices.iter().find(same_language))
}

pub struct Narrator<B> {
    backend: B,
    settings: VoiceSettings,
    in_flight: Option<InFlight>,
    next_id: u64,
}

impl<B: SpeechBackend> Narrator<B> {
    pub fn new(backend: B, settings: VoiceSettings) -> Self {
        Narrator { backend, settings, in_flight: None, next_id: 0 }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn is_speaking(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Speak `text`, cancelling anything in flight first.
    pub fn speak(&mut self, text: &str, locale: &str) -> Result<SpeechCompletion, SpeechError> {
        self.cancel();

        if !self.backend.is_supported() {
            warn!("speech synthesis unavailable");
            return Err(SpeechError::Unsupported);
        }

        let voices = self.backend.voices();
        self.next_id += 1;
        let utterance = Utterance {
            id: UtteranceId(self.next_id),
            text: text.to_string(),
            locale: locale.to_string(),
            voice: select_voice(&voices, locale).cloned(),
            settings: self.settings,
        };

        if let Err(e) = self.backend.start(&utterance) {
            warn!(text, error = %e, "failed to start utterance");
            return Err(e);
        }
        debug!(id = utterance.id.0, text, locale, "speaking");

        let (done, rx) = oneshot::channel();
        self.in_flight = Some(InFlight { id: utterance.id, done });
        Ok(SpeechCompletion { id: utterance.id, rx })
    }

    /// Stop the utterance in flight, if any; its completion resolves to
    /// `Cancelled`.
    pub fn cancel(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            self.backend.cancel();
            let _ = in_flight.done.send(SpeechOutcome::Cancelled);
            debug!(id = in_flight.id.0, "utterance cancelled");
        }
    }

    /// Report the end of utterance `id`. Reports for utterances that were
    /// already superseded are ignored.
    ///
    /// Returns the error worth showing the user, if any; cancellation never is.
    pub fn finished(&mut self, id: UtteranceId, result: Result<(), SpeechError>) -> Option<SpeechError> {
        let in_flight = match self.in_flight.take() {
            Some(f) if f.id == id => f,
            other => {
                self.in_flight = other;
                debug!(id = id.0, "ignoring report for superseded utterance");
                return None;
            }
        };

        let (outcome, warning) = match result {
            Ok(()) => (SpeechOutcome::Finished, None),
            Err(e) if e.is_cancellation() => (SpeechOutcome::Cancelled, None),
            Err(e) => {
                warn!(id = id.0, error = %e, "utterance failed");
                (SpeechOutcome::Failed(e.clone()), Some(e))
            }
        };
        let _ = in_flight.done.send(outcome);
        warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[derive(Default)]
    struct Recorder {
        started: Vec<Utterance>,
        cancels: usize,
        voices: Vec<Voice>,
        unsupported: bool,
        refuse: bool,
    }

    impl SpeechBackend for Recorder {
        fn is_supported(&self) -> bool {
            !self.unsupported
        }

        fn voices(&self) -> Vec<Voice> {
            self.voices.clone()
        }

        fn start(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
            if self.refuse {
                return Err(SpeechError::Backend("audio device busy".into()));
            }
            self.started.push(utterance.clone());
            Ok(())
        }

        fn cancel(&mut self) {
            self.cancels += 1;
        }
    }

    fn voice(name: &str, lang: &str) -> Voice {
        Voice { name: name.into(), lang: lang.into() }
    }

    #[test]
    fn completion_resolves_when_backend_reports_end() {
        let mut n = Narrator::new(Recorder::default(), VoiceSettings::default());
        let done = n.speak("walk", "en-US").unwrap();
        assert!(n.is_speaking());
        assert_eq!(n.finished(done.id(), Ok(())), None);
        assert!(!n.is_speaking());
        assert_eq!(block_on(done), SpeechOutcome::Finished);
    }

    #[test]
    fn new_utterance_cancels_the_previous_one() {
        let mut n = Narrator::new(Recorder::default(), VoiceSettings::default());
        let first = n.speak("walk", "en-US").unwrap();
        let second = n.speak("walked", "en-US").unwrap();
        assert_eq!(n.backend().cancels, 1);
        assert_eq!(block_on(first), SpeechOutcome::Cancelled);

        n.finished(second.id(), Ok(()));
        assert_eq!(block_on(second), SpeechOutcome::Finished);
    }

    #[test]
    fn speaking_in_sequence() {
        let mut n = Narrator::new(Recorder::default(), VoiceSettings::default());
        block_on(async {
            for word in ["I", "walked", "home"] {
                let done = n.speak(word, "en-US").unwrap();
                n.finished(done.id(), Ok(()));
                assert_eq!(done.await, SpeechOutcome::Finished);
            }
        });
        assert_eq!(n.backend().cancels, 0);
        let spoken: Vec<&str> = n.backend().started.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(spoken, ["I", "walked", "home"]);
    }

    #[test]
    fn stale_report_is_ignored() {
        let mut n = Narrator::new(Recorder::default(), VoiceSettings::default());
        let first = n.speak("a", "en-US").unwrap();
        let mut second = n.speak("b", "en-US").unwrap();
        assert_eq!(n.finished(first.id(), Err(SpeechError::Backend("late".into()))), None);
        assert!(n.is_speaking());
        assert_eq!(second.try_outcome(), None);
    }

    #[test]
    fn backend_failure_is_surfaced_once() {
        let mut n = Narrator::new(Recorder::default(), VoiceSettings::default());
        let mut done = n.speak("a", "en-US").unwrap();
        let err = SpeechError::Backend("synthesis-failed".into());
        assert_eq!(n.finished(done.id(), Err(err.clone())), Some(err.clone()));
        assert_eq!(done.try_outcome(), Some(SpeechOutcome::Failed(err)));
    }

    #[test]
    fn cancellation_report_is_not_a_warning() {
        let mut n = Narrator::new(Recorder::default(), VoiceSettings::default());
        let done = n.speak("a", "en-US").unwrap();
        assert_eq!(n.finished(done.id(), Err(SpeechError::Cancelled)), None);
        assert_eq!(block_on(done), SpeechOutcome::Cancelled);
    }

    #[test]
    fn unsupported_and_refused_backends_error() {
        let mut n = Narrator::new(
            Recorder { unsupported: true, ..Default::default() },
            VoiceSettings::default(),
        );
        assert_eq!(n.speak("a", "en-US").unwrap_err(), SpeechError::Unsupported);

        let mut n = Narrator::new(Recorder { refuse: true, ..Default::default() }, VoiceSettings::default());
        assert!(matches!(n.speak("a", "en-US"), Err(SpeechError::Backend(_))));
        assert!(!n.is_speaking());
    }

    #[test]
    fn voice_selection_prefers_hinted_names() {
        let voices = vec![
            voice("Google español", "es-ES"),
            voice("Microsoft David", "en-US"),
            voice("Microsoft Zira", "en-US"),
        ];
        assert_eq!(select_voice(&voices, "en-US").unwrap().name, "Microsoft Zira");
        assert_eq!(select_voice(&voices[..2], "en-GB").unwrap().name, "Microsoft David");
        assert!(select_voice(&voices[..1], "en-US").is_none());
    }

    #[test]
    fn utterance_carries_settings_and_voice() {
        let backend = Recorder { voices: vec![voice("Karen", "en-AU")], ..Default::default() };
        let mut n = Narrator::new(backend, VoiceSettings::default());
        n.speak("read", "en-US").unwrap();
        let u = &n.backend().started[0];
        assert_eq!(u.voice.as_ref().map(|v| v.name.as_str()), Some("Karen"));
        assert!((u.settings.rate - 0.9).abs() < f32::EPSILON);
        assert_eq!(u.locale, "en-US");
    }
}
