//! One open-able pronunciation drill: session state, speech, randomness and
//! vocabulary in one owner.
//!
//! The presentation layer forwards user actions here and renders from
//! [`PronunciationDrill::session`]. Speech effects are executed before the
//! effect list is returned; speech failures come back as
//! [`DrillEffect::Warning`] and never stop the drill.

use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use crate::drill_engine::{
    config::DrillConfig,
    error::SpeechError,
    models::VerbEntry,
    narrator::{Narrator, SpeechBackend, SpeechCompletion, UtteranceId},
    session::{DrillEffect, DrillEvent, ExerciseSession, RetryTicket},
};

fn speech_warning(e: &SpeechError) -> String {
    match e {
        SpeechError::Unsupported => e.to_string(),
        other => format!("could not play the pronunciation ({other})"),
    }
}

pub struct PronunciationDrill<B, R = StdRng> {
    config: DrillConfig,
    verbs: Vec<VerbEntry>,
    session: ExerciseSession,
    narrator: Narrator<B>,
    rng: R,
    pending_retry: Option<RetryTicket>,
    last_utterance: Option<SpeechCompletion>,
}

impl<B: SpeechBackend> PronunciationDrill<B, StdRng> {
    /// Seeded from `config.rng_seed`, or from entropy when unset.
    pub fn new(config: DrillConfig, verbs: Vec<VerbEntry>, backend: B) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        Self::with_rng(config, verbs, backend, rng)
    }
}

impl<B: SpeechBackend, R: Rng> PronunciationDrill<B, R> {
    pub fn with_rng(config: DrillConfig, verbs: Vec<VerbEntry>, backend: B, rng: R) -> Self {
        let session = ExerciseSession::new(config.total_rounds)
            .with_completion_message(config.completion_message.clone());
        let narrator = Narrator::new(backend, config.voice);
        PronunciationDrill {
            config,
            verbs,
            session,
            narrator,
            rng,
            pending_retry: None,
            last_utterance: None,
        }
    }

    pub fn config(&self) -> &DrillConfig {
        &self.config
    }

    pub fn session(&self) -> &ExerciseSession {
        &self.session
    }

    pub fn verbs(&self) -> &[VerbEntry] {
        &self.verbs
    }

    /// Swap in a freshly loaded table. Takes effect from the next exercise.
    pub fn replace_verbs(&mut self, verbs: Vec<VerbEntry>) {
        debug!(count = verbs.len(), "vocabulary replaced");
        self.verbs = verbs;
    }

    pub fn narrator(&self) -> &Narrator<B> {
        &self.narrator
    }

    pub fn narrator_mut(&mut self) -> &mut Narrator<B> {
        &mut self.narrator
    }

    // -- user actions -------------------------------------------------------

    pub fn open(&mut self) -> Vec<DrillEffect> {
        self.dispatch(DrillEvent::Open)
    }

    pub fn select(&mut self, word: impl Into<String>) -> Vec<DrillEffect> {
        self.dispatch(DrillEvent::SelectOption(word.into()))
    }

    pub fn check(&mut self) -> Vec<DrillEffect> {
        self.dispatch(DrillEvent::Check)
    }

    pub fn continue_drill(&mut self) -> Vec<DrillEffect> {
        self.dispatch(DrillEvent::Continue)
    }

    pub fn close(&mut self) -> Vec<DrillEffect> {
        self.dispatch(DrillEvent::Close)
    }

    // -- delayed retry --------------------------------------------------------

    /// The retry waiting on the feedback delay, if any.
    pub fn pending_retry(&self) -> Option<(RetryTicket, Duration)> {
        self.pending_retry.map(|t| (t, self.config.feedback_delay()))
    }

    /// Call once the feedback delay has elapsed. Does nothing if the drill
    /// was closed or reopened in the meantime.
    pub fn resume_after_feedback(&mut self) -> Vec<DrillEffect> {
        match self.pending_retry.take() {
            Some(ticket) => self.dispatch(DrillEvent::RetryAfterFeedback(ticket)),
            None => Vec::new(),
        }
    }

    // -- speech ---------------------------------------------------------------

    /// Pronounce a word outside the drill flow (e.g. a vowel card tap).
    pub fn pronounce(&mut self, word: &str) -> Result<SpeechCompletion, SpeechError> {
        self.narrator.speak(word, &self.config.locale)
    }

    /// Completion of the most recent drill utterance, if not yet taken.
    pub fn take_utterance(&mut self) -> Option<SpeechCompletion> {
        self.last_utterance.take()
    }

    /// Forward the backend's end/error report for utterance `id`.
    pub fn speech_finished(&mut self, id: UtteranceId, result: Result<(), SpeechError>) -> Vec<DrillEffect> {
        self.narrator
            .finished(id, result)
            .map(|e| vec![DrillEffect::Warning(speech_warning(&e))])
            .unwrap_or_default()
    }

    // -- plumbing -------------------------------------------------------------

    pub fn dispatch(&mut self, event: DrillEvent) -> Vec<DrillEffect> {
        if matches!(event, DrillEvent::RetryAfterFeedback(_)) {
            self.pending_retry = None;
        }
        let effects = self.session.step(event, &self.verbs, &mut self.rng);

        let mut out = Vec::with_capacity(effects.len());
        for effect in effects {
            let mut warning = None;
            match &effect {
                DrillEffect::Speak(word) => match self.narrator.speak(word, &self.config.locale) {
                    Ok(done) => self.last_utterance = Some(done),
                    Err(e) => {
                        self.last_utterance = None;
                        warning = Some(DrillEffect::Warning(speech_warning(&e)));
                    }
                },
                DrillEffect::CancelSpeech => {
                    self.narrator.cancel();
                    self.last_utterance = None;
                    self.pending_retry = None;
                }
                DrillEffect::ScheduleRetry(ticket) => self.pending_retry = Some(*ticket),
                _ => {}
            }
            out.push(effect);
            out.extend(warning);
        }
        out
    }
}
