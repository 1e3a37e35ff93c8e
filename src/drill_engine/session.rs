//! The pronunciation drill as a pure state machine.
//!
//! [`ExerciseSession::apply`] maps `(session, event)` to a new session plus a
//! list of [`DrillEffect`]s. Nothing here touches audio or rendering; the
//! controller (or any presentation layer) executes the effects.
//!
//! ```text
//! Idle ──Open──▶ AwaitingSelection ──SelectOption──▶ AwaitingCheck ──Check──┐
//!                     ▲    ▲                                                 │
//!                     │    └──RetryAfterFeedback── FeedbackIncorrect ◀─wrong─┤
//!                     └──────────Continue───────── FeedbackCorrect  ◀─right─┤
//!                                                  Complete ◀─right, last───┘
//! ```
//!
//! `Close` returns to `Idle` from anywhere. Events that do not apply to the
//! current phase are ignored.

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::drill_engine::{
    models::{DisplayedOptions, OptionSide, VerbEntry},
    selector::select_exercise,
};

pub const DEFAULT_TOTAL_ROUNDS: u32 = 10;
pub const DEFAULT_COMPLETION_MESSAGE: &str = "Great job! You finished the pronunciation drill.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrillPhase {
    /// Drill closed.
    Idle,
    /// Options shown, nothing picked.
    AwaitingSelection,
    /// One option picked, check enabled.
    AwaitingCheck,
    FeedbackCorrect,
    FeedbackIncorrect,
    Complete,
}

/// Permission to regenerate after wrong-answer feedback.
///
/// Issued with every wrong answer. `Open`, `Close` and every newer wrong
/// answer invalidate older tickets, so a delayed retry that fires after the
/// drill was closed does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryTicket {
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillEvent {
    Open,
    SelectOption(String),
    Check,
    Continue,
    RetryAfterFeedback(RetryTicket),
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillEffect {
    /// Pronounce a word, cancelling anything still speaking.
    Speak(String),
    CancelSpeech,
    ShowCorrect { round: u32, total: u32 },
    ShowIncorrect { correct: String },
    /// Call back with `RetryAfterFeedback(ticket)` once the feedback delay
    /// has elapsed.
    ScheduleRetry(RetryTicket),
    Completed { message: String },
    Closed,
    /// Non-fatal problem for the user to see (speech failures).
    Warning(String),
}

/// Result of one transition.
#[derive(Debug, Clone)]
pub struct Transition {
    pub session: ExerciseSession,
    pub effects: Vec<DrillEffect>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseSession {
    phase: DrillPhase,
    options: Option<DisplayedOptions>,
    selected: Option<String>,
    /// Rounds answered correctly so far.
    round_index: u32,
    #[serde(deserialize_with = "at_least_one")]
    total_rounds: u32,
    generation: u64,
    completion_message: String,
}

/// Snapshots go through the same clamp as [`ExerciseSession::new`].
fn at_least_one<'de, D: Deserializer<'de>>(de: D) -> Result<u32, D::Error> {
    Ok(u32::deserialize(de)?.max(1))
}

impl Default for ExerciseSession {
    fn default() -> Self {
        Self::new(DEFAULT_TOTAL_ROUNDS)
    }
}

impl ExerciseSession {
    /// A closed drill of `total_rounds` rounds (at least one).
    pub fn new(total_rounds: u32) -> Self {
        ExerciseSession {
            phase: DrillPhase::Idle,
            options: None,
            selected: None,
            round_index: 0,
            total_rounds: total_rounds.max(1),
            generation: 0,
            completion_message: DEFAULT_COMPLETION_MESSAGE.to_string(),
        }
    }

    pub fn with_completion_message(mut self, message: impl Into<String>) -> Self {
        self.completion_message = message.into();
        self
    }

    // -- observable state ---------------------------------------------------

    pub fn phase(&self) -> DrillPhase {
        self.phase
    }

    pub fn options(&self) -> Option<&DisplayedOptions> {
        self.options.as_ref()
    }

    pub fn current_correct_word(&self) -> Option<&str> {
        self.options.as_ref().map(|o| o.correct_word())
    }

    pub fn selected_option(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn round_index(&self) -> u32 {
        self.round_index
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn is_complete(&self) -> bool {
        self.phase == DrillPhase::Complete
    }

    pub fn is_open(&self) -> bool {
        self.phase != DrillPhase::Idle
    }

    /// Fraction of rounds done, for a progress bar.
    pub fn progress(&self) -> f32 {
        self.round_index as f32 / self.total_rounds as f32
    }

    // -- transitions ----------------------------------------------------------

    /// Pure transition: `self` is left untouched.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        event: DrillEvent,
        verbs: &[VerbEntry],
        rng: &mut R,
    ) -> Transition {
        let mut session = self.clone();
        let effects = session.step(event, verbs, rng);
        Transition { session, effects }
    }

    /// In-place form of [`apply`](Self::apply).
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        event: DrillEvent,
        verbs: &[VerbEntry],
        rng: &mut R,
    ) -> Vec<DrillEffect> {
        let mut effects = Vec::new();
        match event {
            DrillEvent::Open => self.open(verbs, rng, &mut effects),
            DrillEvent::SelectOption(word) => self.select(word, &mut effects),
            DrillEvent::Check => self.check(&mut effects),
            DrillEvent::Continue => self.continue_drill(verbs, rng, &mut effects),
            DrillEvent::RetryAfterFeedback(ticket) => self.retry(ticket, verbs, rng, &mut effects),
            DrillEvent::Close => self.close(&mut effects),
        }
        effects
    }

    fn open<R: Rng + ?Sized>(&mut self, verbs: &[VerbEntry], rng: &mut R, effects: &mut Vec<DrillEffect>) {
        self.reset();
        info!(total_rounds = self.total_rounds, "pronunciation drill opened");
        self.next_round(verbs, rng, effects);
    }

    fn select(&mut self, word: String, effects: &mut Vec<DrillEffect>) {
        if self.phase != DrillPhase::AwaitingSelection {
            debug!(phase = ?self.phase, "selection ignored");
            return;
        }
        let shown = self.options.as_ref().is_some_and(|o| o.contains(&word));
        if !shown {
            debug!(%word, "selection ignored, word is not on screen");
            return;
        }
        effects.push(DrillEffect::Speak(word.clone()));
        self.selected = Some(word);
        self.phase = DrillPhase::AwaitingCheck;
    }

    fn check(&mut self, effects: &mut Vec<DrillEffect>) {
        if self.phase != DrillPhase::AwaitingCheck {
            debug!(phase = ?self.phase, "check ignored");
            return;
        }
        let (Some(selected), Some(correct)) = (self.selected.as_deref(), self.current_correct_word())
        else {
            return;
        };

        if selected == correct {
            self.round_index += 1;
            if self.round_index >= self.total_rounds {
                self.phase = DrillPhase::Complete;
                info!(rounds = self.round_index, "pronunciation drill complete");
                effects.push(DrillEffect::Completed { message: self.completion_message.clone() });
            } else {
                self.phase = DrillPhase::FeedbackCorrect;
                effects.push(DrillEffect::ShowCorrect {
                    round: self.round_index,
                    total: self.total_rounds,
                });
            }
        } else {
            let correct = correct.to_string();
            debug!(%selected, %correct, round = self.round_index, "wrong answer");
            self.phase = DrillPhase::FeedbackIncorrect;
            self.generation += 1;
            effects.push(DrillEffect::ShowIncorrect { correct });
            effects.push(DrillEffect::ScheduleRetry(RetryTicket { generation: self.generation }));
        }
    }

    fn continue_drill<R: Rng + ?Sized>(
        &mut self,
        verbs: &[VerbEntry],
        rng: &mut R,
        effects: &mut Vec<DrillEffect>,
    ) {
        match self.phase {
            DrillPhase::FeedbackCorrect => self.next_round(verbs, rng, effects),
            DrillPhase::Complete => self.close(effects),
            phase => debug!(?phase, "continue ignored"),
        }
    }

    /// A wrong answer does not use up the round: a fresh exercise is drawn
    /// for the same round index.
    fn retry<R: Rng + ?Sized>(
        &mut self,
        ticket: RetryTicket,
        verbs: &[VerbEntry],
        rng: &mut R,
        effects: &mut Vec<DrillEffect>,
    ) {
        if self.phase != DrillPhase::FeedbackIncorrect || ticket.generation != self.generation {
            debug!(phase = ?self.phase, "stale retry ticket dropped");
            return;
        }
        self.next_round(verbs, rng, effects);
    }

    fn close(&mut self, effects: &mut Vec<DrillEffect>) {
        let was_open = self.is_open();
        self.reset();
        self.phase = DrillPhase::Idle;
        if was_open {
            info!("pronunciation drill closed");
        }
        effects.push(DrillEffect::CancelSpeech);
        effects.push(DrillEffect::Closed);
    }

    fn reset(&mut self) {
        self.options = None;
        self.selected = None;
        self.round_index = 0;
        self.generation += 1;
    }

    /// Draw an exercise, put its correct word on a random side, and speak it.
    fn next_round<R: Rng + ?Sized>(&mut self, verbs: &[VerbEntry], rng: &mut R, effects: &mut Vec<DrillEffect>) {
        let exercise = select_exercise(verbs, rng);
        let side = if rng.gen_bool(0.5) { OptionSide::Left } else { OptionSide::Right };
        let options = DisplayedOptions::place(&exercise, side);

        effects.push(DrillEffect::Speak(exercise.correct));
        self.options = Some(options);
        self.selected = None;
        self.phase = DrillPhase::AwaitingSelection;
    }
}
