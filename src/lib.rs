//! # pronunciation_drill
//!
//! The listening drill behind an English-for-Spanish-speakers learning app.
//!
//! Each round the learner hears one English verb form and picks it from two
//! written options: the real word and a *trap*, a plausible misspelling such
//! as `walked` / `wallked` or `dock` / `duck`. Ten correct answers finish the
//! drill; a wrong answer shows feedback and then deals a fresh pair for the
//! same round.
//!
//! ## How it works
//!
//! 1. [`select_exercise`] picks a random verb and one of its four drilled
//!    forms (base, third person, past, past participle), then asks
//!    [`generate_trap_word`] for a distractor.
//! 2. [`ExerciseSession`] is a pure state machine: feed it a [`DrillEvent`],
//!    get back the next session and a list of [`DrillEffect`]s (speak a word,
//!    show feedback, schedule a retry).
//! 3. [`PronunciationDrill`] owns one session together with a [`Narrator`]
//!    (speech), the RNG and the verb table, and executes the effects.
//!
//! ## Key features
//!
//! - **Deterministic**: set `rng_seed: Some(u64)` in [`DrillConfig`] (or pass
//!   any seeded `Rng` to the free functions) to reproduce a drill exactly.
//! - **No rendering dependencies**: the engine never touches a UI; the
//!   presentation layer renders from [`ExerciseSession`]'s getters.
//! - **Last request wins**: starting an utterance cancels the one in flight;
//!   every utterance yields an awaitable [`SpeechCompletion`].
//!
//! ## Quick start
//!
//! ```rust
//! use pronunciation_drill::{
//!     builtin_verbs, generate_trap_word, select_exercise, DrillEvent, DrillPhase,
//!     ExerciseSession,
//! };
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let trap = generate_trap_word("dock", &mut rng);
//! assert_ne!(trap, "dock");
//!
//! let verbs = builtin_verbs();
//! let exercise = select_exercise(&verbs, &mut rng);
//! assert_ne!(exercise.correct, exercise.incorrect);
//!
//! let opened = ExerciseSession::default().apply(DrillEvent::Open, &verbs, &mut rng);
//! assert_eq!(opened.session.phase(), DrillPhase::AwaitingSelection);
//! ```

pub mod drill_engine;

// Convenience re-exports so callers can use `pronunciation_drill::select_exercise`
// directly without reaching into `drill_engine::`.
pub use drill_engine::{
    builtin_verbs, generate_trap_word, parse_verb_list, restore_session, search, select_exercise,
    sign_in, sign_in_and_remember, sign_out, Account, DisplayedOptions, DrillConfig, DrillEffect,
    DrillEvent, DrillPhase, Exercise, ExerciseSession, InflectionSlot, MemoryStore, Narrator,
    OptionSide, PronunciationDrill, Regularity, RetryTicket, Role, SessionStore, SpeechBackend,
    SpeechCompletion, SpeechError, SpeechOutcome, Utterance, UtteranceId, VerbEntry, VerbQuery,
    Voice, VoiceSettings,
};
