//! Core drill engine: word selection, trap words, session state, speech.
//!
//! ## Module overview
//!
//! | Module       | Purpose |
//! |--------------|---------|
//! | `models`     | Shared types: verbs, inflection slots, exercises, displayed options |
//! | `vocabulary` | Bundled verb table, fetched-list decoding, reference-list search |
//! | `trap`       | Phonetic trap generator: letter-level misspellings of a word |
//! | `selector`   | `select_exercise()`: one random verb form plus its trap |
//! | `session`    | The ten-round drill as a pure `(session, event) -> (session, effects)` machine |
//! | `narrator`   | Speech backend trait, last-request-wins playback, awaitable completion |
//! | `controller` | `PronunciationDrill`: one session wired to speech, RNG and vocabulary |
//! | `account`    | Sign-in against the spreadsheet user list, remembered logins |
//! | `config`     | `DrillConfig` and its defaults |
//! | `error`      | Error enums for the fallible edges |

pub mod account;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod narrator;
pub mod selector;
pub mod session;
pub mod trap;
pub mod vocabulary;

// Re-export the public API surface so callers can use
// `drill_engine::select_exercise` without reaching into sub-modules.
pub use account::{
    authenticate, restore_session, sign_in, sign_in_and_remember, sign_out, Account, MemoryStore,
    Role, SessionStore,
};
pub use config::DrillConfig;
pub use controller::PronunciationDrill;
pub use error::{AccountError, ConfigError, SpeechError, VocabularyError};
pub use models::{
    DisplayedOptions, Exercise, InflectionSlot, OptionSide, Regularity, VerbEntry,
};
pub use narrator::{
    Narrator, SpeechBackend, SpeechCompletion, SpeechOutcome, Utterance, UtteranceId, Voice,
    VoiceSettings,
};
pub use selector::select_exercise;
pub use session::{DrillEffect, DrillEvent, DrillPhase, ExerciseSession, RetryTicket, Transition};
pub use trap::generate_trap_word;
pub use vocabulary::{builtin_verbs, parse_verb_list, search, VerbQuery};
