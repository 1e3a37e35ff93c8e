//! Full demo of the pronunciation drill.
//!
//! Run with: `cargo run --example demo`
//! (set `RUST_LOG=debug` to watch every transition)
//!
//! This example shows how `pronunciation_drill` works end to end:
//!
//! 1. **Trap words**: a few verb forms and the misspellings the generator
//!    offers for them.
//!
//! 2. **Reference list search**: filtering the bundled verb table.
//!
//! 3. **A complete drill**: ten rounds against a console "speech" backend
//!    with a fixed seed. The first round is answered wrong on purpose to show
//!    the feedback → retry path; the round counter does not move.

use pronunciation_drill::{
    builtin_verbs, generate_trap_word, search, DrillConfig, DrillEffect, DrillPhase,
    PronunciationDrill, SpeechBackend, SpeechError, Utterance, VerbQuery,
};
use rand::{rngs::StdRng, SeedableRng};

/// Prints instead of speaking.
struct ConsoleSpeech;

impl SpeechBackend for ConsoleSpeech {
    fn start(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
        println!("  🔊 \"{}\" ({})", utterance.text, utterance.locale);
        Ok(())
    }

    fn cancel(&mut self) {}
}

fn print_effects(effects: &[DrillEffect]) {
    for effect in effects {
        match effect {
            DrillEffect::ShowCorrect { round, total } => println!("  ✓ Correct! {round}/{total}"),
            DrillEffect::ShowIncorrect { correct } => println!("  ✗ Not quite, it was \"{correct}\""),
            DrillEffect::Completed { message } => println!("  🎉 {message}"),
            DrillEffect::Warning(w) => println!("  ⚠ {w}"),
            _ => {}
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    // ── Trap words ───────────────────────────────────────────────────────────
    println!();
    println!("══ Trap words (seed=7) ══");
    println!();
    let mut rng = StdRng::seed_from_u64(7);
    for word in ["dock", "call", "walked", "studied", "make", "try"] {
        println!("  {word:>8} → {}", generate_trap_word(word, &mut rng));
    }

    // ── Reference list search ──────────────────────────────────────────────
    println!();
    println!("══ Search: \"ought\" ══");
    println!();
    let verbs = builtin_verbs();
    for v in search(&verbs, &VerbQuery::text("ought")) {
        println!(
            "  {} / {} / {} / {} ({}, {})",
            v.base, v.past, v.past_participle, v.gerund, v.gloss, v.regularity
        );
    }

    // ── A complete drill ─────────────────────────────────────────────────────
    println!();
    println!("══ Pronunciation drill (seed=2024) ══");
    println!();
    let config = DrillConfig { rng_seed: Some(2024), ..DrillConfig::default() };
    let mut drill = PronunciationDrill::new(config, verbs, ConsoleSpeech);

    print_effects(&drill.open());
    let mut missed_once = false;
    while drill.session().phase() != DrillPhase::Complete {
        let options = drill.session().options().expect("drill is open").clone();
        println!(
            "  Round {}: [{}]  [{}]",
            drill.session().round_index() + 1,
            options.left,
            options.right
        );

        let pick = if missed_once {
            options.correct_word().to_string()
        } else {
            missed_once = true;
            options.word(options.correct_side.other()).to_string()
        };
        print_effects(&drill.select(pick));
        print_effects(&drill.check());

        match drill.session().phase() {
            DrillPhase::FeedbackIncorrect => {
                let (_, delay) = drill.pending_retry().expect("retry scheduled");
                println!("  … waiting {} ms", delay.as_millis());
                print_effects(&drill.resume_after_feedback());
            }
            DrillPhase::FeedbackCorrect => print_effects(&drill.continue_drill()),
            _ => {}
        }
    }
    print_effects(&drill.continue_drill());
    println!();
}
