use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::drill_engine::{
    models::{Exercise, InflectionSlot, VerbEntry},
    trap::generate_trap_word,
};

/// Pair used when there is nothing to draw from.
pub const FALLBACK_CORRECT: &str = "dock";
pub const FALLBACK_INCORRECT: &str = "deck";

pub fn fallback_exercise() -> Exercise {
    Exercise {
        correct: FALLBACK_CORRECT.to_string(),
        incorrect: FALLBACK_INCORRECT.to_string(),
    }
}

/// Draw one round: a random verb, a random one of its four drilled forms,
/// and a trap word for it.
///
/// An empty table (or a blank form) yields the fixed `dock`/`deck` pair.
pub fn select_exercise<R: Rng + ?Sized>(verbs: &[VerbEntry], rng: &mut R) -> Exercise {
    let Some(verb) = verbs.choose(rng) else {
        debug!("empty vocabulary, using fallback exercise");
        return fallback_exercise();
    };
    let slot = InflectionSlot::ALL[rng.gen_range(0..InflectionSlot::ALL.len())];
    let correct = verb.form(slot).trim().to_lowercase();
    if correct.is_empty() {
        debug!(verb = %verb.base, %slot, "blank form, using fallback exercise");
        return fallback_exercise();
    }

    let incorrect = generate_trap_word(&correct, rng);
    debug!(verb = %verb.base, %slot, %correct, %incorrect, "selected exercise");
    Exercise { correct, incorrect }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drill_engine::models::Regularity;
    use crate::drill_engine::vocabulary::builtin_verbs;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn add_only() -> Vec<VerbEntry> {
        vec![VerbEntry {
            base: "add".into(),
            third_person: "adds".into(),
            past: "added".into(),
            past_participle: "added".into(),
            gerund: "adding".into(),
            gloss: "agregar".into(),
            regularity: Regularity::Regular,
        }]
    }

    #[test]
    fn empty_table_gives_fallback_pair() {
        let mut rng = StdRng::seed_from_u64(3);
        let ex = select_exercise(&[], &mut rng);
        assert_eq!(ex.correct, "dock");
        assert_eq!(ex.incorrect, "deck");
    }

    #[test]
    fn add_only_never_pairs_add_with_itself() {
        let verbs = add_only();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let ex = select_exercise(&verbs, &mut rng);
            assert!(!(ex.correct == "add" && ex.incorrect == "add"));
            assert!(["add", "adds", "added"].contains(&ex.correct.as_str()));
        }
    }

    #[test]
    fn correct_always_differs_from_incorrect() {
        let verbs = builtin_verbs();
        for seed in 0..500 {
            let mut rng = StdRng::seed_from_u64(seed);
            let ex = select_exercise(&verbs, &mut rng);
            assert_ne!(ex.correct, ex.incorrect, "seed={seed}");
            assert_eq!(ex.correct, ex.correct.to_lowercase());
        }
    }

    #[test]
    fn gerund_is_never_drilled() {
        let verbs = add_only();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            assert_ne!(select_exercise(&verbs, &mut rng).correct, "adding");
        }
    }

    #[test]
    fn every_slot_shows_up() {
        let mut verbs = add_only();
        verbs[0].past_participle = "addn".into();
        let mut rng = StdRng::seed_from_u64(8);
        let seen: std::collections::HashSet<String> =
            (0..200).map(|_| select_exercise(&verbs, &mut rng).correct).collect();
        for form in ["add", "adds", "added", "addn"] {
            assert!(seen.contains(form), "slot with '{form}' never drawn");
        }
    }

    #[test]
    fn forms_are_lowercased() {
        let mut verbs = add_only();
        verbs[0].base = "ADD".into();
        verbs[0].third_person = "ADD".into();
        verbs[0].past = "ADD".into();
        verbs[0].past_participle = "ADD".into();
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(select_exercise(&verbs, &mut rng).correct, "add");
    }
}
