//! Phonetic trap words: the wrong option in a listening round.
//!
//! A trap must look like a misspelling a learner could mistake for the spoken
//! word, so every mutation here works on letters, never on meaning. The
//! generator builds a pool from seven independent mutations, drops the input
//! itself and anything shorter than two characters, then picks uniformly.
//!
//! ## Mutations
//!
//! | # | Mutation | Example |
//! |---|----------|---------|
//! | 1 | Double an interior consonant | `walk` → `wallk` |
//! | 2 | Swap a confusable consonant (d/t, p/b, f/v, s/z, k/c, ck/k) | `dock` → `tock` |
//! | 3 | Swap a confusable vowel (a→e, e→a/i, i→e/y, o→u, u→o, ou/ow) | `dock` → `duck` |
//! | 4 | Toggle a silent final `e` | `make` → `mak`, `call` → `calle` |
//! | 5 | Duplicate the final letter | `call` → `calll` |
//! | 6 | Swap `y` and `i` | `try` → `tri` |
//! | 7 | Swap `ck` and `k` | `ask` → `asck` |
//!
//! The pool is a `BTreeSet`, so for a given seed the pick is reproducible.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Shortest trap the generator will offer.
pub const MIN_TRAP_LEN: usize = 2;

/// Symmetric consonant confusions; each pair is applied both ways.
const CONFUSABLE_CONSONANTS: &[(&str, &str)] = &[
    ("d", "t"),
    ("p", "b"),
    ("f", "v"),
    ("s", "z"),
    ("k", "c"),
    ("ck", "k"),
];

/// Vowel confusions. Not symmetric: `a` only becomes `e`, but `e` may
/// become `a` or `i`.
const CONFUSABLE_VOWELS: &[(&str, &[&str])] = &[
    ("a",  &["e"]),
    ("e",  &["a", "i"]),
    ("i",  &["e", "y"]),
    ("o",  &["u"]),
    ("u",  &["o"]),
    ("ou", &["ow"]),
    ("ow", &["ou"]),
];

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn is_consonant(c: char) -> bool {
    c.is_alphabetic() && !is_vowel(c)
}

/// Replace `len` bytes at byte offset `at` with `with`.
fn splice(word: &str, at: usize, len: usize, with: &str) -> String {
    let mut out = String::with_capacity(word.len() + with.len());
    out.push_str(&word[..at]);
    out.push_str(with);
    out.push_str(&word[at + len..]);
    out
}

/// 1. `walk` → `wallk`. Only letters that differ from both neighbours, so a
///    double letter never turns into a triple.
fn double_interior_consonants(chars: &[char], pool: &mut BTreeSet<String>) {
    if chars.len() < 3 {
        return;
    }
    for i in 1..chars.len() - 1 {
        let c = chars[i];
        if is_consonant(c) && c != chars[i - 1] && c != chars[i + 1] {
            let mut out: String = chars[..=i].iter().collect();
            out.extend(&chars[i..]);
            pool.insert(out);
        }
    }
}

/// 2. One candidate per occurrence of each mapped consonant.
fn swap_consonants(word: &str, pool: &mut BTreeSet<String>) {
    for &(a, b) in CONFUSABLE_CONSONANTS {
        for (from, to) in [(a, b), (b, a)] {
            for (at, _) in word.match_indices(from) {
                pool.insert(splice(word, at, from.len(), to));
            }
        }
    }
}

/// 3. One candidate per vowel occurrence, replacement picked at random.
fn swap_vowels<R: Rng + ?Sized>(word: &str, rng: &mut R, pool: &mut BTreeSet<String>) {
    for &(from, replacements) in CONFUSABLE_VOWELS {
        for (at, _) in word.match_indices(from) {
            if let Some(to) = replacements.choose(rng) {
                pool.insert(splice(word, at, from.len(), to));
            }
        }
    }
}

/// 4. Drop a final `e`, or add one to a word longer than three letters.
fn toggle_silent_e(word: &str, char_len: usize, pool: &mut BTreeSet<String>) {
    if let Some(stripped) = word.strip_suffix('e') {
        pool.insert(stripped.to_string());
    } else if char_len > 3 {
        pool.insert(format!("{word}e"));
    }
}

/// 5. `call` → `calll`.
fn duplicate_final_letter(word: &str, char_len: usize, pool: &mut BTreeSet<String>) {
    if char_len <= 2 {
        return;
    }
    if let Some(last) = word.chars().last() {
        pool.insert(format!("{word}{last}"));
    }
}

/// 6. All `y` become `i`; failing that, every `i` not followed by a vowel
///    becomes `y` (words longer than three letters only).
fn swap_y_and_i(word: &str, chars: &[char], pool: &mut BTreeSet<String>) {
    let out = if word.contains('y') {
        word.replace('y', "i")
    } else if chars.len() > 3 {
        chars
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let before_vowel = chars.get(i + 1).is_some_and(|&n| is_vowel(n));
                if c == 'i' && !before_vowel { 'y' } else { c }
            })
            .collect()
    } else {
        return;
    };
    if out != word {
        pool.insert(out);
    }
}

/// 7. All `ck` become `k`; failing that, every `k` not followed by
///    `e`, `i` or `a` becomes `ck`.
fn swap_ck_and_k(word: &str, chars: &[char], pool: &mut BTreeSet<String>) {
    let out = if word.contains("ck") {
        word.replace("ck", "k")
    } else {
        let mut out = String::with_capacity(word.len() + 2);
        for (i, &c) in chars.iter().enumerate() {
            let soft_follow = matches!(chars.get(i + 1), Some('e' | 'i' | 'a'));
            if c == 'k' && !soft_follow {
                out.push('c');
            }
            out.push(c);
        }
        out
    };
    if out != word {
        pool.insert(out);
    }
}

/// Every mutation of `word`, before filtering.
///
/// Vowel swaps draw from `rng`, so the pool itself is seed-dependent.
pub fn trap_candidates<R: Rng + ?Sized>(word: &str, rng: &mut R) -> BTreeSet<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut pool = BTreeSet::new();

    double_interior_consonants(&chars, &mut pool);
    swap_consonants(word, &mut pool);
    swap_vowels(word, rng, &mut pool);
    toggle_silent_e(word, chars.len(), &mut pool);
    duplicate_final_letter(word, chars.len(), &mut pool);
    swap_y_and_i(word, &chars, &mut pool);
    swap_ck_and_k(word, &chars, &mut pool);

    pool
}

/// Last resort when no mutation qualifies: `a` → `aa`.
///
/// An empty word has no last letter and comes back empty; callers never
/// drill an empty form.
pub fn fallback_trap(word: &str) -> String {
    let mut out = word.to_string();
    if let Some(last) = word.chars().last() {
        out.push(last);
    }
    out
}

/// Pick a distractor for `word` (expected lowercase).
///
/// For any non-empty input the result differs from `word` and is at least
/// [`MIN_TRAP_LEN`] characters long.
pub fn generate_trap_word<R: Rng + ?Sized>(word: &str, rng: &mut R) -> String {
    let pool = trap_candidates(word, rng);
    let eligible: Vec<&String> = pool
        .iter()
        .filter(|c| c.as_str() != word && c.chars().count() >= MIN_TRAP_LEN)
        .collect();

    match eligible.choose(rng) {
        Some(trap) => (*trap).clone(),
        None => {
            debug!(word, "no trap candidate qualified, duplicating last letter");
            fallback_trap(word)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool(word: &str) -> BTreeSet<String> {
        let mut rng = StdRng::seed_from_u64(7);
        trap_candidates(word, &mut rng)
    }

    #[test]
    fn call_never_traps_itself() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let trap = generate_trap_word("call", &mut rng);
            assert_ne!(trap, "call", "seed={seed}");
            assert!(trap.chars().count() >= MIN_TRAP_LEN);
        }
    }

    #[test]
    fn dock_hundred_times_never_dock() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            assert_ne!(generate_trap_word("dock", &mut rng), "dock");
        }
    }

    #[test]
    fn dock_pool_covers_every_mutation_family() {
        let p = pool("dock");
        for expected in ["docck", "tock", "duck", "docke", "dockk", "dok"] {
            assert!(p.contains(expected), "missing {expected} in {p:?}");
        }
    }

    #[test]
    fn double_letters_are_not_tripled() {
        let chars: Vec<char> = "call".chars().collect();
        let mut p = BTreeSet::new();
        double_interior_consonants(&chars, &mut p);
        assert!(p.is_empty(), "{p:?}");
        assert!(pool("call").contains("calll"));
    }

    #[test]
    fn silent_e_is_dropped_or_added() {
        assert!(pool("make").contains("mak"));
        assert!(pool("walk").contains("walke"));
        // Three letters or fewer never gain an `e`.
        assert!(!pool("add").contains("adde"));
    }

    #[test]
    fn y_and_i_swap() {
        assert!(pool("try").contains("tri"));
        assert!(pool("bike").contains("byke"));

        // `i` before a vowel stays put.
        let chars: Vec<char> = "riot".chars().collect();
        let mut p = BTreeSet::new();
        swap_y_and_i("riot", &chars, &mut p);
        assert!(p.is_empty(), "{p:?}");
    }

    #[test]
    fn k_gains_a_c_unless_softened() {
        assert!(pool("ask").contains("asck"));

        let chars: Vec<char> = "make".chars().collect();
        let mut p = BTreeSet::new();
        swap_ck_and_k("make", &chars, &mut p);
        assert!(p.is_empty(), "{p:?}");
    }

    #[test]
    fn ou_and_ow_swap() {
        assert!(pool("house").contains("howse"));
        assert!(pool("grow").contains("grou"));
    }

    #[test]
    fn consonant_swaps_run_both_ways() {
        let p = pool("bet");
        assert!(p.contains("pet"));
        assert!(p.contains("bed"));
    }

    #[test]
    fn single_letter_falls_back_to_doubling() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(generate_trap_word("a", &mut rng), "aa");
        assert_eq!(generate_trap_word("e", &mut rng), "ee");
    }

    #[test]
    fn fallback_on_empty_is_empty() {
        assert_eq!(fallback_trap(""), "");
    }

    #[test]
    fn same_seed_same_trap() {
        let make = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            generate_trap_word("studied", &mut rng)
        };
        assert_eq!(make(99), make(99));
    }
}
