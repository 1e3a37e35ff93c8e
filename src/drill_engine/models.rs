use std::fmt;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regularity {
    Regular,
    Irregular,
}

impl fmt::Display for Regularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regularity::Regular   => write!(f, "regular"),
            Regularity::Irregular => write!(f, "irregular"),
        }
    }
}

/// One English verb and its principal forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbEntry {
    #[serde(alias = "base_form", alias = "infinitive")]
    pub base: String,
    #[serde(alias = "third_person_singular")]
    pub third_person: String,
    #[serde(alias = "simple_past")]
    pub past: String,
    #[serde(alias = "participle")]
    pub past_participle: String,
    pub gerund: String,
    #[serde(alias = "meaning", alias = "translation")]
    pub gloss: String,
    #[serde(alias = "type")]
    pub regularity: Regularity,
}

impl VerbEntry {
    /// The form stored in `slot`.
    pub fn form(&self, slot: InflectionSlot) -> &str {
        match slot {
            InflectionSlot::Base           => &self.base,
            InflectionSlot::ThirdPerson    => &self.third_person,
            InflectionSlot::Past           => &self.past,
            InflectionSlot::PastParticiple => &self.past_participle,
        }
    }

    /// All five spelled forms, base first.
    pub fn forms(&self) -> [&str; 5] {
        [
            &self.base,
            &self.third_person,
            &self.past,
            &self.past_participle,
            &self.gerund,
        ]
    }
}

/// The four forms a pronunciation exercise may draw from. The gerund is
/// shown in the reference list but never drilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InflectionSlot {
    Base,
    ThirdPerson,
    Past,
    PastParticiple,
}

impl InflectionSlot {
    pub const ALL: [InflectionSlot; 4] = [
        InflectionSlot::Base,
        InflectionSlot::ThirdPerson,
        InflectionSlot::Past,
        InflectionSlot::PastParticiple,
    ];
}

impl fmt::Display for InflectionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InflectionSlot::Base           => "base form",
            InflectionSlot::ThirdPerson    => "third person singular",
            InflectionSlot::Past           => "simple past",
            InflectionSlot::PastParticiple => "past participle",
        };
        write!(f, "{}", s)
    }
}

// ---------------------------------------------------------------------------
// Exercises
// ---------------------------------------------------------------------------

/// One round's word pair. Both words are lowercase and never equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub correct: String,
    pub incorrect: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionSide {
    Left,
    Right,
}

impl OptionSide {
    pub fn other(self) -> Self {
        match self {
            OptionSide::Left  => OptionSide::Right,
            OptionSide::Right => OptionSide::Left,
        }
    }
}

/// The two words on screen for the active round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayedOptions {
    pub left: String,
    pub right: String,
    pub correct_side: OptionSide,
}

impl DisplayedOptions {
    /// Lay out `exercise` with its correct word on `correct_side`.
    pub fn place(exercise: &Exercise, correct_side: OptionSide) -> Self {
        let (left, right) = match correct_side {
            OptionSide::Left  => (exercise.correct.clone(), exercise.incorrect.clone()),
            OptionSide::Right => (exercise.incorrect.clone(), exercise.correct.clone()),
        };
        DisplayedOptions { left, right, correct_side }
    }

    pub fn word(&self, side: OptionSide) -> &str {
        match side {
            OptionSide::Left  => &self.left,
            OptionSide::Right => &self.right,
        }
    }

    pub fn correct_word(&self) -> &str {
        self.word(self.correct_side)
    }

    /// Which side shows `word`, if either.
    pub fn side_of(&self, word: &str) -> Option<OptionSide> {
        if self.left == word {
            Some(OptionSide::Left)
        } else if self.right == word {
            Some(OptionSide::Right)
        } else {
            None
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.side_of(word).is_some()
    }
}
