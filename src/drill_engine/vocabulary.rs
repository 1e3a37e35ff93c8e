//! The verb reference table: bundled entries, fetched-list decoding, search.
//!
//! The bundled table is what the drill uses when nothing else is loaded. The
//! app may also fetch a larger list as JSON; fetching and caching happen
//! outside this crate, [`parse_verb_list`] only decodes and checks it.

use tracing::debug;

use crate::drill_engine::{
    error::VocabularyError,
    models::{Regularity, VerbEntry},
};

/// Compact row for the bundled table.
#[derive(Copy, Clone)]
struct BuiltinVerb {
    base: &'static str,
    third_person: &'static str,
    past: &'static str,
    past_participle: &'static str,
    gerund: &'static str,
    gloss: &'static str,
    regular: bool,
}

const fn verb(
    base: &'static str, third_person: &'static str, past: &'static str,
    past_participle: &'static str, gerund: &'static str, gloss: &'static str,
    regular: bool,
) -> BuiltinVerb {
    BuiltinVerb { base, third_person, past, past_participle, gerund, gloss, regular }
}

/// Bundled verbs, regular first, then irregular, each alphabetical.
const BUILTIN_VERBS: &[BuiltinVerb] = &[
    // regular
    verb("add",     "adds",     "added",     "added",     "adding",     "agregar",      true),
    verb("ask",     "asks",     "asked",     "asked",     "asking",     "preguntar",    true),
    verb("call",    "calls",    "called",    "called",    "calling",    "llamar",       true),
    verb("clean",   "cleans",   "cleaned",   "cleaned",   "cleaning",   "limpiar",      true),
    verb("cook",    "cooks",    "cooked",    "cooked",    "cooking",    "cocinar",      true),
    verb("dance",   "dances",   "danced",    "danced",    "dancing",    "bailar",       true),
    verb("help",    "helps",    "helped",    "helped",    "helping",    "ayudar",       true),
    verb("like",    "likes",    "liked",     "liked",     "liking",     "gustar",       true),
    verb("listen",  "listens",  "listened",  "listened",  "listening",  "escuchar",     true),
    verb("live",    "lives",    "lived",     "lived",     "living",     "vivir",        true),
    verb("look",    "looks",    "looked",    "looked",    "looking",    "mirar",        true),
    verb("open",    "opens",    "opened",    "opened",    "opening",    "abrir",        true),
    verb("play",    "plays",    "played",    "played",    "playing",    "jugar",        true),
    verb("study",   "studies",  "studied",   "studied",   "studying",   "estudiar",     true),
    verb("talk",    "talks",    "talked",    "talked",    "talking",    "hablar",       true),
    verb("try",     "tries",    "tried",     "tried",     "trying",     "intentar",     true),
    verb("use",     "uses",     "used",      "used",      "using",      "usar",         true),
    verb("walk",    "walks",    "walked",    "walked",    "walking",    "caminar",      true),
    verb("want",    "wants",    "wanted",    "wanted",    "wanting",    "querer",       true),
    verb("work",    "works",    "worked",    "worked",    "working",    "trabajar",     true),
    // irregular
    verb("be",      "is",       "was",       "been",      "being",      "ser / estar",  false),
    verb("begin",   "begins",   "began",     "begun",     "beginning",  "empezar",      false),
    verb("buy",     "buys",     "bought",    "bought",    "buying",     "comprar",      false),
    verb("come",    "comes",    "came",      "come",      "coming",     "venir",        false),
    verb("do",      "does",     "did",       "done",      "doing",      "hacer",        false),
    verb("drink",   "drinks",   "drank",     "drunk",     "drinking",   "beber",        false),
    verb("eat",     "eats",     "ate",       "eaten",     "eating",     "comer",        false),
    verb("find",    "finds",    "found",     "found",     "finding",    "encontrar",    false),
    verb("get",     "gets",     "got",       "gotten",    "getting",    "obtener",      false),
    verb("give",    "gives",    "gave",      "given",     "giving",     "dar",          false),
    verb("go",      "goes",     "went",      "gone",      "going",      "ir",           false),
    verb("have",    "has",      "had",       "had",       "having",     "tener",        false),
    verb("know",    "knows",    "knew",      "known",     "knowing",    "saber",        false),
    verb("make",    "makes",    "made",      "made",      "making",     "hacer",        false),
    verb("read",    "reads",    "read",      "read",      "reading",    "leer",         false),
    verb("run",     "runs",     "ran",       "run",       "running",    "correr",       false),
    verb("say",     "says",     "said",      "said",      "saying",     "decir",        false),
    verb("see",     "sees",     "saw",       "seen",      "seeing",     "ver",          false),
    verb("speak",   "speaks",   "spoke",     "spoken",    "speaking",   "hablar",       false),
    verb("take",    "takes",    "took",      "taken",     "taking",     "tomar",        false),
    verb("think",   "thinks",   "thought",   "thought",   "thinking",   "pensar",       false),
    verb("write",   "writes",   "wrote",     "written",   "writing",    "escribir",     false),
];

impl From<&BuiltinVerb> for VerbEntry {
    fn from(v: &BuiltinVerb) -> Self {
        VerbEntry {
            base: v.base.to_string(),
            third_person: v.third_person.to_string(),
            past: v.past.to_string(),
            past_participle: v.past_participle.to_string(),
            gerund: v.gerund.to_string(),
            gloss: v.gloss.to_string(),
            regularity: if v.regular { Regularity::Regular } else { Regularity::Irregular },
        }
    }
}

/// The bundled verb table.
pub fn builtin_verbs() -> Vec<VerbEntry> {
    BUILTIN_VERBS.iter().map(VerbEntry::from).collect()
}

/// Decode a fetched verb list (a JSON array of verb records).
///
/// Forms are trimmed. Any entry with an empty form is rejected, since an
/// empty word cannot be drilled.
pub fn parse_verb_list(json: &str) -> Result<Vec<VerbEntry>, VocabularyError> {
    let mut verbs: Vec<VerbEntry> = serde_json::from_str(json)?;
    for (index, v) in verbs.iter_mut().enumerate() {
        for (field, form) in [
            ("base", &mut v.base),
            ("third_person", &mut v.third_person),
            ("past", &mut v.past),
            ("past_participle", &mut v.past_participle),
            ("gerund", &mut v.gerund),
        ] {
            let trimmed = form.trim();
            if trimmed.is_empty() {
                return Err(VocabularyError::EmptyForm { index, field });
            }
            if trimmed.len() != form.len() {
                let owned = trimmed.to_string();
                *form = owned;
            }
        }
    }
    debug!(count = verbs.len(), "decoded verb list");
    Ok(verbs)
}

/// Filter for the reference list.
#[derive(Debug, Clone, Default)]
pub struct VerbQuery<'a> {
    /// Case-insensitive substring matched against every form and the gloss.
    /// Blank matches everything.
    pub text: &'a str,
    pub regularity: Option<Regularity>,
}

impl<'a> VerbQuery<'a> {
    pub fn text(text: &'a str) -> Self {
        VerbQuery { text, regularity: None }
    }

    pub fn matches(&self, verb: &VerbEntry) -> bool {
        if let Some(r) = self.regularity {
            if verb.regularity != r {
                return false;
            }
        }
        let needle = self.text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        verb.forms()
            .iter()
            .chain(std::iter::once(&verb.gloss.as_str()))
            .any(|f| f.to_lowercase().contains(&needle))
    }
}

/// Search the reference list, keeping table order.
pub fn search<'v>(verbs: &'v [VerbEntry], query: &VerbQuery<'_>) -> Vec<&'v VerbEntry> {
    verbs.iter().filter(|v| query.matches(v)).collect()
}
