use rand::Rng;

/// Default word lists: 20 adjectives by 20 nouns.
const ADJECTIVES: [&str; 20] = [
    "Anonymous",
    "Mysterious",
    "Silent",
    "Hidden",
    "Secret",
    "Shadow",
    "Phantom",
    "Ghost",
    "Mystic",
    "Unknown",
    "Nameless",
    "Void",
    "Ethereal",
    "Wandering",
    "Lost",
    "Forgotten",
    "Cryptic",
    "Enigmatic",
    "Veiled",
    "Shrouded",
];

const NOUNS: [&str; 20] = [
    "User",
    "Anon",
    "Entity",
    "Being",
    "Presence",
    "Spirit",
    "Wanderer",
    "Soul",
    "Specter",
    "Shadow",
    "Ghost",
    "Phantom",
    "Figure",
    "Form",
    "Stranger",
    "Observer",
    "Visitor",
    "Wraith",
    "Shade",
    "Silhouette",
];

/// Shorter 8x8 lists used by the offline board.
const COMPACT_ADJECTIVES: [&str; 8] = [
    "Based", "Comfy", "Doomed", "Elite", "Fren", "Gigachad", "Happy", "Iron",
];

const COMPACT_NOUNS: [&str; 8] = [
    "Anon", "Bear", "Chad", "Degen", "Expert", "Frog", "Guru", "Hero",
];

/// Immutable word-list configuration for a [`PseudonymGenerator`]. Injected
/// rather than global so callers can carry their own vocabulary.
#[derive(Debug, Clone)]
pub struct WordLists {
    adjectives: Vec<String>,
    nouns: Vec<String>,
}

impl WordLists {
    /// Both lists must be non-empty; index derivation divides by their
    /// lengths.
    pub fn new(adjectives: Vec<String>, nouns: Vec<String>) -> Self {
        assert!(
            !adjectives.is_empty() && !nouns.is_empty(),
            "word lists must be non-empty"
        );
        Self { adjectives, nouns }
    }

    pub fn compact() -> Self {
        Self::from_static(&COMPACT_ADJECTIVES, &COMPACT_NOUNS)
    }

    fn from_static(adjectives: &[&str], nouns: &[&str]) -> Self {
        Self::new(
            adjectives.iter().map(|word| word.to_string()).collect(),
            nouns.iter().map(|word| word.to_string()).collect(),
        )
    }
}

impl Default for WordLists {
    fn default() -> Self {
        Self::from_static(&ADJECTIVES, &NOUNS)
    }
}

/// Generates the display handles that stand in for identity everywhere in
/// the app.
///
/// Two flavors: [`random`](Self::random) is rolled fresh on every call and is
/// what read paths attach to fetched content — the same post shows a
/// different handle on every reload, by design. [`stable`](Self::stable) is a
/// pure function of a caller-supplied seed (an authenticated user id) and is
/// what a signed-in session displays as.
#[derive(Debug, Clone, Default)]
pub struct PseudonymGenerator {
    words: WordLists,
}

impl PseudonymGenerator {
    pub fn new(words: WordLists) -> Self {
        Self { words }
    }

    /// Fresh random handle: 70% `{adjective}{noun}#{n}`, 30% plain
    /// `Anonymous#{n}`, n in 1000..=9999.
    pub fn random(&self) -> String {
        self.random_with(&mut rand::rng())
    }

    pub fn random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let suffix: u32 = rng.random_range(1000..=9999);
        if rng.random_bool(0.7) {
            let adjective = &self.words.adjectives[rng.random_range(0..self.words.adjectives.len())];
            let noun = &self.words.nouns[rng.random_range(0..self.words.nouns.len())];
            format!("{}{}#{}", adjective, noun, suffix)
        } else {
            format!("Anonymous#{}", suffix)
        }
    }

    /// Deterministic handle for a seed. Same seed, same output, always.
    ///
    /// 30% of the hash space (hash % 100 < 30) collapses to `Anonymous#{n}`.
    pub fn stable(&self, seed: &str) -> String {
        let hash = seed_hash(seed);
        let suffix = hash % 9000 + 1000;
        if hash % 100 < 30 {
            return format!("Anonymous#{}", suffix);
        }
        let adjective = &self.words.adjectives[hash as usize % self.words.adjectives.len()];
        let noun = &self.words.nouns[(hash >> 8) as usize % self.words.nouns.len()];
        format!("{}{}#{}", adjective, noun, suffix)
    }
}

/// 32-bit rolling hash over the seed's UTF-16 code units:
/// `h = ((h << 5) - h) + unit`, wrapping at 32 bits, then folded to the
/// non-negative range. `unsigned_abs` makes the `i32::MIN` fold total
/// (it maps to 2^31) instead of panicking.
pub(crate) fn seed_hash(seed: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in seed.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(unit as i32);
    }
    hash.unsigned_abs()
}
