//! Bundled feature inventory.
//!
//! A static table covering the consonants and core vowels of broad
//! Spanish/English clinical transcription. Each entry pairs a base symbol
//! with a compact 22-character feature encoding (`+`/`-`/`0` in canonical
//! feature order); diacritic marks are applied on top of the base vector
//! at lookup time.
//!
//! The inventory is deliberately coarse. In particular the trill `r` and
//! the tap `ɾ` carry identical vectors, so their distance is zero despite
//! the distinct symbols; downstream, that is exactly the situation the
//! `sub[CHECK]` outcome flags for manual review.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock, RwLock};

use rustc_hash::FxHashMap;

use crate::diacritics;
use crate::features::{FeatureService, FeatureVector, Ternary, FEATURE_COUNT};

/// Base inventory: (symbol, feature encoding).
///
/// `g` is an alias for `ɡ` (U+0261), and the affricate ligatures `ʧ`/`ʤ`
/// alias the two-character `tʃ`/`dʒ`.
const INVENTORY: &[(&str, &str)] = &[
    // stops
    ("p", "--+--------+--+-----0-"),
    ("b", "--+-----+--+--+-----0-"),
    ("t", "--+--------++-------0-"),
    ("d", "--+-----+--++-------0-"),
    ("k", "--+------------+-+--0-"),
    ("ɡ", "--+-----+------+-+--0-"),
    ("g", "--+-----+------+-+--0-"),
    // nasals
    ("m", "-++---+-+--+--+-----0-"),
    ("n", "-++---+-+--++-------0-"),
    ("ɲ", "-++---+-+---++-+----0-"),
    ("ŋ", "-++---+-+------+-+--0-"),
    // fricatives
    ("f", "--++---+---+--+-----0-"),
    ("v", "--++---++--+--+-----0-"),
    ("θ", "--++-------+++------0-"),
    ("ð", "--++----+--+++------0-"),
    ("s", "--++---+---++-------0-"),
    ("z", "--++---++--++-------0-"),
    ("ʃ", "--++---+----++-+----0-"),
    ("ʒ", "--++---++---++-+----0-"),
    ("x", "--++-----------+-+--0-"),
    ("ɣ", "--++----+------+-+--0-"),
    ("h", "---+-----+----------0-"),
    ("β", "--++----+--+--+-----0-"),
    ("ɸ", "--++-------+--+-----0-"),
    // affricates
    ("tʃ", "--+-+--+----++-+----0-"),
    ("dʒ", "--+-+--++---++-+----0-"),
    ("ʧ", "--+-+--+----++-+----0-"),
    ("ʤ", "--+-+--++---++-+----0-"),
    // liquids
    ("l", "-+++-+--+--++-------0-"),
    ("ʎ", "-+++-+--+---++-+----0-"),
    ("r", "-+++----+--++-------0-"),
    ("ɾ", "-+++----+--++-------0-"),
    ("ɹ", "-+-+----+---+-------0-"),
    // glides
    ("j", "-+-+----+------+----+-"),
    ("w", "-+-+----+-----++-++-+-"),
    ("ʝ", "--++----+---++-+----0-"),
    // vowels
    ("a", "++-+----+-------+---+-"),
    ("e", "++-+----+-----------+-"),
    ("i", "++-+----+------+----+-"),
    ("o", "++-+----+-----+--++-+-"),
    ("u", "++-+----+-----++-++-+-"),
    ("ə", "++-+----+-------------"),
    ("ɪ", "++-+----+------+------"),
    ("ʊ", "++-+----+-----++-++---"),
    ("ɛ", "++-+----+-------------"),
    ("ɔ", "++-+----+-----+--++---"),
    ("æ", "++-+----+-------+---+-"),
    ("ʌ", "++-+----+--------+----"),
];

fn decode(encoding: &str) -> FeatureVector {
    let mut values = [Ternary::Unspecified; FEATURE_COUNT];
    for (slot, c) in values.iter_mut().zip(encoding.chars()) {
        if let Some(value) = Ternary::from_symbol(c) {
            *slot = value;
        }
    }
    FeatureVector::new(values)
}

fn inventory() -> &'static FxHashMap<&'static str, FeatureVector> {
    static TABLE: OnceLock<FxHashMap<&'static str, FeatureVector>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut map = FxHashMap::default();
        for &(symbol, encoding) in INVENTORY {
            map.insert(symbol, decode(encoding));
        }
        map
    })
}

/// Longest base match at the front of `chars`, two-character entries
/// (affricates) before single characters. Returns the matched symbol and
/// its character length.
fn match_base(chars: &[char]) -> Option<(String, usize)> {
    if chars.len() >= 2 {
        let pair: String = chars[..2].iter().collect();
        if inventory().contains_key(pair.as_str()) {
            return Some((pair, 2));
        }
    }
    let single: String = chars[..1].iter().collect();
    if inventory().contains_key(single.as_str()) {
        return Some((single, 1));
    }
    None
}

/// Applies one diacritic mark's feature effect, if it has one. Marks the
/// table does not interpret attach to the symbol but leave the vector
/// unchanged.
fn apply_mark(vector: &mut FeatureVector, mark: char) {
    match mark {
        '\u{02B0}' => {
            // ʰ aspiration
            vector.set("sg", Ternary::Plus);
        }
        '\u{0325}' => {
            // combining ring: devoicing
            vector.set("voi", Ternary::Minus);
        }
        '\u{0329}' => {
            // combining vertical line: syllabic
            vector.set("syl", Ternary::Plus);
        }
        '\u{02D0}' | ':' => {
            // length mark (IPA triangular colon or dataset ASCII colon)
            vector.set("long", Ternary::Plus);
        }
        '\u{0303}' => {
            // combining tilde: nasalization
            vector.set("nas", Ternary::Plus);
        }
        '\u{02B2}' => {
            // ʲ palatalization
            vector.set("hi", Ternary::Plus);
        }
        '\u{02B7}' => {
            // ʷ labialization
            vector.set("round", Ternary::Plus);
            vector.set("lab", Ternary::Plus);
        }
        '\u{032A}' => {
            // combining bridge: dental
            vector.set("distr", Ternary::Plus);
        }
        _ => {}
    }
}

// ============================================================================
// Memoization
// ============================================================================

/// Order-normalized pair of segment symbols, so `(a, b)` and `(b, a)` hit
/// the same cache entry.
#[derive(Clone, Debug)]
struct SymmetricPair {
    first: Arc<str>,
    second: Arc<str>,
}

impl SymmetricPair {
    #[inline(always)]
    fn new(a: &str, b: &str) -> Self {
        match a.cmp(b) {
            Ordering::Less | Ordering::Equal => Self {
                first: Arc::from(a),
                second: Arc::from(b),
            },
            Ordering::Greater => Self {
                first: Arc::from(b),
                second: Arc::from(a),
            },
        }
    }
}

impl PartialEq for SymmetricPair {
    fn eq(&self, other: &Self) -> bool {
        self.first == other.first && self.second == other.second
    }
}

impl Eq for SymmetricPair {}

impl Hash for SymmetricPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.first.hash(state);
        self.second.hash(state);
    }
}

// ============================================================================
// FeatureTable
// ============================================================================

/// The bundled [`FeatureService`] implementation.
///
/// Cheap to construct; the inventory itself is a process-wide static. Each
/// table instance carries its own distance memo, shared across threads via
/// an `RwLock`.
///
/// # Example
///
/// ```rust
/// use phonopatterns::features::{FeatureService, FeatureTable};
///
/// let table = FeatureTable::new();
/// assert_eq!(table.segments("tʃa"), vec!["tʃ", "a"]);
/// assert_eq!(table.distance("b", "p"), 1.0);
/// assert_eq!(table.distance("r", "ɾ"), 0.0);
/// ```
#[derive(Debug, Default)]
pub struct FeatureTable {
    memo: RwLock<FxHashMap<SymmetricPair, f64>>,
}

impl FeatureTable {
    /// Creates a table with an empty distance memo.
    pub fn new() -> Self {
        FeatureTable {
            memo: RwLock::new(FxHashMap::default()),
        }
    }

    /// Whether the inventory knows `symbol` as a base (diacritics excluded).
    pub fn contains_base(&self, symbol: &str) -> bool {
        inventory().contains_key(symbol)
    }

    /// Base symbols in the inventory, unordered.
    pub fn base_symbols(&self) -> Vec<&'static str> {
        inventory().keys().copied().collect()
    }

    fn analyze(&self, symbol: &str) -> Option<FeatureVector> {
        let chars: Vec<char> = symbol.chars().collect();
        if chars.is_empty() {
            return None;
        }
        let (base, consumed) = match_base(&chars)?;
        let mut vector = *inventory().get(base.as_str())?;
        for &mark in &chars[consumed..] {
            if !diacritics::is_diacritic(mark) {
                return None;
            }
            apply_mark(&mut vector, mark);
        }
        Some(vector)
    }

    #[cfg(test)]
    fn memo_len(&self) -> usize {
        self.memo.read().unwrap().len()
    }
}

impl FeatureService for FeatureTable {
    fn segments(&self, word: &str) -> Vec<String> {
        let chars: Vec<char> = word.chars().collect();
        let mut out = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let Some((mut symbol, consumed)) = match_base(&chars[i..]) else {
                // unknown character: skip, never fail
                i += 1;
                continue;
            };
            i += consumed;
            while i < chars.len() && diacritics::is_diacritic(chars[i]) {
                symbol.push(chars[i]);
                i += 1;
            }
            out.push(symbol);
        }
        out
    }

    fn vector(&self, segment: &str) -> Option<FeatureVector> {
        self.analyze(segment)
    }

    fn distance(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 0.0;
        }
        let key = SymmetricPair::new(a, b);
        if let Some(cached) = self.memo.read().unwrap().get(&key) {
            return *cached;
        }
        let computed = match (self.analyze(a), self.analyze(b)) {
            (Some(x), Some(y)) => f64::from(x.distance(&y)),
            _ => FEATURE_COUNT as f64,
        };
        self.memo.write().unwrap().insert(key, computed);
        computed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_plain_cluster() {
        let table = FeatureTable::new();
        assert_eq!(table.segments("bj"), vec!["b", "j"]);
        assert_eq!(table.segments("str"), vec!["s", "t", "r"]);
    }

    #[test]
    fn test_segments_affricate_longest_match() {
        let table = FeatureTable::new();
        assert_eq!(table.segments("tʃa"), vec!["tʃ", "a"]);
        assert_eq!(table.segments("adʒ"), vec!["a", "dʒ"]);
    }

    #[test]
    fn test_segments_absorb_diacritics() {
        let table = FeatureTable::new();
        assert_eq!(table.segments("pʰa"), vec!["pʰ", "a"]);
        assert_eq!(table.segments("l̩"), vec!["l̩"]);
    }

    #[test]
    fn test_segments_skip_unknown_characters() {
        let table = FeatureTable::new();
        assert_eq!(table.segments("b?j"), vec!["b", "j"]);
        assert!(table.segments("123").is_empty());
        assert!(table.segments("").is_empty());
    }

    #[test]
    fn test_vector_applies_marks() {
        let table = FeatureTable::new();
        let plain = table.vector("p").unwrap();
        let aspirated = table.vector("pʰ").unwrap();
        assert_eq!(plain.get("sg"), Some(Ternary::Minus));
        assert_eq!(aspirated.get("sg"), Some(Ternary::Plus));
        assert_eq!(plain.distance(&aspirated), 1);

        let syllabic = table.vector("l̩").unwrap();
        assert!(syllabic.is_syllabic());
    }

    #[test]
    fn test_vector_unknown_symbol() {
        let table = FeatureTable::new();
        assert!(table.vector("?").is_none());
        assert!(table.vector("").is_none());
    }

    #[test]
    fn test_alias_vectors_match() {
        let table = FeatureTable::new();
        assert_eq!(table.distance("g", "ɡ"), 0.0);
        assert_eq!(table.distance("ʧ", "tʃ"), 0.0);
    }

    #[test]
    fn test_reference_distances() {
        let table = FeatureTable::new();
        assert_eq!(table.distance("b", "p"), 1.0);
        assert_eq!(table.distance("w", "j"), 3.0);
        assert_eq!(table.distance("w", "b"), 8.0);
        assert_eq!(table.distance("m", "p"), 3.0);
        assert_eq!(table.distance("l", "r"), 1.0);
    }

    #[test]
    fn test_trill_tap_blind_spot() {
        let table = FeatureTable::new();
        assert_eq!(table.distance("r", "ɾ"), 0.0);
    }

    #[test]
    fn test_distance_symmetry_and_identity() {
        let table = FeatureTable::new();
        assert_eq!(table.distance("s", "ʃ"), table.distance("ʃ", "s"));
        assert_eq!(table.distance("tʃ", "tʃ"), 0.0);
    }

    #[test]
    fn test_distance_unknown_is_maximal() {
        let table = FeatureTable::new();
        assert_eq!(table.distance("b", "?"), FEATURE_COUNT as f64);
    }

    #[test]
    fn test_memo_caches_symmetric_pairs() {
        let table = FeatureTable::new();
        assert_eq!(table.memo_len(), 0);
        let forward = table.distance("b", "p");
        assert_eq!(table.memo_len(), 1);
        let backward = table.distance("p", "b");
        assert_eq!(table.memo_len(), 1);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_inventory_encodings_well_formed() {
        for &(symbol, encoding) in INVENTORY {
            assert_eq!(
                encoding.chars().count(),
                FEATURE_COUNT,
                "bad encoding length for '{symbol}'"
            );
            assert!(
                encoding.chars().all(|c| Ternary::from_symbol(c).is_some()),
                "bad encoding symbol for '{symbol}'"
            );
        }
    }
}
