//! Diacritic identification and stripping.
//!
//! A character counts as a diacritic when it falls in one of the Unicode
//! combining/modifier blocks commonly used in IPA transcription, or when it
//! is one of the ad-hoc marks that show up in clinical datasets (notation
//! for linking, epenthetic traces, ASCII length colons and the like).

/// Whether `c` is treated as a diacritic mark rather than a base symbol.
///
/// Covered blocks: Combining Diacritical Marks (U+0300–U+036F) and their
/// Extended (U+1AB0–U+1AFF) and Supplement (U+1DC0–U+1DFF) blocks,
/// Combining Marks for Symbols (U+20D0–U+20FF), Superscripts and
/// Subscripts (U+2070–U+209F), and Spacing Modifier Letters
/// (U+02B0–U+02FF).
#[inline]
pub fn is_diacritic(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}'
        | '\u{1AB0}'..='\u{1AFF}'
        | '\u{1DC0}'..='\u{1DFF}'
        | '\u{20D0}'..='\u{20FF}'
        | '\u{2070}'..='\u{209F}'
        | '\u{02B0}'..='\u{02FF}'
    ) || is_dataset_mark(c)
}

/// Marks outside the combining blocks that transcription data still uses
/// as annotations on the preceding segment.
#[inline]
fn is_dataset_mark(c: char) -> bool {
    matches!(c, 'ᴸ' | 'ᵇ' | 'ᵊ' | ':' | '<' | '←' | '=' | '\'' | '‚')
}

/// Removes every diacritic from `s`, leaving base symbols only.
pub fn strip(s: &str) -> String {
    s.chars().filter(|&c| !is_diacritic(c)).collect()
}

/// The diacritics of `s`, in order of appearance.
pub fn extract(s: &str) -> Vec<char> {
    s.chars().filter(|&c| is_diacritic(c)).collect()
}
