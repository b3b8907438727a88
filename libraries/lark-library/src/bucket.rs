//! Script-aware bucket classification
//!
//! Maps the leading character of a title onto the symbol shown on the
//! fast-scroll rail:
//! - precomposed Hangul syllables fold to their initial consonant (가 -> ㄱ)
//! - standalone initial-consonant jamo map to themselves
//! - any other letter maps to its uppercase form
//! - everything else (digits, punctuation, emoji) lands in `#`

use std::fmt;

/// First precomposed Hangul syllable (가)
const HANGUL_SYLLABLE_START: u32 = 0xAC00;

/// Last precomposed Hangul syllable (힣)
const HANGUL_SYLLABLE_END: u32 = 0xD7A3;

/// Medial vowels per initial consonant
const HANGUL_MEDIAL_COUNT: u32 = 21;

/// Final consonants (including "none") per medial vowel
const HANGUL_FINAL_COUNT: u32 = 28;

/// Conjoining initial consonant jamo (ᄀ..ᄒ), same order as the table below
const CHOSEONG_START: u32 = 0x1100;
const CHOSEONG_END: u32 = 0x1112;

/// The 19 initial consonants, in syllable-block order
const HANGUL_INITIALS: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ', 'ㅋ',
    'ㅌ', 'ㅍ', 'ㅎ',
];

/// Symbol used for titles that start with neither a Hangul nor a letter
pub const FALLBACK_SYMBOL: char = '#';

/// Rail grouping, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BucketGroup {
    Hangul,
    Letter,
    Other,
}

/// A single fast-scroll grouping symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Hangul initial consonant (compatibility jamo)
    Hangul(char),

    /// Uppercased letter
    Letter(char),

    /// Fallback bucket, displayed as `#`
    Other,
}

impl Bucket {
    /// Display symbol for the rail
    pub fn symbol(self) -> char {
        match self {
            Self::Hangul(c) | Self::Letter(c) => c,
            Self::Other => FALLBACK_SYMBOL,
        }
    }

    /// Group used to order the rail
    pub fn group(self) -> BucketGroup {
        match self {
            Self::Hangul(_) => BucketGroup::Hangul,
            Self::Letter(_) => BucketGroup::Letter,
            Self::Other => BucketGroup::Other,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Initial consonant of a Hangul character, if it has one
///
/// Precomposed syllables are decomposed arithmetically:
/// `index = (code - 0xAC00) / (21 * 28)`.
pub fn hangul_initial(c: char) -> Option<char> {
    let code = u32::from(c);

    if (HANGUL_SYLLABLE_START..=HANGUL_SYLLABLE_END).contains(&code) {
        let index = (code - HANGUL_SYLLABLE_START) / (HANGUL_MEDIAL_COUNT * HANGUL_FINAL_COUNT);
        return HANGUL_INITIALS.get(index as usize).copied();
    }

    // Compatibility jamo consonants (ㄱ..ㅎ) are already initials
    if ('ㄱ'..='ㅎ').contains(&c) {
        return Some(c);
    }

    if (CHOSEONG_START..=CHOSEONG_END).contains(&code) {
        return HANGUL_INITIALS.get((code - CHOSEONG_START) as usize).copied();
    }

    None
}

/// Classify a single character
pub fn classify_char(c: char) -> Bucket {
    if let Some(initial) = hangul_initial(c) {
        return Bucket::Hangul(initial);
    }

    if c.is_alphabetic() {
        // Only single-char uppercase forms apply; ß stays ß rather than SS
        let mut upper = c.to_uppercase();
        let letter = match (upper.next(), upper.next()) {
            (Some(u), None) => u,
            _ => c,
        };
        return Bucket::Letter(letter);
    }

    Bucket::Other
}

/// Classify a title by its leading character
///
/// Returns `None` for an empty title; such tracks stay in the list but get no
/// rail entry.
pub fn classify_title(title: &str) -> Option<Bucket> {
    title.chars().next().map(classify_char)
}
