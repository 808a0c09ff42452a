//! Static Hangul jamo tables and the syllable composition formula
//!
//! Jamo are stored as indices into three fixed alphabets. The index order is
//! the Unicode syllable block order, so composition is pure arithmetic:
//! `0xAC00 + onset * 588 + vowel * 28 + coda`.

/// First codepoint of the precomposed Hangul syllable block
pub const SYLLABLE_BASE: u32 = 0xAC00;
/// Number of onset jamo
pub const ONSET_COUNT: usize = 19;
/// Number of vowel jamo
pub const VOWEL_COUNT: usize = 21;
/// Number of coda slots, including the empty coda at index 0
pub const CODA_COUNT: usize = 28;

const VOWEL_STRIDE: u32 = CODA_COUNT as u32;
const ONSET_STRIDE: u32 = (VOWEL_COUNT * CODA_COUNT) as u32;
const SYLLABLE_COUNT: u32 = (ONSET_COUNT * VOWEL_COUNT * CODA_COUNT) as u32;

const ONSETS: [char; ONSET_COUNT] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ',
    'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ', 'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

const VOWELS: [char; VOWEL_COUNT] = [
    'ㅏ', 'ㅐ', 'ㅑ', 'ㅒ', 'ㅓ', 'ㅔ', 'ㅕ', 'ㅖ', 'ㅗ', 'ㅘ',
    'ㅙ', 'ㅚ', 'ㅛ', 'ㅜ', 'ㅝ', 'ㅞ', 'ㅟ', 'ㅠ', 'ㅡ', 'ㅢ', 'ㅣ',
];

// Index 0 is the empty coda.
const CODAS: [Option<char>; CODA_COUNT] = [
    None,
    Some('ㄱ'), Some('ㄲ'), Some('ㄳ'), Some('ㄴ'), Some('ㄵ'), Some('ㄶ'), Some('ㄷ'),
    Some('ㄹ'), Some('ㄺ'), Some('ㄻ'), Some('ㄼ'), Some('ㄽ'), Some('ㄾ'), Some('ㄿ'),
    Some('ㅀ'), Some('ㅁ'), Some('ㅂ'), Some('ㅄ'), Some('ㅅ'), Some('ㅆ'), Some('ㅇ'),
    Some('ㅈ'), Some('ㅊ'), Some('ㅋ'), Some('ㅌ'), Some('ㅍ'), Some('ㅎ'),
];

/// Leading consonant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Onset(u8);

/// Medial vowel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vowel(u8);

/// Trailing consonant; never the empty coda (that is `Option::None`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coda(u8);

impl Onset {
    pub fn from_index(index: usize) -> Option<Self> {
        (index < ONSET_COUNT).then(|| Onset(index as u8))
    }

    pub fn from_char(ch: char) -> Option<Self> {
        ONSETS.iter().position(|&c| c == ch).map(|i| Onset(i as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Compatibility jamo glyph
    pub fn to_char(self) -> char {
        ONSETS[self.index()]
    }

    /// The same consonant in trailing position, if it may close a syllable
    pub fn as_coda(self) -> Option<Coda> {
        Coda::from_char(self.to_char())
    }
}

impl Vowel {
    pub fn from_index(index: usize) -> Option<Self> {
        (index < VOWEL_COUNT).then(|| Vowel(index as u8))
    }

    pub fn from_char(ch: char) -> Option<Self> {
        VOWELS.iter().position(|&c| c == ch).map(|i| Vowel(i as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn to_char(self) -> char {
        VOWELS[self.index()]
    }
}

impl Coda {
    /// `index` must be in `1..28`; index 0 is the empty coda
    pub fn from_index(index: usize) -> Option<Self> {
        (index > 0 && index < CODA_COUNT).then(|| Coda(index as u8))
    }

    pub fn from_char(ch: char) -> Option<Self> {
        CODAS
            .iter()
            .position(|&c| c == Some(ch))
            .map(|i| Coda(i as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn to_char(self) -> char {
        // from_index/from_char never produce the empty slot
        CODAS[self.index()].unwrap_or_default()
    }
}

/// Coda index with 0 standing for "no coda"
pub fn coda_index(coda: Option<Coda>) -> usize {
    coda.map_or(0, Coda::index)
}

/// How a single input character participates in composition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JamoClass {
    Onset(Onset),
    Vowel(Vowel),
    Neither,
}

/// Classify a compatibility jamo character
///
/// Compound codas (ㄳ, ㄵ, ...) cannot start a syllable and classify as
/// `Neither`.
pub fn classify(ch: char) -> JamoClass {
    if let Some(onset) = Onset::from_char(ch) {
        JamoClass::Onset(onset)
    } else if let Some(vowel) = Vowel::from_char(ch) {
        JamoClass::Vowel(vowel)
    } else {
        JamoClass::Neither
    }
}

/// Compose a precomposed syllable block
pub fn compose(onset: Onset, vowel: Vowel, coda: Option<Coda>) -> char {
    let value = SYLLABLE_BASE
        + onset.index() as u32 * ONSET_STRIDE
        + vowel.index() as u32 * VOWEL_STRIDE
        + coda_index(coda) as u32;
    // Every index combination lands inside the 11172-codepoint block.
    char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Split a precomposed syllable block back into its jamo
pub fn decompose(syllable: char) -> Option<(Onset, Vowel, Option<Coda>)> {
    let offset = (syllable as u32).checked_sub(SYLLABLE_BASE)?;
    if offset >= SYLLABLE_COUNT {
        return None;
    }

    let onset = Onset((offset / ONSET_STRIDE) as u8);
    let vowel = Vowel(((offset % ONSET_STRIDE) / VOWEL_STRIDE) as u8);
    let coda = Coda::from_index((offset % VOWEL_STRIDE) as usize);
    Some((onset, vowel, coda))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_matches_formula_everywhere() {
        for o in 0..ONSET_COUNT {
            for v in 0..VOWEL_COUNT {
                for c in 0..CODA_COUNT {
                    let onset = Onset::from_index(o).unwrap();
                    let vowel = Vowel::from_index(v).unwrap();
                    let coda = Coda::from_index(c);
                    let ch = compose(onset, vowel, coda);

                    let expected = 0xAC00 + o as u32 * 588 + v as u32 * 28 + c as u32;
                    assert_eq!(ch as u32, expected);
                    assert_eq!(decompose(ch), Some((onset, vowel, coda)));
                }
            }
        }
    }

    #[test]
    fn test_known_syllables() {
        let g = Onset::from_char('ㄱ').unwrap();
        let a = Vowel::from_char('ㅏ').unwrap();
        let s = Coda::from_char('ㅅ').unwrap();
        assert_eq!(compose(g, a, None), '가');
        assert_eq!(compose(g, a, Some(s)), '갓');
        assert_eq!(compose(Onset::from_char('ㅎ').unwrap(), Vowel::from_char('ㅣ').unwrap(), Some(Coda::from_char('ㅎ').unwrap())), '힣');
    }

    #[test]
    fn test_decompose_outside_block() {
        assert_eq!(decompose('A'), None);
        assert_eq!(decompose('ㄱ'), None);
        assert_eq!(decompose('\u{D7A4}'), None);
    }

    #[test]
    fn test_classify() {
        assert!(matches!(classify('ㄱ'), JamoClass::Onset(_)));
        assert!(matches!(classify('ㅘ'), JamoClass::Vowel(_)));
        assert_eq!(classify('ㄳ'), JamoClass::Neither);
        assert_eq!(classify('a'), JamoClass::Neither);
    }

    #[test]
    fn test_onset_as_coda() {
        assert_eq!(Onset::from_char('ㄱ').unwrap().as_coda().map(Coda::to_char), Some('ㄱ'));
        assert_eq!(Onset::from_char('ㄸ').unwrap().as_coda(), None);
        assert_eq!(Onset::from_char('ㅃ').unwrap().as_coda(), None);
        assert_eq!(Onset::from_char('ㅉ').unwrap().as_coda(), None);
    }

    #[test]
    fn test_empty_coda_is_not_a_coda() {
        assert_eq!(Coda::from_index(0), None);
        assert_eq!(coda_index(None), 0);
    }
}
