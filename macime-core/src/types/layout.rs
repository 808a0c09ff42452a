//! Latin-key to jamo keyboard layouts

use crate::error::{Error, Result};

/// Two-set Hangul layouts selectable from config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HangulLayout {
    /// Two-set layout with one dedicated key per vowel, compound vowels included
    #[default]
    Macime,
    /// Standard KS X 5002 positions; single jamo only
    Dubeolsik,
}

// Lookups are case-sensitive; a shifted key not listed here is not part of the layout.
const MACIME: &[(char, char)] = &[
    ('r', 'ㄱ'), ('R', 'ㄲ'), ('s', 'ㄴ'), ('e', 'ㄷ'), ('E', 'ㄸ'),
    ('f', 'ㄹ'), ('a', 'ㅁ'), ('q', 'ㅂ'), ('Q', 'ㅃ'), ('t', 'ㅅ'),
    ('T', 'ㅆ'), ('d', 'ㅇ'), ('w', 'ㅈ'), ('W', 'ㅉ'), ('c', 'ㅊ'),
    ('z', 'ㅋ'), ('x', 'ㅌ'), ('v', 'ㅍ'), ('g', 'ㅎ'),
    ('k', 'ㅏ'), ('o', 'ㅐ'), ('i', 'ㅑ'), ('O', 'ㅒ'), ('j', 'ㅓ'),
    ('u', 'ㅔ'), ('h', 'ㅕ'), ('P', 'ㅖ'), ('y', 'ㅗ'), ('n', 'ㅘ'),
    ('b', 'ㅙ'), ('m', 'ㅚ'), ('l', 'ㅛ'), ('p', 'ㅜ'), (';', 'ㅝ'),
    ('\'', 'ㅞ'), ('/', 'ㅟ'), ('0', 'ㅠ'), ('[', 'ㅡ'), (']', 'ㅢ'),
    ('\\', 'ㅣ'),
];

const DUBEOLSIK: &[(char, char)] = &[
    ('q', 'ㅂ'), ('Q', 'ㅃ'), ('w', 'ㅈ'), ('W', 'ㅉ'), ('e', 'ㄷ'),
    ('E', 'ㄸ'), ('r', 'ㄱ'), ('R', 'ㄲ'), ('t', 'ㅅ'), ('T', 'ㅆ'),
    ('a', 'ㅁ'), ('s', 'ㄴ'), ('d', 'ㅇ'), ('f', 'ㄹ'), ('g', 'ㅎ'),
    ('z', 'ㅋ'), ('x', 'ㅌ'), ('c', 'ㅊ'), ('v', 'ㅍ'),
    ('y', 'ㅛ'), ('u', 'ㅕ'), ('i', 'ㅑ'), ('o', 'ㅐ'), ('O', 'ㅒ'),
    ('p', 'ㅔ'), ('P', 'ㅖ'), ('h', 'ㅗ'), ('j', 'ㅓ'), ('k', 'ㅏ'),
    ('l', 'ㅣ'), ('b', 'ㅠ'), ('n', 'ㅜ'), ('m', 'ㅡ'),
];

impl HangulLayout {
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "macime" => Ok(HangulLayout::Macime),
            "dubeolsik" | "2set" => Ok(HangulLayout::Dubeolsik),
            other => Err(Error::InvalidConfig(format!("unknown hangul layout: {}", other))),
        }
    }

    fn table(self) -> &'static [(char, char)] {
        match self {
            HangulLayout::Macime => MACIME,
            HangulLayout::Dubeolsik => DUBEOLSIK,
        }
    }

    /// Jamo typed by `ch`, or `None` if the key is not part of the layout
    pub fn map_char(self, ch: char) -> Option<char> {
        self.table().iter().find(|(k, _)| *k == ch).map(|(_, j)| *j)
    }

    /// Jamo for `ch`, or `ch` itself when the key is not part of the layout
    pub fn translate(self, ch: char) -> char {
        self.map_char(ch).unwrap_or(ch)
    }
}
