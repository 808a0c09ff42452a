//! The syllable currently being composed

use crate::types::jamo::{self, Coda, Onset, Vowel};

/// Pending jamo of one syllable
///
/// A vowel is only set after an onset and a coda only after a vowel;
/// [`crate::engine::HangulComposer`] maintains that ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Syllable {
    pub onset: Option<Onset>,
    pub vowel: Option<Vowel>,
    pub coda: Option<Coda>,
}

impl Syllable {
    pub fn is_empty(&self) -> bool {
        self.onset.is_none() && self.vowel.is_none() && self.coda.is_none()
    }

    pub fn clear(&mut self) {
        *self = Syllable::default();
    }

    /// Render the syllable; a syllable without a vowel renders as its bare jamo
    pub fn render(&self) -> String {
        match (self.onset, self.vowel) {
            (Some(onset), Some(vowel)) => jamo::compose(onset, vowel, self.coda).to_string(),
            _ => self
                .onset
                .map(Onset::to_char)
                .into_iter()
                .chain(self.vowel.map(Vowel::to_char))
                .chain(self.coda.map(Coda::to_char))
                .collect(),
        }
    }

    /// Clear the most specific field set; false if nothing was set
    pub fn remove_last(&mut self) -> bool {
        if self.coda.take().is_some() {
            return true;
        }
        if self.vowel.take().is_some() {
            return true;
        }
        self.onset.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let mut syllable = Syllable::default();
        assert_eq!(syllable.render(), "");

        syllable.onset = Onset::from_char('ㄱ');
        assert_eq!(syllable.render(), "ㄱ");

        syllable.vowel = Vowel::from_char('ㅏ');
        syllable.coda = Coda::from_char('ㄱ');
        assert_eq!(syllable.render(), "각");
    }

    #[test]
    fn test_remove_last_order() {
        let mut syllable = Syllable {
            onset: Onset::from_char('ㄱ'),
            vowel: Vowel::from_char('ㅏ'),
            coda: Coda::from_char('ㅅ'),
        };
        assert!(syllable.remove_last());
        assert_eq!(syllable.render(), "가");
        assert!(syllable.remove_last());
        assert_eq!(syllable.render(), "ㄱ");
        assert!(syllable.remove_last());
        assert!(syllable.is_empty());
        assert!(!syllable.remove_last());
    }
}
