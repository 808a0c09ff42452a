//! Hangul syllable composer
//!
//! Consumes one jamo (or any other character) at a time and keeps at most one
//! syllable pending. Everything finalized goes to the commit buffer, which the
//! session drains after every key.

use log::trace;

use super::state::{CommitBuffer, Syllable};
use crate::types::jamo::{classify, JamoClass, Onset, Vowel};

#[derive(Debug, Clone, Default)]
pub struct HangulComposer {
    committed: CommitBuffer,
    pending: Syllable,
}

impl HangulComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one character; every character is accepted
    pub fn process(&mut self, ch: char) -> bool {
        match classify(ch) {
            JamoClass::Onset(onset) => self.process_onset(onset),
            JamoClass::Vowel(vowel) => self.process_vowel(vowel),
            JamoClass::Neither => {
                self.finish_syllable();
                self.committed.push(ch);
            }
        }
        trace!("composer {:?} -> pending {:?}", ch, self.pending);
        true
    }

    fn process_onset(&mut self, onset: Onset) {
        match (self.pending.onset, self.pending.vowel, self.pending.coda) {
            (None, _, _) => self.pending.onset = Some(onset),
            (Some(_), Some(_), None) => match onset.as_coda() {
                Some(coda) => self.pending.coda = Some(coda),
                // ㄸ ㅃ ㅉ never close a syllable
                None => self.start_syllable(onset),
            },
            _ => self.start_syllable(onset),
        }
    }

    fn process_vowel(&mut self, vowel: Vowel) {
        match (self.pending.onset, self.pending.vowel) {
            (Some(_), None) => self.pending.vowel = Some(vowel),
            _ => {
                // No coda migration: the vowel stands alone.
                self.finish_syllable();
                self.committed.push(vowel.to_char());
            }
        }
    }

    fn start_syllable(&mut self, onset: Onset) {
        self.finish_syllable();
        self.pending.onset = Some(onset);
    }

    fn finish_syllable(&mut self) {
        if !self.pending.is_empty() {
            self.committed.append(&self.pending.render());
            self.pending.clear();
        }
    }

    /// Remove coda, vowel, onset, then committed text, in that order
    pub fn backspace(&mut self) -> bool {
        self.pending.remove_last() || self.committed.pop()
    }

    /// Rendering of the pending syllable; empty when nothing is pending
    pub fn preedit(&self) -> String {
        self.pending.render()
    }

    /// Drain text finalized since the last call; the pending syllable stays
    pub fn commit(&mut self) -> String {
        self.committed.take()
    }

    /// Finalize the pending syllable and drain everything
    pub fn flush(&mut self) -> String {
        self.finish_syllable();
        self.committed.take()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.committed.is_empty()
    }

    pub fn reset(&mut self) {
        self.pending.clear();
        self.committed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(composer: &mut HangulComposer, text: &str) {
        for ch in text.chars() {
            assert!(composer.process(ch));
        }
    }

    #[test]
    fn test_onset_vowel_coda() {
        let mut c = HangulComposer::new();
        feed(&mut c, "ㄱㅏㄱ");
        assert_eq!(c.preedit(), "각");
        assert_eq!(c.commit(), "");

        feed(&mut c, "ㄴ");
        assert_eq!(c.commit(), "각");
        assert_eq!(c.preedit(), "ㄴ");
    }

    #[test]
    fn test_consecutive_onsets_finalize_separately() {
        let mut c = HangulComposer::new();
        feed(&mut c, "ㄱㄴ");
        assert_eq!(c.commit(), "ㄱ");
        assert_eq!(c.preedit(), "ㄴ");
    }

    #[test]
    fn test_vowel_after_full_syllable_stands_alone() {
        let mut c = HangulComposer::new();
        feed(&mut c, "ㄱㅏㄴㅏ");
        assert_eq!(c.commit(), "간ㅏ");
        assert_eq!(c.preedit(), "");

        feed(&mut c, "ㄱㅏㅓ");
        assert_eq!(c.commit(), "가ㅓ");
    }

    #[test]
    fn test_invalid_coda_starts_new_syllable() {
        let mut c = HangulComposer::new();
        feed(&mut c, "ㄱㅏㄸ");
        assert_eq!(c.commit(), "가");
        assert_eq!(c.preedit(), "ㄸ");
    }

    #[test]
    fn test_non_jamo_finalizes() {
        let mut c = HangulComposer::new();
        feed(&mut c, "ㅎㅏ1");
        assert_eq!(c.commit(), "하1");
        assert!(c.is_empty());
    }

    #[test]
    fn test_flush_is_idempotent() {
        let mut c = HangulComposer::new();
        feed(&mut c, "ㅎㅏㄴ");
        assert_eq!(c.flush(), "한");
        assert_eq!(c.flush(), "");
        assert!(c.is_empty());
    }

    #[test]
    fn test_backspace_into_committed() {
        let mut c = HangulComposer::new();
        feed(&mut c, "ㅏㄱ");
        assert!(c.backspace());
        assert_eq!(c.preedit(), "");
        assert!(c.backspace());
        assert!(c.is_empty());
        assert!(!c.backspace());
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut c = HangulComposer::new();
        feed(&mut c, "ㅏㄱㅏ");
        c.reset();
        assert!(c.is_empty());
        assert_eq!(c.flush(), "");
    }
}
