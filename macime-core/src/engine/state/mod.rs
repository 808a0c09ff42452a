//! Composer state

mod buffer;
mod syllable;

pub use buffer::CommitBuffer;
pub use syllable::Syllable;
