pub mod jamo;
pub mod layout;
pub mod virtual_keys;

pub use jamo::*;
pub use layout::*;
pub use virtual_keys::*;
