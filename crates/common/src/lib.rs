//! Common utilities shared between the microjs crates.

pub use hashbrown as hashmap;

pub mod format;
pub mod id;
pub mod ident;
pub mod interner;
pub mod result;
pub mod source;
pub mod span;
