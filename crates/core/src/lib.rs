//! `vulink-core` -- shared types and validation rules for the VU link
//! console.
//!
//! Holds the entity records exchanged with the apilink backend and the
//! pure validation rules that gate every mutation. No I/O happens in this
//! crate.

pub mod types;
pub mod validate;
