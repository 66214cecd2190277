//! Console core for administering the apilink catalog.
//!
//! - [`catalog`] — the shared catalog snapshot and its synchronizer.
//! - [`controller`] — the per-entity lifecycle controller consuming user
//!   intents.
//!
//! The binary entrypoint lives in `main.rs`.

pub mod catalog;
pub mod controller;

pub use catalog::{Catalog, CatalogSnapshot, CatalogStatus, LinkState};
pub use controller::{Confirmation, ConsoleError, Intent, LinkConsole, Outcome};
