//! Typed HTTP client for the apilink REST surface.
//!
//! Wraps the backend's `/api/v0` endpoints with [`reqwest`] and normalises
//! every response — non-`ok` envelopes, transport failures, malformed JSON —
//! into a uniform success/failure result:
//!
//! - [`LinkApi`] — one async operation per backend capability.
//! - [`Envelope`] — the uniform `{status, message, data}` response wrapper.
//! - [`ApiError`] — the wire-level failure taxonomy.

pub mod api;
pub mod envelope;

pub use api::{ApiError, ClientConfig, LinkApi};
pub use envelope::Envelope;
