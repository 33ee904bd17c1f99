//! Error types for Colloquy
//!
//! Every fallible operation in the crate returns [`ColloquyResult`]. Errors carry
//! a stable code, a human-readable message and optional context through the
//! [`UnifiedError`] trait, and a short end-user message for the `error` event
//! that the response forwarder sends to a client.

mod constructors;
mod conversions;
mod types;
mod unified_error;
mod user_messages;

pub use types::{ColloquyError, ColloquyResult, UnifiedError};
pub use user_messages::ErrorCategory;
