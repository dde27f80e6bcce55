//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `styling` - Analysis schemas, payload extraction, validation, and fallback classification

pub mod foundation;
pub mod styling;
