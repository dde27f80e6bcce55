//! Wardrobe Advisor - Resilient Structured-Inference Resolution
//!
//! Turns free-text answers from a generative vision/text service into
//! validated, schema-conformant styling analyses (color season, body shape,
//! garment assessment), falling back to a deterministic weighted classifier
//! whenever the service fails, refuses, or answers with something unusable.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
