//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod analysis;

pub use analysis::{
    GetLatestAnalysisHandler, GetLatestAnalysisQuery, InferenceResolver, ResolveError,
    RunAnalysisCommand, RunAnalysisError, RunAnalysisHandler,
};
