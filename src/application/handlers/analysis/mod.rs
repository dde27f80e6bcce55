//! Analysis command and query handlers.
//!
//! - `InferenceResolver` - resolves one request into a validated result
//! - `RunAnalysisHandler` - resolves, then saves the result for the user
//! - `GetLatestAnalysisHandler` - reads saved results back

mod get_latest_analysis;
mod inference_resolver;
mod run_analysis;

pub use get_latest_analysis::{GetLatestAnalysisHandler, GetLatestAnalysisQuery};
pub use inference_resolver::{InferenceResolver, ResolveError};
pub use run_analysis::{RunAnalysisCommand, RunAnalysisError, RunAnalysisHandler};
