//! Storage Adapters
//!
//! Implementations of the AnalysisRepository port.
//!
//! ## Available Adapters
//!
//! - **FsAnalysisRepository** - Stores each analysis as a JSON file on disk
//! - **InMemoryAnalysisRepository** - Stores analyses in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FsAnalysisRepository, InMemoryAnalysisRepository};
//!
//! // Production: file-based storage
//! let repo = FsAnalysisRepository::new("./data");
//!
//! // Testing: in-memory storage
//! let repo = InMemoryAnalysisRepository::new();
//! ```

mod fs_analysis_repository;
mod in_memory_analysis_repository;

pub use fs_analysis_repository::FsAnalysisRepository;
pub use in_memory_analysis_repository::InMemoryAnalysisRepository;

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::json;

    use crate::domain::styling::{validate, AnalysisCatalog, AnalysisKind, Provenance, ValidatedResult};

    /// A fallback-provenance result built from the built-in schema.
    pub fn sample_result(kind: AnalysisKind) -> ValidatedResult {
        let catalog = AnalysisCatalog::builtin();
        let schema = catalog.schema(kind).unwrap();
        let fields = validate(&json!({}), schema);
        ValidatedResult::new(schema, fields, Provenance::DeterministicFallback)
    }
}
