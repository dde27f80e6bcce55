//! Styling module - structured inference for wardrobe analyses.
//!
//! Turns an unreliable free-text answer from a generative service into a
//! validated, schema-conformant record, with a deterministic fallback when
//! the answer is unusable.
//!
//! Flow, leaf-first:
//! - `schema` / `definitions` / `catalog` - what each analysis must contain
//! - `detector` - refusal and degenerate-output detection
//! - `extraction` + `repair` - locating and parsing the payload
//! - `normalizer` - applying a schema to the payload
//! - `classifier` - weighted fallback over caller signals
//! - `result` / `resolution_state` - output and lifecycle

mod analysis_kind;
mod catalog;
mod classifier;
pub mod definitions;
mod detector;
mod extraction;
mod fields;
mod normalizer;
mod repair;
mod request;
mod resolution_state;
mod result;
mod schema;
mod text;

pub use analysis_kind::AnalysisKind;
pub use catalog::{AnalysisCatalog, AnalysisDefinition};
pub use classifier::{Classification, FallbackClassifier, FallbackWeightTable};
pub use detector::{FailureSignal, RefusalDetector, DEFAULT_MIN_RESPONSE_LENGTH, DEFAULT_REFUSAL_PHRASES};
pub use extraction::{
    AttemptOutcome, Candidate, Extraction, ExtractionAttempt, ExtractionPipeline,
    ExtractionStrategy, ParseStatus,
};
pub use fields::{FieldValue, Record, ValidatedFields};
pub use normalizer::validate;
pub use repair::repair;
pub use request::{ImageReference, InferenceRequest, Signals};
pub use resolution_state::ResolutionState;
pub use result::{Provenance, ValidatedResult};
pub use schema::{
    CategoryDomain, DomainSchema, FieldKind, FieldSpec, ListDefault, DEFAULT_FALLBACK_CONFIDENCE,
};
pub use text::{normalize_key, normalize_token};
