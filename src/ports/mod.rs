//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - the generative inference service
//! - `PromptAssembler` - message construction from a request and schema
//! - `AnalysisRepository` - persistence of resolved analyses

mod ai_provider;
mod analysis_repository;
mod prompt_assembler;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, Message, MessageRole,
    RequestMetadata,
};
pub use analysis_repository::{AnalysisRepository, StorageError};
pub use prompt_assembler::PromptAssembler;
