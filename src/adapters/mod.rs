//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Generative service providers (OpenAI, mock)
//! - `prompts` - Schema-driven prompt assembly
//! - `storage` - Analysis persistence (filesystem, in-memory)

pub mod ai;
pub mod prompts;
pub mod storage;

pub use ai::{MockAIProvider, OpenAIConfig, OpenAIProvider};
pub use prompts::SchemaPromptAssembler;
pub use storage::{FsAnalysisRepository, InMemoryAnalysisRepository};
