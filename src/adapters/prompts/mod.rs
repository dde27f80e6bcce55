//! Prompt Adapters
//!
//! Implementations of the PromptAssembler port.

mod schema_prompt_assembler;

pub use schema_prompt_assembler::SchemaPromptAssembler;
