//! PromptAssembler port - builds the messages sent to the model.

use crate::domain::styling::{DomainSchema, InferenceRequest};

use super::ai_provider::Message;

/// Turns a request and its schema into an ordered message list.
///
/// Wording is an implementation concern; the resolver only requires that an
/// image on the request ends up attached to one of the messages.
pub trait PromptAssembler: Send + Sync {
    fn assemble(&self, request: &InferenceRequest, schema: &DomainSchema) -> Vec<Message>;
}
