//! Schema-driven prompt assembly.
//!
//! The system message is generated from the `DomainSchema`: every field with
//! its type, bounds, and allowed categories, followed by a JSON skeleton the
//! service is asked to fill. The user message lists the caller's signals and
//! carries the photo when one was captured.

use std::fmt::Write;

use crate::domain::styling::{
    AnalysisKind, DomainSchema, FieldKind, FieldSpec, InferenceRequest,
};
use crate::ports::{Message, PromptAssembler};

/// Builds messages from the schema of the requested analysis.
#[derive(Debug, Clone, Default)]
pub struct SchemaPromptAssembler {
    /// Optional line appended to the system message, e.g. a reply language.
    extra_instruction: Option<String>,
}

impl SchemaPromptAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an instruction to every system message.
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.extra_instruction = Some(instruction.into());
        self
    }

    fn system_message(&self, schema: &DomainSchema) -> String {
        let mut prompt = String::new();
        prompt.push_str(role_for(schema.kind()));
        prompt.push_str("\n\n## Output Format\n\n");
        prompt.push_str("Respond with a single JSON object and nothing else. Fields:\n");

        for field in schema.fields() {
            describe_field(&mut prompt, field, "");
        }

        prompt.push_str("\nExample shape:\n```json\n");
        prompt.push_str(&skeleton(schema));
        prompt.push_str("\n```");

        if let Some(extra) = &self.extra_instruction {
            prompt.push_str("\n\n");
            prompt.push_str(extra);
        }
        prompt
    }

    fn user_message(&self, request: &InferenceRequest) -> String {
        let mut prompt = format!("Run a {} analysis.", request.kind.display_name().to_lowercase());

        if !request.signals.is_empty() {
            prompt.push_str("\n\nWhat the user told us:\n");
            for (name, value) in request.signals.iter() {
                let _ = writeln!(prompt, "- {}: {}", name, value);
            }
        }

        if request.has_visual_input() {
            prompt.push_str("\nUse the attached photo as the primary evidence.");
        }
        prompt
    }
}

impl PromptAssembler for SchemaPromptAssembler {
    fn assemble(&self, request: &InferenceRequest, schema: &DomainSchema) -> Vec<Message> {
        let mut user = Message::user(self.user_message(request));
        if let Some(image) = &request.image {
            user = user.with_image(image.clone());
        }
        vec![Message::system(self.system_message(schema)), user]
    }
}

fn role_for(kind: AnalysisKind) -> &'static str {
    match kind {
        AnalysisKind::ColorSeason => {
            "You are a personal color analyst. Determine which of the four seasons best \
             matches the person's natural coloring and suggest flattering colors."
        }
        AnalysisKind::BodyShape => {
            "You are a personal stylist. Classify the person's body shape from their \
             proportions and suggest silhouettes that flatter it."
        }
        AnalysisKind::GarmentAssessment => {
            "You are a wardrobe consultant. Assess how well the garment in the photo suits \
             the person, considering their color season and body shape."
        }
    }
}

fn describe_field(prompt: &mut String, field: &FieldSpec, indent: &str) {
    let _ = write!(prompt, "{}- \"{}\" ({})", indent, field.name, field.type_label());
    match &field.kind {
        FieldKind::Category { domain, .. } => {
            let _ = writeln!(prompt, ": one of {}", domain.members().join(", "));
        }
        FieldKind::Integer { min, max, .. } => {
            let _ = writeln!(prompt, ": from {} to {}", min, max);
        }
        FieldKind::Text { .. } => prompt.push('\n'),
        FieldKind::TextList { max_len, .. } => {
            let _ = writeln!(prompt, ": at most {} items", max_len);
        }
        FieldKind::RecordList {
            max_len,
            fields,
            required,
        } => {
            let _ = writeln!(
                prompt,
                ": at most {} items, each requiring {}",
                max_len,
                required.join(", ")
            );
            let nested = format!("{}  ", indent);
            for inner in fields {
                describe_field(prompt, inner, &nested);
            }
        }
    }
}

fn skeleton(schema: &DomainSchema) -> String {
    let object = skeleton_object(schema.fields());
    serde_json::to_string_pretty(&object).unwrap_or_else(|_| "{}".to_string())
}

fn skeleton_object(fields: &[FieldSpec]) -> serde_json::Value {
    let map = fields
        .iter()
        .map(|field| {
            let value = match &field.kind {
                FieldKind::Category { domain, .. } => {
                    serde_json::Value::String(domain.members().join(" | "))
                }
                FieldKind::Integer { min, .. } => serde_json::Value::from(*min),
                FieldKind::Text { .. } => serde_json::Value::String("...".to_string()),
                FieldKind::TextList { .. } => serde_json::json!(["..."]),
                FieldKind::RecordList { fields, .. } => {
                    serde_json::Value::Array(vec![skeleton_object(fields)])
                }
            };
            (field.name.clone(), value)
        })
        .collect();
    serde_json::Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::styling::{AnalysisCatalog, ImageReference};
    use crate::ports::MessageRole;

    fn assemble(request: &InferenceRequest) -> Vec<Message> {
        let catalog = AnalysisCatalog::builtin();
        let schema = catalog.schema(request.kind).unwrap();
        SchemaPromptAssembler::new().assemble(request, schema)
    }

    #[test]
    fn produces_system_then_user() {
        let messages = assemble(&InferenceRequest::new(AnalysisKind::BodyShape));

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[1].role, MessageRole::User);
    }

    #[test]
    fn system_message_lists_fields_and_categories() {
        let messages = assemble(&InferenceRequest::new(AnalysisKind::ColorSeason));
        let system = &messages[0].content;

        assert!(system.contains("\"season\" (enum)"));
        assert!(system.contains("Spring, Summer, Autumn, Winter"));
        assert!(system.contains("\"confidence\" (integer): from 70 to 100"));
        assert!(system.contains("```json"));
    }

    #[test]
    fn record_list_fields_are_nested() {
        let messages = assemble(&InferenceRequest::new(AnalysisKind::GarmentAssessment));
        let system = &messages[0].content;

        assert!(system.contains("\"garments\" (list<object>)"));
        assert!(system.contains("  - \"score\" (integer): from 0 to 10"));
    }

    #[test]
    fn user_message_lists_signals() {
        let request = InferenceRequest::new(AnalysisKind::ColorSeason)
            .with_signal("skinTone", "Muito clara")
            .with_signal("eyeColor", "Azul");
        let messages = assemble(&request);

        assert!(messages[1].content.contains("- eyeColor: Azul"));
        assert!(messages[1].content.contains("- skinTone: Muito clara"));
        assert!(messages[1].image.is_none());
    }

    #[test]
    fn image_is_attached_to_user_message() {
        let request = InferenceRequest::new(AnalysisKind::GarmentAssessment)
            .with_image(ImageReference::new("https://example.com/shirt.jpg"));
        let messages = assemble(&request);

        assert!(messages[0].image.is_none());
        assert_eq!(
            messages[1].image.as_ref().map(ImageReference::as_str),
            Some("https://example.com/shirt.jpg")
        );
        assert!(messages[1].content.contains("attached photo"));
    }

    #[test]
    fn extra_instruction_is_appended() {
        let catalog = AnalysisCatalog::builtin();
        let request = InferenceRequest::new(AnalysisKind::BodyShape);
        let schema = catalog.schema(request.kind).unwrap();
        let messages = SchemaPromptAssembler::new()
            .with_instruction("Write text fields in Brazilian Portuguese.")
            .assemble(&request, schema);

        assert!(messages[0].content.ends_with("Write text fields in Brazilian Portuguese."));
    }
}
