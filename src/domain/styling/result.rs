//! ValidatedResult - the only externally visible output of a resolution.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use super::analysis_kind::AnalysisKind;
use super::fields::{Record, ValidatedFields};
use super::schema::DomainSchema;
use crate::domain::foundation::{AnalysisId, Timestamp};

/// Where a result's fields came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Parsed from the generative service's answer.
    ServiceDerived,
    /// Synthesized by the fallback classifier.
    DeterministicFallback,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::ServiceDerived => "service_derived",
            Provenance::DeterministicFallback => "deterministic_fallback",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A schema-conformant analysis outcome.
///
/// Immutable after construction. Ownership passes to the caller, which
/// decides whether to persist it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedResult {
    id: AnalysisId,
    kind: AnalysisKind,
    category: String,
    fields: ValidatedFields,
    confidence_score: i64,
    provenance: Provenance,
    resolved_at: Timestamp,
}

impl ValidatedResult {
    /// Wraps validator output. `fields` must come from validating against
    /// `schema`, so the discriminant and confidence fields are present.
    pub(crate) fn new(schema: &DomainSchema, fields: ValidatedFields, provenance: Provenance) -> Self {
        let category = fields
            .category(schema.discriminant())
            .unwrap_or_default()
            .to_string();
        let confidence_score = fields
            .integer(schema.confidence_field())
            .unwrap_or_else(|| schema.fallback_confidence());

        Self {
            id: AnalysisId::new(),
            kind: schema.kind(),
            category,
            fields,
            confidence_score,
            provenance,
            resolved_at: Timestamp::now(),
        }
    }

    pub fn id(&self) -> &AnalysisId {
        &self.id
    }

    pub fn kind(&self) -> AnalysisKind {
        self.kind
    }

    /// Value of the schema's discriminant field (season, shape, verdict).
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn fields(&self) -> &ValidatedFields {
        &self.fields
    }

    pub fn confidence_score(&self) -> i64 {
        self.confidence_score
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn resolved_at(&self) -> &Timestamp {
        &self.resolved_at
    }

    pub fn is_fallback(&self) -> bool {
        self.provenance == Provenance::DeterministicFallback
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.text(name)
    }

    pub fn text_list(&self, name: &str) -> Option<&[String]> {
        self.fields.text_list(name)
    }

    pub fn records(&self, name: &str) -> Option<&[Record]> {
        self.fields.records(name)
    }

    /// Flat JSON view for rendering.
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id.to_string(),
            "kind": self.kind,
            "category": self.category,
            "confidence_score": self.confidence_score,
            "provenance": self.provenance,
            "resolved_at": self.resolved_at.to_string(),
            "fields": self.fields.to_json(),
        })
    }
}
