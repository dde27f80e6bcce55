//! AnalysisCatalog - the schemas and weight tables the resolver serves.
//!
//! A catalog is assembled once and shared read-only. The built-in catalog
//! covers every [`AnalysisKind`]; callers can assemble their own to swap in
//! different weights or fields.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::analysis_kind::AnalysisKind;
use super::classifier::FallbackWeightTable;
use super::definitions;
use super::schema::DomainSchema;
use crate::domain::foundation::ValidationError;

/// Schema plus fallback weights for one analysis kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisDefinition {
    schema: DomainSchema,
    weights: FallbackWeightTable,
}

impl AnalysisDefinition {
    pub fn new(schema: DomainSchema, weights: FallbackWeightTable) -> Self {
        Self { schema, weights }
    }

    pub fn kind(&self) -> AnalysisKind {
        self.schema.kind()
    }

    pub fn schema(&self) -> &DomainSchema {
        &self.schema
    }

    pub fn weights(&self) -> &FallbackWeightTable {
        &self.weights
    }

    /// Checks the schema and that the weights fit its discriminant domain.
    pub fn check(&self) -> Result<(), ValidationError> {
        self.schema.check()?;
        self.weights.check(&self.schema)
    }
}

/// Definitions keyed by analysis kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisCatalog {
    definitions: BTreeMap<AnalysisKind, AnalysisDefinition>,
}

static BUILTIN: Lazy<Arc<AnalysisCatalog>> = Lazy::new(|| {
    let mut catalog = AnalysisCatalog::new();
    for kind in AnalysisKind::all() {
        catalog.definitions.insert(*kind, definitions::builtin(*kind));
    }
    Arc::new(catalog)
});

impl AnalysisCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared catalog with the built-in definitions for every kind.
    pub fn builtin() -> Arc<AnalysisCatalog> {
        Arc::clone(&BUILTIN)
    }

    /// Adds or replaces a definition after checking it.
    pub fn with_definition(mut self, definition: AnalysisDefinition) -> Result<Self, ValidationError> {
        definition.check()?;
        self.definitions.insert(definition.kind(), definition);
        Ok(self)
    }

    pub fn get(&self, kind: AnalysisKind) -> Option<&AnalysisDefinition> {
        self.definitions.get(&kind)
    }

    pub fn schema(&self, kind: AnalysisKind) -> Option<&DomainSchema> {
        self.get(kind).map(AnalysisDefinition::schema)
    }

    pub fn weights(&self, kind: AnalysisKind) -> Option<&FallbackWeightTable> {
        self.get(kind).map(AnalysisDefinition::weights)
    }

    /// Kinds with a definition, in canonical order.
    pub fn kinds(&self) -> Vec<AnalysisKind> {
        self.definitions.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
