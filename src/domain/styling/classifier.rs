//! Deterministic fallback classification from categorical signals.
//!
//! Used whenever the generative path fails. Each signal value contributes a
//! row of integer weights; the highest total wins, with ties broken by the
//! schema's declared category priority. The classifier cannot fail and
//! always names a category.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::request::Signals;
use super::schema::DomainSchema;
use super::text::{normalize_key, normalize_token};
use crate::domain::foundation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
struct WeightRow {
    signal_key: String,
    value_key: String,
    signal: String,
    value: String,
    weights: Vec<(String, i64)>,
}

/// Static mapping `(signal, value) → {category → weight}` for one schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackWeightTable {
    rows: Vec<WeightRow>,
}

impl FallbackWeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the weights contributed when `signal` has `value`.
    ///
    /// Signal names match ignoring case and separators; values match
    /// ignoring case, accents, and punctuation.
    pub fn with_row(mut self, signal: &str, value: &str, weights: &[(&str, i64)]) -> Self {
        self.rows.push(WeightRow {
            signal_key: normalize_key(signal),
            value_key: normalize_token(value),
            signal: signal.to_string(),
            value: value.to_string(),
            weights: weights.iter().map(|(c, w)| (c.to_string(), *w)).collect(),
        });
        self
    }

    /// Weights for a signal value, if the table has a row for it.
    pub fn weights_for(&self, signal: &str, value: &str) -> Option<&[(String, i64)]> {
        let signal_key = normalize_key(signal);
        let value_key = normalize_token(value);
        self.rows
            .iter()
            .find(|row| row.signal_key == signal_key && row.value_key == value_key)
            .map(|row| row.weights.as_slice())
    }

    /// Distinct signal names, in first-declared order.
    pub fn signals(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !names.contains(&row.signal.as_str()) {
                names.push(&row.signal);
            }
        }
        names
    }

    /// Known values of a signal, in declared order.
    pub fn values_for(&self, signal: &str) -> Vec<&str> {
        let signal_key = normalize_key(signal);
        self.rows
            .iter()
            .filter(|row| row.signal_key == signal_key)
            .map(|row| row.value.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Checks every weighted category belongs to the schema's discriminant
    /// domain and no row is declared twice.
    pub fn check(&self, schema: &DomainSchema) -> Result<(), ValidationError> {
        let Some(domain) = schema.discriminant_domain() else {
            return Err(ValidationError::invalid_format(
                schema.discriminant(),
                "discriminant must be a category field",
            ));
        };

        for (index, row) in self.rows.iter().enumerate() {
            if let Some((category, _)) = row.weights.iter().find(|(c, _)| !domain.contains(c)) {
                return Err(ValidationError::invalid_format(
                    format!("{}={}", row.signal, row.value),
                    format!("weight for unknown category '{}'", category),
                ));
            }
            let duplicate = self.rows[..index]
                .iter()
                .any(|earlier| earlier.signal_key == row.signal_key && earlier.value_key == row.value_key);
            if duplicate {
                return Err(ValidationError::invalid_format(
                    format!("{}={}", row.signal, row.value),
                    "row declared twice",
                ));
            }
        }
        Ok(())
    }
}

/// Outcome of a fallback classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: String,
    pub confidence: i64,
    /// Accumulated score per discriminant category.
    pub scores: BTreeMap<String, i64>,
}

impl Classification {
    /// Accumulated score for a category (0 if unknown).
    pub fn score(&self, category: &str) -> i64 {
        self.scores.get(category).copied().unwrap_or(0)
    }

    /// Minimal payload for the validator: discriminant and confidence.
    pub fn to_payload(&self, schema: &DomainSchema) -> Value {
        let mut payload = Map::new();
        payload.insert(
            schema.discriminant().to_string(),
            Value::String(self.category.clone()),
        );
        payload.insert(
            schema.confidence_field().to_string(),
            Value::from(self.confidence),
        );
        Value::Object(payload)
    }
}

/// Rule-based weighted scorer over caller-supplied signals.
pub struct FallbackClassifier;

impl FallbackClassifier {
    /// Scores every discriminant category and picks the winner.
    ///
    /// Pure: identical signals always yield the identical classification.
    pub fn classify(
        signals: &Signals,
        schema: &DomainSchema,
        table: &FallbackWeightTable,
    ) -> Classification {
        let ranked = schema.ranked_categories();
        let mut scores: BTreeMap<String, i64> =
            ranked.iter().map(|category| (category.clone(), 0)).collect();

        for (signal, value) in signals.iter() {
            let Some(weights) = table.weights_for(signal, value) else {
                continue;
            };
            for (category, weight) in weights {
                if let Some(score) = scores.get_mut(category) {
                    *score = score.saturating_add(*weight);
                }
            }
        }

        // Strictly greater keeps the earliest-ranked category on ties.
        let mut winner: Option<(&String, i64)> = None;
        for category in &ranked {
            let score = scores.get(category).copied().unwrap_or(0);
            if winner.map_or(true, |(_, best)| score > best) {
                winner = Some((category, score));
            }
        }

        Classification {
            category: winner.map(|(c, _)| c.clone()).unwrap_or_default(),
            confidence: schema.fallback_confidence(),
            scores,
        }
    }
}
