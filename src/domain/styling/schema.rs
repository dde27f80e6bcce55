//! Declarative field definitions for each analysis kind.
//!
//! A [`DomainSchema`] lists the fields a validated record must carry, their
//! types, bounds, and defaults. The normalizer applies a schema to whatever
//! the generative service returned; the fallback classifier reads the
//! schema's discriminant domain and tie-break priority.

use std::collections::BTreeMap;

use super::analysis_kind::AnalysisKind;
use super::text::normalize_token;
use crate::domain::foundation::ValidationError;

/// Allowed values of a category field plus spelling aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDomain {
    members: Vec<String>,
    /// (alias, canonical member) pairs.
    aliases: Vec<(String, String)>,
}

impl CategoryDomain {
    /// Creates a domain from its canonical members.
    pub fn new(members: &[&str]) -> Self {
        Self {
            members: members.iter().map(|m| m.to_string()).collect(),
            aliases: Vec::new(),
        }
    }

    /// Adds spelling or translation aliases mapping onto canonical members.
    pub fn with_aliases(mut self, aliases: &[(&str, &str)]) -> Self {
        self.aliases
            .extend(aliases.iter().map(|(a, c)| (a.to_string(), c.to_string())));
        self
    }

    /// Canonical members in declaration order.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Returns true if `value` is a canonical member (exact match).
    pub fn contains(&self, value: &str) -> bool {
        self.members.iter().any(|m| m == value)
    }

    /// Resolves a raw value to its canonical member, ignoring case,
    /// diacritics, and separators, and consulting the alias table.
    pub fn resolve(&self, raw: &str) -> Option<&str> {
        let key = normalize_token(raw);
        if key.is_empty() {
            return None;
        }

        if let Some(member) = self.members.iter().find(|m| normalize_token(m) == key) {
            return Some(member.as_str());
        }

        self.aliases
            .iter()
            .find(|(alias, _)| normalize_token(alias) == key)
            .and_then(|(_, canonical)| self.members.iter().find(|m| *m == canonical))
            .map(String::as_str)
    }
}

/// Default for a text-list field when nothing usable was supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListDefault {
    /// The same list regardless of other fields.
    Fixed(Vec<String>),
    /// A list chosen by the resolved value of a category field.
    ByCategory {
        field: String,
        lists: BTreeMap<String, Vec<String>>,
        otherwise: Vec<String>,
    },
}

impl ListDefault {
    /// Creates a fixed default list.
    pub fn fixed(items: &[&str]) -> Self {
        ListDefault::Fixed(items.iter().map(|s| s.to_string()).collect())
    }

    /// Creates a category-derived default list.
    pub fn by_category(field: &str, lists: &[(&str, &[&str])], otherwise: &[&str]) -> Self {
        ListDefault::ByCategory {
            field: field.to_string(),
            lists: lists
                .iter()
                .map(|(category, items)| {
                    (
                        category.to_string(),
                        items.iter().map(|s| s.to_string()).collect(),
                    )
                })
                .collect(),
            otherwise: otherwise.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Resolves the default given the already-resolved category fields.
    pub fn resolve(&self, categories: &BTreeMap<String, String>) -> Vec<String> {
        match self {
            ListDefault::Fixed(items) => items.clone(),
            ListDefault::ByCategory {
                field,
                lists,
                otherwise,
            } => categories
                .get(field)
                .and_then(|category| lists.get(category))
                .unwrap_or(otherwise)
                .clone(),
        }
    }
}

/// Type, bounds, and default of a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Category {
        domain: CategoryDomain,
        default: String,
    },
    Integer {
        min: i64,
        max: i64,
        default: i64,
    },
    Text {
        default: String,
    },
    TextList {
        max_len: usize,
        default: ListDefault,
    },
    /// List of nested records; elements missing a required field are dropped.
    RecordList {
        max_len: usize,
        fields: Vec<FieldSpec>,
        required: Vec<String>,
    },
}

/// A named field in a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn category(name: &str, domain: CategoryDomain, default: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Category {
                domain,
                default: default.to_string(),
            },
        }
    }

    pub fn integer(name: &str, min: i64, max: i64, default: i64) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Integer { min, max, default },
        }
    }

    pub fn text(name: &str, default: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Text {
                default: default.to_string(),
            },
        }
    }

    pub fn text_list(name: &str, max_len: usize, default: ListDefault) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::TextList { max_len, default },
        }
    }

    pub fn record_list(name: &str, max_len: usize, fields: Vec<FieldSpec>, required: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::RecordList {
                max_len,
                fields,
                required: required.iter().map(|r| r.to_string()).collect(),
            },
        }
    }

    /// Short type label used in prompts and diagnostics.
    pub fn type_label(&self) -> &'static str {
        match self.kind {
            FieldKind::Category { .. } => "enum",
            FieldKind::Integer { .. } => "integer",
            FieldKind::Text { .. } => "string",
            FieldKind::TextList { .. } => "list<string>",
            FieldKind::RecordList { .. } => "list<object>",
        }
    }
}

/// Declarative description of one analysis kind.
///
/// Immutable once built; shared across concurrent resolutions via `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSchema {
    kind: AnalysisKind,
    discriminant: String,
    confidence_field: String,
    fields: Vec<FieldSpec>,
    required_signals: Vec<String>,
    requires_visual_input: bool,
    category_priority: Vec<String>,
    fallback_confidence: i64,
}

/// Confidence assigned to deterministic fallback results unless a schema
/// overrides it.
pub const DEFAULT_FALLBACK_CONFIDENCE: i64 = 80;

impl DomainSchema {
    /// Creates an empty schema for `kind` whose primary category lives in
    /// `discriminant` and whose confidence lives in `confidence_field`.
    pub fn new(kind: AnalysisKind, discriminant: &str, confidence_field: &str) -> Self {
        Self {
            kind,
            discriminant: discriminant.to_string(),
            confidence_field: confidence_field.to_string(),
            fields: Vec::new(),
            required_signals: Vec::new(),
            requires_visual_input: false,
            category_priority: Vec::new(),
            fallback_confidence: DEFAULT_FALLBACK_CONFIDENCE,
        }
    }

    /// Appends a field definition.
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Declares signals that must be present before the service is called.
    pub fn with_required_signals(mut self, signals: &[&str]) -> Self {
        self.required_signals = signals.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Declares that an image must accompany the request.
    pub fn requiring_visual_input(mut self) -> Self {
        self.requires_visual_input = true;
        self
    }

    /// Declares the tie-break order for the fallback classifier.
    pub fn with_category_priority(mut self, priority: &[&str]) -> Self {
        self.category_priority = priority.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Overrides the fixed confidence of fallback results.
    pub fn with_fallback_confidence(mut self, confidence: i64) -> Self {
        self.fallback_confidence = confidence;
        self
    }

    pub fn kind(&self) -> AnalysisKind {
        self.kind
    }

    /// Name of the primary category field (also the extraction anchor).
    pub fn discriminant(&self) -> &str {
        &self.discriminant
    }

    pub fn confidence_field(&self) -> &str {
        &self.confidence_field
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn required_signals(&self) -> &[String] {
        &self.required_signals
    }

    pub fn requires_visual_input(&self) -> bool {
        self.requires_visual_input
    }

    pub fn fallback_confidence(&self) -> i64 {
        self.fallback_confidence
    }

    /// Looks up a field by exact name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Domain of the discriminant field.
    pub fn discriminant_domain(&self) -> Option<&CategoryDomain> {
        match self.field(&self.discriminant).map(|f| &f.kind) {
            Some(FieldKind::Category { domain, .. }) => Some(domain),
            _ => None,
        }
    }

    /// Discriminant categories in tie-break order: declared priority first,
    /// then any remaining members in domain order.
    pub fn ranked_categories(&self) -> Vec<String> {
        let Some(domain) = self.discriminant_domain() else {
            return Vec::new();
        };

        let mut ranked: Vec<String> = self
            .category_priority
            .iter()
            .filter(|c| domain.contains(c))
            .cloned()
            .collect();
        for member in domain.members() {
            if !ranked.contains(member) {
                ranked.push(member.clone());
            }
        }
        ranked
    }

    /// Checks the schema is internally consistent.
    ///
    /// Built-in definitions are checked by tests; custom schemas should be
    /// checked once when the catalog is assembled.
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.discriminant_domain().is_none() {
            return Err(ValidationError::invalid_format(
                &self.discriminant,
                "discriminant must be a category field",
            ));
        }

        match self.field(&self.confidence_field).map(|f| &f.kind) {
            Some(FieldKind::Integer { min, max, .. }) => {
                if self.fallback_confidence < *min || self.fallback_confidence > *max {
                    return Err(ValidationError::out_of_range(
                        &self.confidence_field,
                        *min,
                        *max,
                        self.fallback_confidence,
                    ));
                }
            }
            _ => {
                return Err(ValidationError::invalid_format(
                    &self.confidence_field,
                    "confidence field must be an integer field",
                ))
            }
        }

        for field in &self.fields {
            check_field(field)?;
        }

        if let Some(domain) = self.discriminant_domain() {
            if let Some(unknown) = self.category_priority.iter().find(|c| !domain.contains(c)) {
                return Err(ValidationError::invalid_format(
                    "category_priority",
                    format!("'{}' is not a member of '{}'", unknown, self.discriminant),
                ));
            }
        }

        Ok(())
    }
}

fn check_field(field: &FieldSpec) -> Result<(), ValidationError> {
    match &field.kind {
        FieldKind::Category { domain, default } => {
            if !domain.contains(default) {
                return Err(ValidationError::invalid_format(
                    &field.name,
                    format!("default '{}' is not a member", default),
                ));
            }
            if let Some((alias, _)) = domain.aliases.iter().find(|(_, c)| !domain.contains(c)) {
                return Err(ValidationError::invalid_format(
                    &field.name,
                    format!("alias '{}' points outside the domain", alias),
                ));
            }
        }
        FieldKind::Integer { min, max, default } => {
            if min > max || default < min || default > max {
                return Err(ValidationError::out_of_range(&field.name, *min, *max, *default));
            }
        }
        FieldKind::Text { default } => {
            if default.trim().is_empty() {
                return Err(ValidationError::empty_field(&field.name));
            }
        }
        FieldKind::TextList { max_len, default } => {
            let too_long = match default {
                ListDefault::Fixed(items) => items.len() > *max_len,
                ListDefault::ByCategory {
                    lists, otherwise, ..
                } => otherwise.len() > *max_len || lists.values().any(|l| l.len() > *max_len),
            };
            if too_long || *max_len == 0 {
                return Err(ValidationError::invalid_format(
                    &field.name,
                    "default list must fit within max length",
                ));
            }
        }
        FieldKind::RecordList {
            fields, required, ..
        } => {
            if let Some(missing) = required.iter().find(|r| !fields.iter().any(|f| &f.name == *r)) {
                return Err(ValidationError::invalid_format(
                    &field.name,
                    format!("required field '{}' is not defined", missing),
                ));
            }
            for sub in fields {
                if matches!(sub.kind, FieldKind::RecordList { .. }) {
                    return Err(ValidationError::invalid_format(
                        &sub.name,
                        "record lists cannot nest",
                    ));
                }
                check_field(sub)?;
            }
        }
    }
    Ok(())
}
