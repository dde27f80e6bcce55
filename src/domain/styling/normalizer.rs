//! Validator/normalizer: applies a [`DomainSchema`] to an untyped payload.
//!
//! [`validate`] never fails. Whatever it is given, the result carries every
//! schema field with a typed, in-bounds value, and running it again over its
//! own JSON rendering yields the same fields.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::fields::{FieldValue, Record, ValidatedFields};
use super::schema::{CategoryDomain, DomainSchema, FieldKind, FieldSpec};
use super::text::normalize_key;

/// Produces a complete, schema-conformant record from `payload`.
///
/// Non-object payloads are treated as empty objects, so every field takes
/// its default.
pub fn validate(payload: &Value, schema: &DomainSchema) -> ValidatedFields {
    let empty = Map::new();
    let object = payload.as_object().unwrap_or(&empty);

    let mut validated = ValidatedFields::new();
    for (name, value) in validate_object(object, schema.fields()) {
        validated.insert(name, value);
    }
    validated
}

/// Validates one object against a list of field specs.
///
/// Category fields are resolved first so list defaults that depend on a
/// category see the resolved value.
fn validate_object(object: &Map<String, Value>, fields: &[FieldSpec]) -> Record {
    let mut record = Record::new();
    let mut categories = BTreeMap::new();

    for spec in fields {
        if let FieldKind::Category { domain, default } = &spec.kind {
            let value = normalize_category(lookup(object, &spec.name), domain, default);
            categories.insert(spec.name.clone(), value.clone());
            record.insert(spec.name.clone(), FieldValue::Category(value));
        }
    }

    for spec in fields {
        let raw = lookup(object, &spec.name);
        let value = match &spec.kind {
            FieldKind::Category { .. } => continue,
            FieldKind::Integer { min, max, default } => {
                FieldValue::Integer(coerce_integer(raw).map_or(*default, |n| n.clamp(*min, *max)))
            }
            FieldKind::Text { default } => {
                FieldValue::Text(non_empty_text(raw).unwrap_or_else(|| default.clone()))
            }
            FieldKind::TextList { max_len, default } => {
                let mut items = text_items(raw);
                items.truncate(*max_len);
                if items.is_empty() {
                    items = default.resolve(&categories);
                }
                FieldValue::TextList(items)
            }
            FieldKind::RecordList {
                max_len,
                fields,
                required,
            } => FieldValue::Records(validate_records(raw, fields, required, *max_len)),
        };
        record.insert(spec.name.clone(), value);
    }

    record
}

fn validate_records(
    raw: Option<&Value>,
    fields: &[FieldSpec],
    required: &[String],
    max_len: usize,
) -> Vec<Record> {
    let Some(Value::Array(elements)) = raw else {
        return Vec::new();
    };

    elements
        .iter()
        .filter_map(Value::as_object)
        .filter(|element| {
            required.iter().all(|name| {
                fields
                    .iter()
                    .find(|spec| &spec.name == name)
                    .is_some_and(|spec| is_usable(lookup(element, name), &spec.kind))
            })
        })
        .take(max_len)
        .map(|element| validate_object(element, fields))
        .collect()
}

/// True if `raw` would be kept as-is (modulo canonicalization) rather than
/// replaced by a default.
fn is_usable(raw: Option<&Value>, kind: &FieldKind) -> bool {
    match kind {
        FieldKind::Category { domain, .. } => raw
            .and_then(Value::as_str)
            .is_some_and(|s| domain.resolve(s).is_some()),
        FieldKind::Integer { .. } => coerce_integer(raw).is_some(),
        FieldKind::Text { .. } => non_empty_text(raw).is_some(),
        FieldKind::TextList { .. } => !text_items(raw).is_empty(),
        FieldKind::RecordList { .. } => matches!(raw, Some(Value::Array(items)) if !items.is_empty()),
    }
}

/// Finds a field by exact name, then by separator/case-insensitive name.
/// `null` reads as absent.
fn lookup<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    let found = object.get(name).or_else(|| {
        let wanted = normalize_key(name);
        object
            .iter()
            .find(|(key, _)| normalize_key(key) == wanted)
            .map(|(_, value)| value)
    });
    found.filter(|value| !value.is_null())
}

fn normalize_category(raw: Option<&Value>, domain: &CategoryDomain, default: &str) -> String {
    raw.and_then(Value::as_str)
        .and_then(|s| domain.resolve(s))
        .unwrap_or(default)
        .to_string()
}

/// Integers pass through; floats are rounded; strings such as `"85"`,
/// `" 92.4 "` or `"85%"` are parsed.
fn coerce_integer(raw: Option<&Value>) -> Option<i64> {
    match raw? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(round_finite)),
        Value::String(s) => {
            let trimmed = s.trim().trim_end_matches('%').trim_end();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(round_finite))
        }
        _ => None,
    }
}

fn round_finite(f: f64) -> Option<i64> {
    // `as` saturates at the i64 bounds, which the clamp then handles.
    f.is_finite().then(|| f.round() as i64)
}

fn non_empty_text(raw: Option<&Value>) -> Option<String> {
    raw.and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// String elements of a list, trimmed, blanks dropped. A lone string counts
/// as a one-element list.
fn text_items(raw: Option<&Value>) -> Vec<String> {
    match raw {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::styling::analysis_kind::AnalysisKind;
    use crate::domain::styling::schema::ListDefault;
    use proptest::prelude::*;
    use serde_json::json;

    const WARM: &[&str] = &["coral", "peach"];
    const COOL: &[&str] = &["lavender"];

    fn schema() -> DomainSchema {
        DomainSchema::new(AnalysisKind::ColorSeason, "tone", "confidence")
            .with_field(FieldSpec::category(
                "tone",
                CategoryDomain::new(&["Warm", "Cool"]).with_aliases(&[("Quente", "Warm")]),
                "Cool",
            ))
            .with_field(FieldSpec::integer("confidence", 70, 100, 80))
            .with_field(FieldSpec::text("summary", "No summary."))
            .with_field(FieldSpec::text_list(
                "palette",
                3,
                ListDefault::by_category("tone", &[("Warm", WARM), ("Cool", COOL)], &[]),
            ))
            .with_field(FieldSpec::record_list(
                "items",
                2,
                vec![
                    FieldSpec::text("name", "item"),
                    FieldSpec::integer("score", 0, 10, 5),
                ],
                &["name"],
            ))
    }

    fn validated(payload: Value) -> ValidatedFields {
        validate(&payload, &schema())
    }

    mod categories {
        use super::*;

        #[test]
        fn canonicalizes_member_spelling() {
            assert_eq!(validated(json!({"tone": "WARM"})).category("tone"), Some("Warm"));
        }

        #[test]
        fn resolves_alias() {
            assert_eq!(validated(json!({"tone": "quente"})).category("tone"), Some("Warm"));
        }

        #[test]
        fn unknown_value_takes_default() {
            assert_eq!(validated(json!({"tone": "Purple"})).category("tone"), Some("Cool"));
            assert_eq!(validated(json!({"tone": 7})).category("tone"), Some("Cool"));
        }
    }

    mod integers {
        use super::*;

        #[test]
        fn clamps_above_max() {
            assert_eq!(validated(json!({"confidence": 150})).integer("confidence"), Some(100));
        }

        #[test]
        fn clamps_below_min() {
            assert_eq!(validated(json!({"confidence": -3})).integer("confidence"), Some(70));
        }

        #[test]
        fn coerces_floats_and_strings() {
            assert_eq!(validated(json!({"confidence": 84.6})).integer("confidence"), Some(85));
            assert_eq!(validated(json!({"confidence": "91"})).integer("confidence"), Some(91));
            assert_eq!(validated(json!({"confidence": " 88% "})).integer("confidence"), Some(88));
        }

        #[test]
        fn non_numeric_takes_default() {
            assert_eq!(validated(json!({"confidence": "high"})).integer("confidence"), Some(80));
            assert_eq!(validated(json!({"confidence": true})).integer("confidence"), Some(80));
            assert_eq!(validated(json!({"confidence": null})).integer("confidence"), Some(80));
        }
    }

    mod text_and_lists {
        use super::*;

        #[test]
        fn blank_text_takes_default() {
            assert_eq!(validated(json!({"summary": "   "})).text("summary"), Some("No summary."));
            assert_eq!(validated(json!({"summary": " Soft. "})).text("summary"), Some("Soft."));
        }

        #[test]
        fn list_keeps_strings_and_truncates() {
            let fields = validated(json!({"palette": ["a", 3, " ", "b", "c", "d"]}));
            assert_eq!(
                fields.text_list("palette"),
                Some(&["a".to_string(), "b".to_string(), "c".to_string()][..])
            );
        }

        #[test]
        fn empty_list_takes_category_default() {
            let fields = validated(json!({"tone": "Warm", "palette": []}));
            assert_eq!(
                fields.text_list("palette"),
                Some(&["coral".to_string(), "peach".to_string()][..])
            );
        }

        #[test]
        fn single_string_is_one_item() {
            let fields = validated(json!({"palette": "navy"}));
            assert_eq!(fields.text_list("palette"), Some(&["navy".to_string()][..]));
        }
    }

    mod records {
        use super::*;

        #[test]
        fn drops_elements_missing_required_field() {
            let fields = validated(json!({
                "items": [{"score": 9}, {"name": "blazer", "score": 12}, "junk"]
            }));
            let records = fields.records("items").unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].get("name"), Some(&FieldValue::Text("blazer".into())));
            assert_eq!(records[0].get("score"), Some(&FieldValue::Integer(10)));
        }

        #[test]
        fn fills_optional_sub_fields_and_truncates() {
            let fields = validated(json!({
                "items": [{"name": "a"}, {"name": "b"}, {"name": "c"}]
            }));
            let records = fields.records("items").unwrap();
            assert_eq!(records.len(), 2);
            assert_eq!(records[1].get("score"), Some(&FieldValue::Integer(5)));
        }

        #[test]
        fn missing_list_is_empty() {
            assert_eq!(validated(json!({})).records("items").map(<[_]>::len), Some(0));
        }
    }

    mod shape {
        use super::*;

        #[test]
        fn every_field_is_present_for_non_object_payload() {
            let fields = validated(json!("not an object"));
            assert_eq!(fields.len(), schema().fields().len());
        }

        #[test]
        fn lookup_ignores_case_and_separators() {
            let schema = DomainSchema::new(AnalysisKind::BodyShape, "body_shape", "confidence")
                .with_field(FieldSpec::category(
                    "body_shape",
                    CategoryDomain::new(&["Hourglass", "Rectangle"]),
                    "Rectangle",
                ))
                .with_field(FieldSpec::integer("confidence", 70, 100, 80));
            let fields = validate(&json!({"bodyShape": "hourglass"}), &schema);
            assert_eq!(fields.category("body_shape"), Some("Hourglass"));
        }

        #[test]
        fn scenario_e_confidence_is_clamped_to_max() {
            let fields = validated(json!({"tone": "Warm", "confidence": 150}));
            assert_eq!(fields.integer("confidence"), Some(100));
        }
    }

    fn arbitrary_scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            (-1.0e6f64..1.0e6).prop_map(Value::from),
            "[ a-zA-Z0-9%.]{0,12}".prop_map(Value::from),
            prop::sample::select(vec!["Warm", "cool", "Quente", "Purple"]).prop_map(Value::from),
        ]
    }

    fn arbitrary_payload() -> impl Strategy<Value = Value> {
        let item = prop::collection::btree_map(
            prop::sample::select(vec!["name", "score", "extra"]),
            arbitrary_scalar(),
            0..3,
        )
        .prop_map(|m| {
            Value::Object(m.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
        });

        (
            prop::option::of(arbitrary_scalar()),
            prop::option::of(arbitrary_scalar()),
            prop::option::of(arbitrary_scalar()),
            prop::option::of(prop::collection::vec(arbitrary_scalar(), 0..6)),
            prop::option::of(prop::collection::vec(item, 0..4)),
        )
            .prop_map(|(tone, confidence, summary, palette, items)| {
                let mut object = Map::new();
                if let Some(v) = tone {
                    object.insert("tone".into(), v);
                }
                if let Some(v) = confidence {
                    object.insert("confidence".into(), v);
                }
                if let Some(v) = summary {
                    object.insert("summary".into(), v);
                }
                if let Some(v) = palette {
                    object.insert("palette".into(), Value::Array(v));
                }
                if let Some(v) = items {
                    object.insert("items".into(), Value::Array(v));
                }
                Value::Object(object)
            })
    }

    proptest! {
        #[test]
        fn validate_is_idempotent(payload in arbitrary_payload()) {
            let schema = schema();
            let once = validate(&payload, &schema);
            let twice = validate(&once.to_json(), &schema);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn integers_always_within_bounds(payload in arbitrary_payload()) {
            let fields = validate(&payload, &schema());
            let confidence = fields.integer("confidence").unwrap();
            prop_assert!((70..=100).contains(&confidence));
            for record in fields.records("items").unwrap() {
                match record.get("score") {
                    Some(FieldValue::Integer(score)) => prop_assert!((0..=10).contains(score)),
                    other => prop_assert!(false, "unexpected score {:?}", other),
                }
            }
        }

        #[test]
        fn output_is_always_complete(payload in arbitrary_payload()) {
            prop_assert_eq!(validate(&payload, &schema()).len(), 5);
        }
    }
}
