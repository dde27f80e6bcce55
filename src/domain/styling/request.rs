//! Inference requests: the caller-supplied signals and optional image.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::analysis_kind::AnalysisKind;
use super::text::normalize_key;

/// Named categorical inputs from the caller's form state
/// (e.g. `skinTone → "Muito clara"`). Ordered so iteration is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signals(BTreeMap<String, String>);

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a signal.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Returns the signal value if present and not blank.
    ///
    /// Lookup is by exact name, then by normalized name, so `skin_tone`
    /// answers for `skinTone` the same way the weight tables match it.
    pub fn get(&self, name: &str) -> Option<&str> {
        let found = self.0.get(name).or_else(|| {
            let wanted = normalize_key(name);
            self.0
                .iter()
                .find(|(key, _)| normalize_key(key) == wanted)
                .map(|(_, value)| value)
        });
        found
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Signals {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Reference to a captured photo: a URL or a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageReference(String);

impl ImageReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Builds a `data:` URI from base64-encoded bytes.
    pub fn from_base64(mime_type: &str, base64: &str) -> Self {
        Self(format!("data:{};base64,{}", mime_type, base64))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One user-initiated analysis. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceRequest {
    pub kind: AnalysisKind,
    #[serde(default)]
    pub signals: Signals,
    #[serde(default)]
    pub image: Option<ImageReference>,
}

impl InferenceRequest {
    /// Creates a request without signals or image.
    pub fn new(kind: AnalysisKind) -> Self {
        Self {
            kind,
            signals: Signals::new(),
            image: None,
        }
    }

    /// Adds a signal.
    pub fn with_signal(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.signals = self.signals.with(name, value);
        self
    }

    /// Replaces all signals.
    pub fn with_signals(mut self, signals: Signals) -> Self {
        self.signals = signals;
        self
    }

    /// Attaches a photo.
    pub fn with_image(mut self, image: ImageReference) -> Self {
        self.image = Some(image);
        self
    }

    pub fn has_visual_input(&self) -> bool {
        self.image.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_signals_read_as_absent() {
        let signals = Signals::new().with("eyeColor", "   ");
        assert_eq!(signals.get("eyeColor"), None);
    }

    #[test]
    fn lookup_tolerates_separator_and_case_differences() {
        let signals = Signals::new().with("skin_tone", "Clara").with("Eye Color", "Azul");
        assert_eq!(signals.get("skinTone"), Some("Clara"));
        assert_eq!(signals.get("eyeColor"), Some("Azul"));
        assert_eq!(signals.get("hairColor"), None);
    }

    #[test]
    fn exact_name_wins_over_normalized_match() {
        let signals = Signals::new().with("skin_tone", "Morena").with("skinTone", "Clara");
        assert_eq!(signals.get("skinTone"), Some("Clara"));
    }

    #[test]
    fn signals_iterate_in_name_order() {
        let signals: Signals = vec![("skinTone", "Clara"), ("eyeColor", "Azul")]
            .into_iter()
            .collect();
        let names: Vec<&str> = signals.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["eyeColor", "skinTone"]);
    }

    #[test]
    fn visual_input_follows_image() {
        let request = InferenceRequest::new(AnalysisKind::GarmentAssessment);
        assert!(!request.has_visual_input());

        let request = request.with_image(ImageReference::from_base64("image/jpeg", "AAAA"));
        assert!(request.has_visual_input());
        assert_eq!(
            request.image.as_ref().map(ImageReference::as_str),
            Some("data:image/jpeg;base64,AAAA")
        );
    }

    #[test]
    fn deserializes_without_optional_parts() {
        let request: InferenceRequest =
            serde_json::from_str(r#"{"kind": "body_shape"}"#).unwrap();
        assert_eq!(request.kind, AnalysisKind::BodyShape);
        assert!(request.signals.is_empty());
        assert!(request.image.is_none());
    }
}
