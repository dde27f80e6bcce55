//! Refusal and degenerate-output detection.
//!
//! Runs before extraction: a response that is too short, carries a refusal
//! phrase, or has no braces at all is treated as a service failure even if
//! some payload-looking text happens to be present.

use std::fmt;

/// Minimum response length in characters. A complete one-field payload with
/// a short preamble is already longer than this.
pub const DEFAULT_MIN_RESPONSE_LENGTH: usize = 30;

/// Built-in refusal phrases (lowercase, straight apostrophes).
pub const DEFAULT_REFUSAL_PHRASES: &[&str] = &[
    // English
    "i can't",
    "i cannot",
    "i can not",
    "i'm not able",
    "i am not able",
    "i'm unable",
    "i am unable",
    "i'm sorry",
    "i am sorry",
    "cannot provide",
    "can't provide",
    "cannot help with",
    "against policy",
    "against my policy",
    "not able to analyze",
    "unable to analyze",
    "as an ai",
    // Portuguese
    "não posso",
    "nao posso",
    "não consigo",
    "nao consigo",
    "não é possível",
    "desculpe",
    "sinto muito",
    "não sou capaz",
    // Spanish
    "no puedo",
    "lo siento",
    "no es posible",
];

/// Why a response was classified as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureSignal {
    TooShort { length: usize, minimum: usize },
    RefusalPhrase(String),
    NoStructure,
}

impl fmt::Display for FailureSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureSignal::TooShort { length, minimum } => {
                write!(f, "response too short ({} < {} chars)", length, minimum)
            }
            FailureSignal::RefusalPhrase(phrase) => write!(f, "refusal phrase '{}'", phrase),
            FailureSignal::NoStructure => write!(f, "no structural delimiters"),
        }
    }
}

/// Scans raw service text for refusal or degenerate-output signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefusalDetector {
    min_length: usize,
    /// Stored folded for case-insensitive matching.
    phrases: Vec<String>,
}

impl Default for RefusalDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl RefusalDetector {
    /// Creates a detector with the built-in threshold and phrase set.
    pub fn new() -> Self {
        Self {
            min_length: DEFAULT_MIN_RESPONSE_LENGTH,
            phrases: DEFAULT_REFUSAL_PHRASES.iter().map(|p| fold(p)).collect(),
        }
    }

    /// Sets the minimum response length in characters.
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Adds phrases on top of the current set. Blank entries are ignored.
    pub fn with_additional_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for phrase in phrases {
            let folded = fold(phrase.as_ref().trim());
            if !folded.is_empty() && !self.phrases.contains(&folded) {
                self.phrases.push(folded);
            }
        }
        self
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Returns true if the text cannot hold a usable payload.
    pub fn is_failure(&self, raw: &str) -> bool {
        self.detect(raw).is_some()
    }

    /// Returns the first failure signature found, if any.
    pub fn detect(&self, raw: &str) -> Option<FailureSignal> {
        let length = raw.trim().chars().count();
        if length < self.min_length {
            return Some(FailureSignal::TooShort {
                length,
                minimum: self.min_length,
            });
        }

        let folded = fold(raw);
        if let Some(phrase) = self.phrases.iter().find(|p| folded.contains(p.as_str())) {
            return Some(FailureSignal::RefusalPhrase(phrase.clone()));
        }

        if !raw.contains('{') || !raw.contains('}') {
            return Some(FailureSignal::NoStructure);
        }

        None
    }
}

/// Lowercases and normalizes typographic apostrophes.
fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            '\u{2019}' | '\u{2018}' | '\u{02bc}' | '`' => '\'',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"Here you go: {"season": "Summer", "confidence": 88}"#;

    #[test]
    fn accepts_structured_response() {
        assert!(!RefusalDetector::new().is_failure(VALID));
    }

    #[test]
    fn flags_short_response() {
        let detector = RefusalDetector::new();
        assert_eq!(
            detector.detect("{}"),
            Some(FailureSignal::TooShort {
                length: 2,
                minimum: DEFAULT_MIN_RESPONSE_LENGTH
            })
        );
    }

    #[test]
    fn minimum_length_is_configurable() {
        let detector = RefusalDetector::new().with_min_length(500);
        assert!(detector.is_failure(VALID));
    }

    #[test]
    fn flags_english_refusal_case_insensitively() {
        let detector = RefusalDetector::new();
        let text = "I'M SORRY, I cannot analyze this image. {\"season\": \"Summer\"}";
        assert!(matches!(
            detector.detect(text),
            Some(FailureSignal::RefusalPhrase(_))
        ));
    }

    #[test]
    fn flags_refusal_with_typographic_apostrophe() {
        let detector = RefusalDetector::new();
        let text = "Unfortunately I can\u{2019}t help with that request, sorry about it.";
        assert_eq!(
            detector.detect(text),
            Some(FailureSignal::RefusalPhrase("i can't".to_string()))
        );
    }

    #[test]
    fn flags_portuguese_refusal() {
        let detector = RefusalDetector::new();
        let text = "Infelizmente não posso analisar esta imagem {\"season\": \"Winter\"}";
        assert!(detector.is_failure(text));
    }

    #[test]
    fn flags_text_without_braces() {
        let detector = RefusalDetector::new();
        let text = "Your season is probably Summer, with cool and soft tones overall.";
        assert_eq!(detector.detect(text), Some(FailureSignal::NoStructure));
    }

    #[test]
    fn flags_text_with_only_opening_brace() {
        let detector = RefusalDetector::new();
        let text = "Result follows { season: Summer, confidence: 90 and then it stopped";
        assert_eq!(detector.detect(text), Some(FailureSignal::NoStructure));
    }

    #[test]
    fn additional_phrases_extend_the_set() {
        let detector = RefusalDetector::new().with_additional_phrases(["Policy Violation", "  "]);
        assert_eq!(detector.phrases().len(), DEFAULT_REFUSAL_PHRASES.len() + 1);
        let text = "policy violation detected {\"season\": \"Summer\", \"confidence\": 90}";
        assert!(detector.is_failure(text));
    }

    #[test]
    fn scenario_b_sorry_message_is_a_failure() {
        let detector = RefusalDetector::new();
        assert!(detector.is_failure("I'm sorry, I cannot analyze this image."));
    }
}
