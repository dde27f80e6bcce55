//! Resolver configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::styling::{RefusalDetector, DEFAULT_MIN_RESPONSE_LENGTH};

/// Refusal detector tuning
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// Responses shorter than this (in characters) count as failures
    #[serde(default = "default_min_response_length")]
    pub min_response_length: usize,

    /// Extra refusal phrases (comma-separated), added to the built-in set
    pub extra_refusal_phrases: Option<String>,
}

impl ResolverConfig {
    /// Get extra refusal phrases as a vector
    pub fn extra_refusal_phrases_list(&self) -> Vec<String> {
        self.extra_refusal_phrases
            .as_ref()
            .map(|s| {
                s.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Builds the detector described by this configuration
    pub fn detector(&self) -> RefusalDetector {
        RefusalDetector::new()
            .with_min_length(self.min_response_length)
            .with_additional_phrases(self.extra_refusal_phrases_list())
    }

    /// Validate resolver configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_response_length == 0 || self.min_response_length > 1000 {
            return Err(ValidationError::InvalidMinResponseLength);
        }
        Ok(())
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_response_length: default_min_response_length(),
            extra_refusal_phrases: None,
        }
    }
}

fn default_min_response_length() -> usize {
    DEFAULT_MIN_RESPONSE_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_detector() {
        let config = ResolverConfig::default();
        assert_eq!(config.min_response_length, 30);
        assert_eq!(config.detector(), RefusalDetector::new());
    }

    #[test]
    fn test_extra_phrases_are_split_and_trimmed() {
        let config = ResolverConfig {
            extra_refusal_phrases: Some(" não sei , , unable to see ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.extra_refusal_phrases_list(), vec!["não sei", "unable to see"]);

        let detector = config.detector();
        assert!(detector.is_failure(r#"Unable to see the photo clearly {"season": "Winter"}"#));
    }

    #[test]
    fn test_validation_bounds() {
        let zero = ResolverConfig {
            min_response_length: 0,
            ..Default::default()
        };
        assert_eq!(zero.validate(), Err(ValidationError::InvalidMinResponseLength));
        assert!(ResolverConfig::default().validate().is_ok());
    }
}
