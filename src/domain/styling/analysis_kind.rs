//! AnalysisKind enum naming the styling analyses the resolver serves.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// The analyses a user can run from the styling screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    ColorSeason,
    BodyShape,
    GarmentAssessment,
}

impl AnalysisKind {
    /// Returns all analysis kinds in canonical order.
    pub fn all() -> &'static [AnalysisKind] {
        &[
            AnalysisKind::ColorSeason,
            AnalysisKind::BodyShape,
            AnalysisKind::GarmentAssessment,
        ]
    }

    /// Returns the snake_case identifier used in storage and config.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::ColorSeason => "color_season",
            AnalysisKind::BodyShape => "body_shape",
            AnalysisKind::GarmentAssessment => "garment_assessment",
        }
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            AnalysisKind::ColorSeason => "Color Season",
            AnalysisKind::BodyShape => "Body Shape",
            AnalysisKind::GarmentAssessment => "Garment Assessment",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for AnalysisKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalysisKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| {
                ValidationError::invalid_format("kind", format!("unknown analysis kind '{}'", s))
            })
    }
}
