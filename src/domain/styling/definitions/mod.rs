//! Built-in analysis definitions: one schema and weight table per kind.

pub mod body_shape;
pub mod color_season;
pub mod garment;

use super::analysis_kind::AnalysisKind;
use super::catalog::AnalysisDefinition;

/// Returns the built-in definition for a kind.
pub fn builtin(kind: AnalysisKind) -> AnalysisDefinition {
    match kind {
        AnalysisKind::ColorSeason => color_season::definition(),
        AnalysisKind::BodyShape => body_shape::definition(),
        AnalysisKind::GarmentAssessment => garment::definition(),
    }
}
