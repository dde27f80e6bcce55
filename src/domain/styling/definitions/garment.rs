//! Quick analysis of a single garment photo against the user's profile.
//!
//! Requires an image. The payload carries an overall suitability verdict and
//! a per-garment list when the photo shows more than one piece.

use crate::domain::styling::analysis_kind::AnalysisKind;
use crate::domain::styling::catalog::AnalysisDefinition;
use crate::domain::styling::classifier::FallbackWeightTable;
use crate::domain::styling::schema::{CategoryDomain, DomainSchema, FieldSpec, ListDefault};

pub const SUITABILITY: &str = "suitability";
pub const CONFIDENCE: &str = "confidence";
pub const GARMENT_TYPE: &str = "garment_type";
pub const COLORS: &str = "colors";
pub const STYLING_TIPS: &str = "styling_tips";
pub const GARMENTS: &str = "garments";
pub const SUMMARY: &str = "summary";

pub const GARMENT: &str = "garment";
pub const SCORE: &str = "score";
pub const NOTE: &str = "note";

pub const PALETTE_MATCH: &str = "paletteMatch";
pub const SHAPE_MATCH: &str = "shapeMatch";

const EXCELLENT_TIPS: &[&str] = &["wear it as the focal piece", "pair with neutrals from your palette"];
const GOOD_TIPS: &[&str] = &["balance it with a piece in your best color"];
const FAIR_TIPS: &[&str] = &["keep it away from your face", "use accessories in your palette"];
const POOR_TIPS: &[&str] = &["consider a version in a color from your palette"];

fn suitability() -> CategoryDomain {
    CategoryDomain::new(&["Excellent", "Good", "Fair", "Poor"]).with_aliases(&[
        ("Excelente", "Excellent"),
        ("Ótimo", "Excellent"),
        ("Bom", "Good"),
        ("Boa", "Good"),
        ("Regular", "Fair"),
        ("Ruim", "Poor"),
    ])
}

pub fn schema() -> DomainSchema {
    DomainSchema::new(AnalysisKind::GarmentAssessment, SUITABILITY, CONFIDENCE)
        .with_field(FieldSpec::category(SUITABILITY, suitability(), "Fair"))
        .with_field(FieldSpec::integer(CONFIDENCE, 70, 100, 80))
        .with_field(FieldSpec::text(GARMENT_TYPE, "garment"))
        .with_field(FieldSpec::text_list(COLORS, 5, ListDefault::fixed(&[])))
        .with_field(FieldSpec::text_list(
            STYLING_TIPS,
            5,
            ListDefault::by_category(
                SUITABILITY,
                &[
                    ("Excellent", EXCELLENT_TIPS),
                    ("Good", GOOD_TIPS),
                    ("Fair", FAIR_TIPS),
                    ("Poor", POOR_TIPS),
                ],
                FAIR_TIPS,
            ),
        ))
        .with_field(FieldSpec::record_list(
            GARMENTS,
            10,
            vec![
                FieldSpec::text(GARMENT, "garment"),
                FieldSpec::integer(SCORE, 0, 10, 5),
                FieldSpec::text(NOTE, "No notes."),
            ],
            &[GARMENT],
        ))
        .with_field(FieldSpec::text(
            SUMMARY,
            "Assessment based on how the piece relates to your saved profile.",
        ))
        .requiring_visual_input()
        .with_category_priority(&["Good", "Fair", "Excellent", "Poor"])
}

pub fn weights() -> FallbackWeightTable {
    FallbackWeightTable::new()
        .with_row(PALETTE_MATCH, "Sim", &[("Excellent", 2), ("Good", 1)])
        .with_row(PALETTE_MATCH, "Parcial", &[("Good", 2), ("Fair", 1)])
        .with_row(PALETTE_MATCH, "Não", &[("Poor", 2), ("Fair", 1)])
        .with_row(SHAPE_MATCH, "Sim", &[("Excellent", 1), ("Good", 1)])
        .with_row(SHAPE_MATCH, "Parcial", &[("Fair", 1)])
        .with_row(SHAPE_MATCH, "Não", &[("Poor", 1)])
}

pub fn definition() -> AnalysisDefinition {
    AnalysisDefinition::new(schema(), weights())
}
