//! Body shape analysis.

use crate::domain::styling::analysis_kind::AnalysisKind;
use crate::domain::styling::catalog::AnalysisDefinition;
use crate::domain::styling::classifier::FallbackWeightTable;
use crate::domain::styling::schema::{CategoryDomain, DomainSchema, FieldSpec, ListDefault};

pub const BODY_SHAPE: &str = "body_shape";
pub const CONFIDENCE: &str = "confidence";
pub const RECOMMENDATIONS: &str = "recommendations";
pub const AVOID: &str = "avoid";
pub const SUMMARY: &str = "summary";

pub const SHOULDER_WIDTH: &str = "shoulderWidth";
pub const WAIST_DEFINITION: &str = "waistDefinition";
pub const WEIGHT_DISTRIBUTION: &str = "weightDistribution";

const HOURGLASS_TIPS: &[&str] = &["wrap dresses", "belted waists", "fitted blazers", "pencil skirts"];
const PEAR_TIPS: &[&str] = &["A-line skirts", "boat necklines", "structured shoulders", "dark bottoms"];
const APPLE_TIPS: &[&str] = &["empire waists", "V-necklines", "flowing tunics", "straight-leg trousers"];
const RECTANGLE_TIPS: &[&str] = &["peplum tops", "belts to mark the waist", "layered outfits", "ruffled details"];
const INVERTED_TRIANGLE_TIPS: &[&str] = &["wide-leg trousers", "A-line skirts", "V-necklines", "simple shoulders"];

const HOURGLASS_AVOID: &[&str] = &["boxy cuts", "drop waists"];
const PEAR_AVOID: &[&str] = &["skinny light-colored jeans", "hip pockets"];
const APPLE_AVOID: &[&str] = &["tight waistbands", "cropped tops"];
const RECTANGLE_AVOID: &[&str] = &["straight shapeless dresses"];
const INVERTED_TRIANGLE_AVOID: &[&str] = &["shoulder pads", "puff sleeves", "halter necks"];

fn shapes() -> CategoryDomain {
    CategoryDomain::new(&["Hourglass", "Pear", "Apple", "Rectangle", "Inverted Triangle"])
        .with_aliases(&[
            ("Ampulheta", "Hourglass"),
            ("Violão", "Hourglass"),
            ("Pera", "Pear"),
            ("Triângulo", "Pear"),
            ("Triangle", "Pear"),
            ("Maçã", "Apple"),
            ("Oval", "Apple"),
            ("Retângulo", "Rectangle"),
            ("Retangular", "Rectangle"),
            ("Triângulo Invertido", "Inverted Triangle"),
        ])
}

pub fn schema() -> DomainSchema {
    DomainSchema::new(AnalysisKind::BodyShape, BODY_SHAPE, CONFIDENCE)
        .with_field(FieldSpec::category(BODY_SHAPE, shapes(), "Rectangle"))
        .with_field(FieldSpec::integer(CONFIDENCE, 70, 100, 80))
        .with_field(FieldSpec::text_list(
            RECOMMENDATIONS,
            6,
            ListDefault::by_category(
                BODY_SHAPE,
                &[
                    ("Hourglass", HOURGLASS_TIPS),
                    ("Pear", PEAR_TIPS),
                    ("Apple", APPLE_TIPS),
                    ("Rectangle", RECTANGLE_TIPS),
                    ("Inverted Triangle", INVERTED_TRIANGLE_TIPS),
                ],
                RECTANGLE_TIPS,
            ),
        ))
        .with_field(FieldSpec::text_list(
            AVOID,
            5,
            ListDefault::by_category(
                BODY_SHAPE,
                &[
                    ("Hourglass", HOURGLASS_AVOID),
                    ("Pear", PEAR_AVOID),
                    ("Apple", APPLE_AVOID),
                    ("Rectangle", RECTANGLE_AVOID),
                    ("Inverted Triangle", INVERTED_TRIANGLE_AVOID),
                ],
                &[],
            ),
        ))
        .with_field(FieldSpec::text(
            SUMMARY,
            "Shape estimated from your shoulder, waist, and hip proportions.",
        ))
        .with_required_signals(&[SHOULDER_WIDTH, WAIST_DEFINITION])
        .with_category_priority(&["Hourglass", "Rectangle", "Pear", "Apple", "Inverted Triangle"])
}

pub fn weights() -> FallbackWeightTable {
    FallbackWeightTable::new()
        .with_row(SHOULDER_WIDTH, "Mais largos que o quadril", &[("Inverted Triangle", 3)])
        .with_row(SHOULDER_WIDTH, "Alinhados com o quadril", &[("Hourglass", 1), ("Rectangle", 2)])
        .with_row(SHOULDER_WIDTH, "Mais estreitos que o quadril", &[("Pear", 3)])
        .with_row(WAIST_DEFINITION, "Bem definida", &[("Hourglass", 3)])
        .with_row(WAIST_DEFINITION, "Pouco definida", &[("Rectangle", 2), ("Pear", 1)])
        .with_row(WAIST_DEFINITION, "Sem definição", &[("Apple", 2), ("Rectangle", 1)])
        .with_row(WEIGHT_DISTRIBUTION, "Quadril e coxas", &[("Pear", 2)])
        .with_row(WEIGHT_DISTRIBUTION, "Abdômen", &[("Apple", 3)])
        .with_row(WEIGHT_DISTRIBUTION, "Busto e ombros", &[("Inverted Triangle", 2)])
        .with_row(WEIGHT_DISTRIBUTION, "Uniforme", &[("Hourglass", 1), ("Rectangle", 1)])
}

pub fn definition() -> AnalysisDefinition {
    AnalysisDefinition::new(schema(), weights())
}
