//! Seasonal color analysis.
//!
//! Four seasons, each with its own palette and colors to avoid. The fallback
//! table scores skin tone, eye color, and hair color (plus an optional
//! undertone answer) using the form values of the capture screen.

use crate::domain::styling::analysis_kind::AnalysisKind;
use crate::domain::styling::catalog::AnalysisDefinition;
use crate::domain::styling::classifier::FallbackWeightTable;
use crate::domain::styling::schema::{CategoryDomain, DomainSchema, FieldSpec, ListDefault};

pub const SEASON: &str = "season";
pub const CONFIDENCE: &str = "confidence";
pub const UNDERTONE: &str = "undertone";
pub const PALETTE: &str = "palette";
pub const AVOID_COLORS: &str = "avoid_colors";
pub const SUMMARY: &str = "summary";

pub const SKIN_TONE: &str = "skinTone";
pub const EYE_COLOR: &str = "eyeColor";
pub const HAIR_COLOR: &str = "hairColor";
pub const UNDERTONE_SIGNAL: &str = "undertone";

const SPRING_PALETTE: &[&str] = &["coral", "peach", "warm yellow", "turquoise", "camel", "ivory"];
const SUMMER_PALETTE: &[&str] = &["lavender", "powder blue", "dusty rose", "soft gray", "mauve", "soft white"];
const AUTUMN_PALETTE: &[&str] = &["rust", "olive", "mustard", "terracotta", "chocolate brown", "teal"];
const WINTER_PALETTE: &[&str] = &["pure white", "black", "royal blue", "emerald", "fuchsia", "icy gray"];
const NEUTRAL_PALETTE: &[&str] = &["navy", "white", "gray"];

const SPRING_AVOID: &[&str] = &["black", "charcoal", "icy pastels"];
const SUMMER_AVOID: &[&str] = &["orange", "mustard", "pure black"];
const AUTUMN_AVOID: &[&str] = &["icy pastels", "fuchsia", "pure white"];
const WINTER_AVOID: &[&str] = &["beige", "orange", "muted earth tones"];

fn seasons() -> CategoryDomain {
    CategoryDomain::new(&["Spring", "Summer", "Autumn", "Winter"]).with_aliases(&[
        ("Primavera", "Spring"),
        ("Verão", "Summer"),
        ("Outono", "Autumn"),
        ("Fall", "Autumn"),
        ("Inverno", "Winter"),
    ])
}

fn undertones() -> CategoryDomain {
    CategoryDomain::new(&["Warm", "Cool", "Neutral"]).with_aliases(&[
        ("Quente", "Warm"),
        ("Frio", "Cool"),
        ("Fria", "Cool"),
        ("Neutro", "Neutral"),
        ("Neutra", "Neutral"),
    ])
}

pub fn schema() -> DomainSchema {
    DomainSchema::new(AnalysisKind::ColorSeason, SEASON, CONFIDENCE)
        .with_field(FieldSpec::category(SEASON, seasons(), "Summer"))
        .with_field(FieldSpec::integer(CONFIDENCE, 70, 100, 80))
        .with_field(FieldSpec::category(UNDERTONE, undertones(), "Neutral"))
        .with_field(FieldSpec::text_list(
            PALETTE,
            8,
            ListDefault::by_category(
                SEASON,
                &[
                    ("Spring", SPRING_PALETTE),
                    ("Summer", SUMMER_PALETTE),
                    ("Autumn", AUTUMN_PALETTE),
                    ("Winter", WINTER_PALETTE),
                ],
                NEUTRAL_PALETTE,
            ),
        ))
        .with_field(FieldSpec::text_list(
            AVOID_COLORS,
            6,
            ListDefault::by_category(
                SEASON,
                &[
                    ("Spring", SPRING_AVOID),
                    ("Summer", SUMMER_AVOID),
                    ("Autumn", AUTUMN_AVOID),
                    ("Winter", WINTER_AVOID),
                ],
                &[],
            ),
        ))
        .with_field(FieldSpec::text(
            SUMMARY,
            "Palette chosen from your skin, eye, and hair tones.",
        ))
        .with_required_signals(&[SKIN_TONE, EYE_COLOR, HAIR_COLOR])
        .with_category_priority(&["Summer", "Spring", "Autumn", "Winter"])
}

pub fn weights() -> FallbackWeightTable {
    FallbackWeightTable::new()
        .with_row(SKIN_TONE, "Muito clara", &[("Summer", 2), ("Spring", 1), ("Winter", 1)])
        .with_row(SKIN_TONE, "Clara", &[("Spring", 2), ("Summer", 2)])
        .with_row(SKIN_TONE, "Média", &[("Autumn", 2), ("Spring", 1)])
        .with_row(SKIN_TONE, "Morena", &[("Autumn", 2), ("Winter", 1)])
        .with_row(SKIN_TONE, "Escura", &[("Winter", 3), ("Autumn", 1)])
        .with_row(EYE_COLOR, "Azul", &[("Summer", 2), ("Spring", 1)])
        .with_row(EYE_COLOR, "Verde", &[("Autumn", 2), ("Spring", 1)])
        .with_row(EYE_COLOR, "Castanho claro", &[("Autumn", 2), ("Spring", 1)])
        .with_row(EYE_COLOR, "Castanho escuro", &[("Winter", 2), ("Autumn", 1)])
        .with_row(EYE_COLOR, "Preto", &[("Winter", 3)])
        .with_row(EYE_COLOR, "Cinza", &[("Summer", 2), ("Winter", 1)])
        .with_row(HAIR_COLOR, "Louro", &[("Spring", 1), ("Summer", 1)])
        .with_row(HAIR_COLOR, "Ruivo", &[("Autumn", 3)])
        .with_row(HAIR_COLOR, "Castanho claro", &[("Autumn", 1), ("Spring", 1)])
        .with_row(HAIR_COLOR, "Castanho escuro", &[("Winter", 2), ("Autumn", 1)])
        .with_row(HAIR_COLOR, "Preto", &[("Winter", 3)])
        .with_row(HAIR_COLOR, "Grisalho", &[("Summer", 2), ("Winter", 1)])
        .with_row(UNDERTONE_SIGNAL, "Quente", &[("Spring", 2), ("Autumn", 2)])
        .with_row(UNDERTONE_SIGNAL, "Frio", &[("Summer", 2), ("Winter", 2)])
}

pub fn definition() -> AnalysisDefinition {
    AnalysisDefinition::new(schema(), weights())
}
