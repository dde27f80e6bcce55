//! Integration tests for end-to-end analysis resolution.
//!
//! These tests drive the public API the way the app does:
//! 1. Build a resolver over the built-in catalog with a scripted provider
//! 2. Resolve requests whose answers range from clean JSON to refusals
//! 3. Save results through the filesystem repository and read them back
//!
//! Uses the mock provider so no network access is needed.

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use wardrobe_advisor::adapters::ai::{MockAIProvider, MockError};
use wardrobe_advisor::adapters::{FsAnalysisRepository, SchemaPromptAssembler};
use wardrobe_advisor::application::{
    GetLatestAnalysisHandler, GetLatestAnalysisQuery, InferenceResolver, ResolveError,
    RunAnalysisCommand, RunAnalysisHandler,
};
use wardrobe_advisor::domain::foundation::UserId;
use wardrobe_advisor::domain::styling::definitions::{body_shape, color_season, garment};
use wardrobe_advisor::domain::styling::{
    AnalysisCatalog, AnalysisKind, FallbackClassifier, FieldValue, ImageReference,
    InferenceRequest, Provenance, RefusalDetector, Signals,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn resolver_with(provider: MockAIProvider) -> InferenceResolver {
    InferenceResolver::new(
        AnalysisCatalog::builtin(),
        RefusalDetector::new(),
        Arc::new(provider),
        Arc::new(SchemaPromptAssembler::new()),
    )
}

fn color_signals() -> Signals {
    vec![
        (color_season::SKIN_TONE, "Muito clara"),
        (color_season::EYE_COLOR, "Azul"),
        (color_season::HAIR_COLOR, "Louro"),
    ]
    .into_iter()
    .collect()
}

fn color_request() -> InferenceRequest {
    InferenceRequest::new(AnalysisKind::ColorSeason).with_signals(color_signals())
}

// =============================================================================
// Acceptance Scenarios
// =============================================================================

#[tokio::test]
async fn scenario_a_payload_after_prose_is_service_derived() {
    let resolver = resolver_with(
        MockAIProvider::new().with_response(r#"Sure! {"season":"Spring","confidence":85}"#),
    );

    let result = resolver.resolve(color_request()).await.unwrap();

    assert_eq!(result.category(), "Spring");
    assert_eq!(result.confidence_score(), 85);
    assert_eq!(result.provenance(), Provenance::ServiceDerived);
    assert_eq!(
        result.text_list(color_season::PALETTE).map(|p| p.is_empty()),
        Some(false)
    );
}

#[tokio::test]
async fn scenario_b_refusal_is_deterministic_fallback() {
    let resolver = resolver_with(
        MockAIProvider::new().with_response("I'm sorry, I cannot analyze this image."),
    );

    let result = resolver.resolve(color_request()).await.unwrap();

    assert_eq!(result.provenance(), Provenance::DeterministicFallback);
    assert!(result.is_fallback());
}

#[test]
fn scenario_c_weighted_signals_pick_summer() {
    let catalog = AnalysisCatalog::builtin();
    let definition = catalog.get(AnalysisKind::ColorSeason).unwrap();

    let classification =
        FallbackClassifier::classify(&color_signals(), definition.schema(), definition.weights());

    assert_eq!(classification.score("Spring"), 3);
    assert_eq!(classification.score("Summer"), 5);
    assert_eq!(classification.score("Autumn"), 0);
    assert_eq!(classification.score("Winter"), 1);
    assert_eq!(classification.category, "Summer");
}

#[tokio::test]
async fn scenario_c_through_the_resolver() {
    let resolver = resolver_with(
        MockAIProvider::new().with_response("I'm sorry, I cannot analyze this image."),
    );

    let result = resolver.resolve(color_request()).await.unwrap();

    assert_eq!(result.category(), "Summer");
    assert_eq!(result.confidence_score(), 80);
}

#[tokio::test]
async fn scenario_d_bare_keys_and_trailing_comma_are_repaired() {
    let resolver = resolver_with(
        MockAIProvider::new().with_response(r#"{season: "Autumn", confidence: 85,}"#),
    );

    let result = resolver.resolve(color_request()).await.unwrap();

    assert_eq!(result.category(), "Autumn");
    assert_eq!(result.confidence_score(), 85);
    assert_eq!(result.provenance(), Provenance::ServiceDerived);
}

#[tokio::test]
async fn scenario_e_confidence_is_clamped() {
    let resolver = resolver_with(
        MockAIProvider::new().with_response(r#"{"season": "Winter", "confidence": 150}"#),
    );

    let result = resolver.resolve(color_request()).await.unwrap();

    assert_eq!(result.confidence_score(), 100);
}

// =============================================================================
// Recovery Paths
// =============================================================================

#[tokio::test]
async fn refusal_phrase_overrides_valid_payload() {
    let resolver = resolver_with(MockAIProvider::new().with_response(
        r#"Desculpe, não consigo ver bem a foto. {"season": "Winter", "confidence": 95}"#,
    ));

    let result = resolver.resolve(color_request()).await.unwrap();

    assert_eq!(result.provenance(), Provenance::DeterministicFallback);
    assert_eq!(result.category(), "Summer");
}

#[tokio::test]
async fn every_transport_error_falls_back() {
    let errors = [
        MockError::RateLimited { retry_after_secs: 5 },
        MockError::ContentFiltered {
            reason: "policy".to_string(),
        },
        MockError::Unavailable {
            message: "overloaded".to_string(),
        },
        MockError::AuthenticationFailed,
        MockError::Network {
            message: "connection reset".to_string(),
        },
        MockError::Timeout { timeout_secs: 30 },
    ];

    for error in errors {
        let resolver = resolver_with(MockAIProvider::new().with_error(error.clone()));
        let result = resolver.resolve(color_request()).await.unwrap();
        assert!(result.is_fallback(), "{:?}", error);
        assert_eq!(result.category(), "Summer");
    }
}

#[tokio::test]
async fn fenced_portuguese_answer_is_normalized() {
    let answer = "Aqui está a análise:\n```json\n{\"body_shape\": \"Ampulheta\", \"confidence\": \"90%\", \"recommendations\": \"vestido envelope\"}\n```";
    let resolver = resolver_with(MockAIProvider::new().with_response(answer));
    let request = InferenceRequest::new(AnalysisKind::BodyShape)
        .with_signal(body_shape::SHOULDER_WIDTH, "Alinhados com o quadril")
        .with_signal(body_shape::WAIST_DEFINITION, "Bem marcada");

    let result = resolver.resolve(request).await.unwrap();

    assert_eq!(result.category(), "Hourglass");
    assert_eq!(result.confidence_score(), 90);
    assert_eq!(
        result.text_list(body_shape::RECOMMENDATIONS),
        Some(&["vestido envelope".to_string()][..])
    );
}

#[tokio::test]
async fn single_quoted_answer_keeps_service_values() {
    let resolver = resolver_with(
        MockAIProvider::new().with_response("```json\n{'season': 'Autumn', 'confidence': 90}\n```"),
    );

    let result = resolver.resolve(color_request()).await.unwrap();

    assert_eq!(result.provenance(), Provenance::ServiceDerived);
    assert_eq!(result.category(), "Autumn");
    assert_eq!(result.confidence_score(), 90);
}

#[tokio::test]
async fn garment_records_are_validated() {
    let answer = json!({
        "suitability": "Bom",
        "confidence": 82,
        "garment_type": "blazer",
        "garments": [
            {"garment": "navy blazer", "score": 12, "note": "sharp"},
            {"score": 4}
        ]
    })
    .to_string();
    let resolver = resolver_with(MockAIProvider::new().with_response(format!("Result: {}", answer)));
    let request = InferenceRequest::new(AnalysisKind::GarmentAssessment)
        .with_image(ImageReference::from_base64("image/jpeg", "AAAA"));

    let result = resolver.resolve(request).await.unwrap();

    assert_eq!(result.category(), "Good");
    let garments = result.records(garment::GARMENTS).unwrap();
    assert_eq!(garments.len(), 1);
    assert_eq!(garments[0].get(garment::SCORE), Some(&FieldValue::Integer(10)));
}

// =============================================================================
// Preconditions
// =============================================================================

#[tokio::test]
async fn missing_signal_fails_fast() {
    let provider = MockAIProvider::new();
    let resolver = resolver_with(provider.clone());
    let request = InferenceRequest::new(AnalysisKind::ColorSeason)
        .with_signal(color_season::SKIN_TONE, "Clara");

    let err = resolver.resolve(request).await.unwrap_err();

    assert!(matches!(err, ResolveError::MissingSignal { .. }));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn snake_case_signal_names_satisfy_preconditions() {
    let resolver = resolver_with(
        MockAIProvider::new().with_response("I'm sorry, I cannot analyze this image."),
    );
    let request = InferenceRequest::new(AnalysisKind::ColorSeason)
        .with_signal("skin_tone", "Muito clara")
        .with_signal("eye_color", "Azul")
        .with_signal("hair_color", "Louro");

    let result = resolver.resolve(request).await.unwrap();

    assert!(result.is_fallback());
    assert_eq!(result.category(), "Summer");
}

#[tokio::test]
async fn garment_without_photo_fails_fast() {
    let resolver = resolver_with(MockAIProvider::new());

    let err = resolver
        .resolve(InferenceRequest::new(AnalysisKind::GarmentAssessment))
        .await
        .unwrap_err();

    assert_eq!(err, ResolveError::MissingVisualInput(AnalysisKind::GarmentAssessment));
}

// =============================================================================
// Concurrency and Persistence
// =============================================================================

#[tokio::test]
async fn concurrent_resolutions_are_independent() {
    let provider = MockAIProvider::new()
        .with_error(MockError::Network {
            message: "connection reset".to_string(),
        })
        .with_response(r#"{"season": "Winter", "confidence": 91}"#);
    let resolver = Arc::new(resolver_with(provider.clone()));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let resolver = resolver.clone();
            tokio::spawn(async move { resolver.resolve(color_request()).await })
        })
        .collect();

    let mut provenances = Vec::new();
    for handle in handles {
        provenances.push(handle.await.unwrap().unwrap().provenance());
    }
    provenances.sort_by_key(|p| p.as_str());

    assert_eq!(
        provenances,
        vec![Provenance::DeterministicFallback, Provenance::ServiceDerived]
    );
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn run_analysis_persists_to_disk() {
    let temp_dir = TempDir::new().unwrap();
    let repository = Arc::new(FsAnalysisRepository::new(temp_dir.path()));
    let resolver = Arc::new(resolver_with(
        MockAIProvider::new().with_response(r#"Sure! {"season":"Spring","confidence":85}"#),
    ));
    let user_id = UserId::new("maria").unwrap();

    let saved = RunAnalysisHandler::new(resolver, repository.clone())
        .handle(RunAnalysisCommand {
            user_id: user_id.clone(),
            request: color_request(),
        })
        .await
        .unwrap();

    let loaded = GetLatestAnalysisHandler::new(repository)
        .handle(GetLatestAnalysisQuery {
            user_id,
            kind: AnalysisKind::ColorSeason,
        })
        .await
        .unwrap();

    assert_eq!(loaded, saved);
    assert_eq!(loaded.to_json()["fields"]["season"], json!("Spring"));
}
