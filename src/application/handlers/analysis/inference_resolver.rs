//! InferenceResolver - turns one analysis request into a validated result.
//!
//! Calls the generative service once and recovers from every kind of
//! service failure (transport error, refusal, unusable payload) with the
//! deterministic fallback classifier. Only precondition violations are
//! reported to the caller.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, StateMachine};
use crate::domain::styling::{
    validate, AnalysisCatalog, AnalysisDefinition, AnalysisKind, Extraction, ExtractionPipeline,
    FailureSignal, FallbackClassifier, InferenceRequest, Provenance, RefusalDetector,
    ResolutionState, ValidatedFields, ValidatedResult,
};
use crate::ports::{AIError, AIProvider, CompletionRequest, PromptAssembler, RequestMetadata};

/// Precondition violations. Everything else resolves to a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("No analysis definition registered for {0}")]
    UnsupportedKind(AnalysisKind),

    #[error("{kind} analysis requires the '{signal}' signal")]
    MissingSignal { kind: AnalysisKind, signal: String },

    #[error("{0} analysis requires a photo")]
    MissingVisualInput(AnalysisKind),
}

impl From<ResolveError> for DomainError {
    fn from(err: ResolveError) -> Self {
        match &err {
            ResolveError::UnsupportedKind(kind) => {
                DomainError::new(ErrorCode::UnsupportedAnalysis, err.to_string())
                    .with_detail("kind", kind.as_str())
            }
            ResolveError::MissingSignal { kind, signal } => {
                DomainError::new(ErrorCode::MissingSignal, err.to_string())
                    .with_detail("kind", kind.as_str())
                    .with_detail("signal", signal.clone())
            }
            ResolveError::MissingVisualInput(kind) => {
                DomainError::new(ErrorCode::MissingVisualInput, err.to_string())
                    .with_detail("kind", kind.as_str())
            }
        }
    }
}

/// Why the service answer was not used.
#[derive(Debug)]
enum ServiceFailure {
    Transport(AIError),
    Rejected(FailureSignal),
    NoPayload,
}

impl fmt::Display for ServiceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceFailure::Transport(err) => write!(f, "transport error: {}", err),
            ServiceFailure::Rejected(signal) => write!(f, "rejected: {}", signal),
            ServiceFailure::NoPayload => write!(f, "no parseable payload"),
        }
    }
}

/// Tracks the resolution state of a single call.
struct Lifecycle {
    state: ResolutionState,
    kind: AnalysisKind,
}

impl Lifecycle {
    fn new(kind: AnalysisKind) -> Self {
        Self {
            state: ResolutionState::default(),
            kind,
        }
    }

    fn advance(&mut self, next: ResolutionState) {
        debug_assert!(
            self.state.can_transition_to(&next),
            "invalid resolution transition {} -> {}",
            self.state,
            next
        );
        tracing::trace!(kind = self.kind.as_str(), from = %self.state, to = %next, "Resolution step");
        self.state = next;
    }
}

/// Generic resolver shared by every analysis kind.
///
/// Holds only immutable configuration; concurrent `resolve` calls share
/// nothing mutable.
pub struct InferenceResolver {
    catalog: Arc<AnalysisCatalog>,
    detector: RefusalDetector,
    provider: Arc<dyn AIProvider>,
    assembler: Arc<dyn PromptAssembler>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl InferenceResolver {
    pub fn new(
        catalog: Arc<AnalysisCatalog>,
        detector: RefusalDetector,
        provider: Arc<dyn AIProvider>,
        assembler: Arc<dyn PromptAssembler>,
    ) -> Self {
        Self {
            catalog,
            detector,
            provider,
            assembler,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Caps the length of the service answer.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn catalog(&self) -> &AnalysisCatalog {
        &self.catalog
    }

    /// Resolves a request into a schema-conformant result.
    ///
    /// Fails only when the request itself is unusable. Service errors,
    /// refusals, and malformed answers all produce a result with
    /// `DeterministicFallback` provenance.
    pub async fn resolve(&self, request: InferenceRequest) -> Result<ValidatedResult, ResolveError> {
        let mut lifecycle = Lifecycle::new(request.kind);

        let definition = self
            .catalog
            .get(request.kind)
            .ok_or(ResolveError::UnsupportedKind(request.kind))?;
        check_preconditions(&request, definition)?;

        lifecycle.advance(ResolutionState::ServiceCalled);
        let derived = match self.call_service(&request, definition).await {
            Ok(raw) => self.interpret(&raw, definition, &mut lifecycle),
            Err(err) => Err(ServiceFailure::Transport(err)),
        };

        let (fields, provenance) = match derived {
            Ok(fields) => {
                lifecycle.advance(ResolutionState::ValidatedServiceDerived);
                (fields, Provenance::ServiceDerived)
            }
            Err(failure) => {
                tracing::warn!(
                    kind = request.kind.as_str(),
                    reason = %failure,
                    "Service answer unusable, using fallback classifier"
                );
                lifecycle.advance(ResolutionState::ServiceFailed);
                (
                    fallback(&request, definition, &mut lifecycle),
                    Provenance::DeterministicFallback,
                )
            }
        };

        let result = ValidatedResult::new(definition.schema(), fields, provenance);
        lifecycle.advance(ResolutionState::Returned);
        tracing::debug!(
            kind = request.kind.as_str(),
            category = result.category(),
            confidence = result.confidence_score(),
            provenance = provenance.as_str(),
            "Resolved analysis"
        );
        Ok(result)
    }

    async fn call_service(
        &self,
        request: &InferenceRequest,
        definition: &AnalysisDefinition,
    ) -> Result<String, AIError> {
        let messages = self.assembler.assemble(request, definition.schema());
        let metadata = RequestMetadata::new(request.kind, Uuid::new_v4().to_string());

        let mut completion = CompletionRequest::new(metadata).with_messages(messages);
        if let Some(max_tokens) = self.max_tokens {
            completion = completion.with_max_tokens(max_tokens);
        }
        if let Some(temperature) = self.temperature {
            completion = completion.with_temperature(temperature);
        }

        let response = self.provider.complete(completion).await?;
        tracing::debug!(
            kind = request.kind.as_str(),
            model = %response.model,
            length = response.content.chars().count(),
            "Service answered"
        );
        Ok(response.content)
    }

    /// Detector, then extraction, then validation of the located payload.
    fn interpret(
        &self,
        raw: &str,
        definition: &AnalysisDefinition,
        lifecycle: &mut Lifecycle,
    ) -> Result<ValidatedFields, ServiceFailure> {
        if let Some(signal) = self.detector.detect(raw) {
            return Err(ServiceFailure::Rejected(signal));
        }

        lifecycle.advance(ResolutionState::ExtractionAttempted);
        let schema = definition.schema();
        let extraction = ExtractionPipeline::anchored_on(schema.discriminant()).extract(raw);

        for attempt in extraction.attempts() {
            tracing::debug!(
                kind = schema.kind().as_str(),
                strategy = attempt.strategy.as_str(),
                outcome = ?attempt.outcome,
                parse = ?attempt.parse,
                "Extraction attempt"
            );
        }

        match extraction {
            Extraction::Found { candidate, .. } => {
                if candidate.repaired {
                    tracing::debug!(
                        kind = schema.kind().as_str(),
                        strategy = candidate.strategy.as_str(),
                        "Payload parsed after repair"
                    );
                }
                let payload = serde_json::Value::Object(candidate.payload);
                Ok(validate(&payload, schema))
            }
            Extraction::NotFound { .. } => Err(ServiceFailure::NoPayload),
        }
    }
}

fn check_preconditions(
    request: &InferenceRequest,
    definition: &AnalysisDefinition,
) -> Result<(), ResolveError> {
    let schema = definition.schema();

    if let Some(missing) = schema
        .required_signals()
        .iter()
        .find(|name| request.signals.get(name).is_none())
    {
        return Err(ResolveError::MissingSignal {
            kind: request.kind,
            signal: missing.clone(),
        });
    }

    if schema.requires_visual_input() && !request.has_visual_input() {
        return Err(ResolveError::MissingVisualInput(request.kind));
    }

    Ok(())
}

fn fallback(
    request: &InferenceRequest,
    definition: &AnalysisDefinition,
    lifecycle: &mut Lifecycle,
) -> ValidatedFields {
    let schema = definition.schema();
    let classification = FallbackClassifier::classify(&request.signals, schema, definition.weights());
    lifecycle.advance(ResolutionState::FallbackClassified);
    tracing::debug!(
        kind = schema.kind().as_str(),
        category = classification.category.as_str(),
        scores = ?classification.scores,
        "Fallback classification"
    );

    let fields = validate(&classification.to_payload(schema), schema);
    lifecycle.advance(ResolutionState::ValidatedFallback);
    fields
}
