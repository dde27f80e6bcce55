//! ResolutionState - lifecycle of a single resolve invocation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Where a resolution currently is.
///
/// Valid transitions:
/// - Requested -> ServiceCalled
/// - ServiceCalled -> ExtractionAttempted | ServiceFailed
/// - ExtractionAttempted -> ValidatedServiceDerived | ServiceFailed
/// - ServiceFailed -> FallbackClassified
/// - FallbackClassified -> ValidatedFallback
/// - ValidatedServiceDerived | ValidatedFallback -> Returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionState {
    #[default]
    Requested,
    ServiceCalled,
    ExtractionAttempted,
    ServiceFailed,
    FallbackClassified,
    ValidatedServiceDerived,
    ValidatedFallback,
    Returned,
}

impl ResolutionState {
    /// True once a validated result exists.
    pub fn is_validated(&self) -> bool {
        matches!(
            self,
            ResolutionState::ValidatedServiceDerived | ResolutionState::ValidatedFallback
        )
    }

    /// True on the fallback branch.
    pub fn is_fallback_path(&self) -> bool {
        matches!(
            self,
            ResolutionState::ServiceFailed
                | ResolutionState::FallbackClassified
                | ResolutionState::ValidatedFallback
        )
    }
}

impl StateMachine for ResolutionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ResolutionState::*;
        match self {
            Requested => vec![ServiceCalled],
            ServiceCalled => vec![ExtractionAttempted, ServiceFailed],
            ExtractionAttempted => vec![ValidatedServiceDerived, ServiceFailed],
            ServiceFailed => vec![FallbackClassified],
            FallbackClassified => vec![ValidatedFallback],
            ValidatedServiceDerived | ValidatedFallback => vec![Returned],
            Returned => vec![],
        }
    }
}

impl fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResolutionState::Requested => "Requested",
            ResolutionState::ServiceCalled => "ServiceCalled",
            ResolutionState::ExtractionAttempted => "ExtractionAttempted",
            ResolutionState::ServiceFailed => "ServiceFailed",
            ResolutionState::FallbackClassified => "FallbackClassified",
            ResolutionState::ValidatedServiceDerived => "Validated(ServiceDerived)",
            ResolutionState::ValidatedFallback => "Validated(DeterministicFallback)",
            ResolutionState::Returned => "Returned",
        };
        write!(f, "{}", s)
    }
}
