use std::time::Duration;

use super::Candidate;

/// How a backend failure should steer candidate failover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    TransientBackend,
    PermanentInput,
    PermanentAuth,
}

impl FailureClass {
    pub fn is_retryable(&self) -> bool {
        matches!(self, FailureClass::TransientBackend)
    }
}

pub trait ClassifyFailure {
    fn class(&self) -> FailureClass;
}

#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    Succeeded,
    Failed {
        class: FailureClass,
        message: String,
    },
}

/// One backend call made during a single orchestration request. Kept only for
/// the duration of that request, surfaced as diagnostics on total failure.
#[derive(Debug, Clone)]
pub struct InvocationAttempt {
    pub candidate: Candidate,
    pub outcome: AttemptOutcome,
    pub latency: Duration,
}
