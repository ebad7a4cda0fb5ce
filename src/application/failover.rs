use std::future::Future;
use std::time::Instant;

use crate::domain::{AttemptOutcome, Candidate, ClassifyFailure, FailureClass, InvocationAttempt};

#[derive(Debug)]
pub struct FailoverSuccess<T> {
    pub value: T,
    pub served_by: Candidate,
    pub attempts: Vec<InvocationAttempt>,
}

#[derive(Debug, thiserror::Error)]
pub enum FailoverError<E> {
    #[error("all {} candidates failed transiently", .attempts.len())]
    AllCandidatesExhausted { attempts: Vec<InvocationAttempt> },
    #[error("candidate {candidate} failed: {error}")]
    Aborted {
        candidate: Candidate,
        class: FailureClass,
        error: E,
        attempts: Vec<InvocationAttempt>,
    },
}

/// Invokes `op` on each candidate in rank order. Transient-backend failures
/// advance to the next candidate; permanent-input and permanent-auth
/// failures abort immediately, since switching backend cannot fix a bad
/// input or a missing credential. Every invocation starts over from the
/// highest-rank candidate; there is no sticky last-successful-backend state.
pub async fn invoke_with_failover<T, E, F, Fut>(
    candidates: &[Candidate],
    mut op: F,
) -> Result<FailoverSuccess<T>, FailoverError<E>>
where
    E: ClassifyFailure + std::fmt::Display,
    F: FnMut(Candidate) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempts = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let started = Instant::now();
        match op(candidate.clone()).await {
            Ok(value) => {
                attempts.push(InvocationAttempt {
                    candidate: candidate.clone(),
                    outcome: AttemptOutcome::Succeeded,
                    latency: started.elapsed(),
                });
                return Ok(FailoverSuccess {
                    value,
                    served_by: candidate.clone(),
                    attempts,
                });
            }
            Err(error) => {
                let class = error.class();
                attempts.push(InvocationAttempt {
                    candidate: candidate.clone(),
                    outcome: AttemptOutcome::Failed {
                        class,
                        message: error.to_string(),
                    },
                    latency: started.elapsed(),
                });
                if class.is_retryable() {
                    tracing::warn!(
                        candidate = %candidate,
                        error = %error,
                        "candidate failed transiently, advancing to next"
                    );
                    continue;
                }
                return Err(FailoverError::Aborted {
                    candidate: candidate.clone(),
                    class,
                    error,
                    attempts,
                });
            }
        }
    }

    Err(FailoverError::AllCandidatesExhausted { attempts })
}
