use std::collections::HashMap;

use crate::domain::{Candidate, Capability};

/// Ordered backend candidates per capability. Built once at process start
/// from configuration, then shared read-only; lookups never mutate.
#[derive(Debug, Clone)]
pub struct ProviderCatalog {
    candidates: HashMap<Capability, Vec<Candidate>>,
}

impl ProviderCatalog {
    pub fn builder() -> ProviderCatalogBuilder {
        ProviderCatalogBuilder {
            candidates: HashMap::new(),
        }
    }

    pub fn candidates(&self, capability: Capability) -> Result<&[Candidate], CatalogError> {
        match self.candidates.get(&capability) {
            Some(list) => Ok(list.as_slice()),
            None => Err(CatalogError::NoCandidates(capability)),
        }
    }
}

pub struct ProviderCatalogBuilder {
    candidates: HashMap<Capability, Vec<Candidate>>,
}

impl ProviderCatalogBuilder {
    pub fn register(mut self, capability: Capability, candidates: Vec<Candidate>) -> Self {
        self.candidates.insert(capability, candidates);
        self
    }

    /// Validates every registered list: at least one candidate, ranks
    /// strictly increasing. A violation is a startup-fatal condition, never
    /// a runtime retry target.
    pub fn build(self) -> Result<ProviderCatalog, CatalogError> {
        for (capability, list) in &self.candidates {
            if list.is_empty() {
                return Err(CatalogError::NoCandidates(*capability));
            }
            for pair in list.windows(2) {
                if pair[1].rank <= pair[0].rank {
                    return Err(CatalogError::UnorderedRanks {
                        capability: *capability,
                        previous: pair[0].rank,
                        current: pair[1].rank,
                    });
                }
            }
        }
        Ok(ProviderCatalog {
            candidates: self.candidates,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("no candidates configured for capability {0}")]
    NoCandidates(Capability),
    #[error("candidate ranks for {capability} must be strictly increasing (saw {previous} then {current})")]
    UnorderedRanks {
        capability: Capability,
        previous: u8,
        current: u8,
    },
}
