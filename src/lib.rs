pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::orchestrator::Orchestrator;
pub use application::result::{ErrorKind, OrchestrationResult, Payload};
pub use application::services::LipsyncVariant;
pub use bootstrap::build_orchestrator;
