//! Generation orchestrator.
//!
//! Composes the prompt builder, a provider adapter, the response parser,
//! and the persistence layer into one request whose run is detached from the caller:
//! `Requested -> Prompting -> CallingProvider -> Parsing -> AssigningNumbers
//! -> Persisting -> Completed | Failed`.

pub mod config;
pub mod orchestrator;
pub mod store;

pub use config::GenerationConfig;
pub use orchestrator::{GenerationError, GenerationOrchestrator, GenerationSummary};
pub use store::{GenerationStore, PgGenerationStore};
