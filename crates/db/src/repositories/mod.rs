//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Helpers that must share the
//! caller's transaction take `&mut Transaction` instead.

pub mod content_card_repo;
pub mod content_set_repo;
pub mod creator_repo;
pub mod generation_repo;
pub mod numbering_repo;
pub mod summary_repo;

pub use content_card_repo::ContentCardRepo;
pub use content_set_repo::ContentSetRepo;
pub use creator_repo::CreatorRepo;
pub use generation_repo::GenerationRepo;
pub use numbering_repo::NumberingRepo;
pub use summary_repo::SummaryRepo;
