//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Flexible columns (platforms, tags, media, domain metadata) are JSONB and
//! decode into the typed shapes from `boxiii_core::content` via `sqlx::types::Json`.

pub mod content_card;
pub mod content_set;
pub mod creator;
pub mod generation;
pub mod summary;
