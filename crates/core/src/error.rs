use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A delete was attempted without the cascade flag while children exist.
    #[error("{entity} {id} has {dependents} dependent record(s); pass cascade=true to delete them")]
    HasDependents {
        entity: &'static str,
        id: DbId,
        dependents: i64,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}
