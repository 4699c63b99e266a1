use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("{entity} {id} does not belong to content item {content_item_id}")]
    InvalidOwnership {
        entity: &'static str,
        id: DbId,
        content_item_id: DbId,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("No eligible video for content item {content_item_id}")]
    NoEligibleVideo { content_item_id: DbId },

    #[error("Internal error: {0}")]
    Internal(String),
}
