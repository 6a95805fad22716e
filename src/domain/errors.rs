use thiserror::Error;

use super::discount::DiscountRejection;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error(transparent)]
    Discount(#[from] DiscountRejection),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Fails with [`DomainError::InvalidInput`] when `condition` does not hold.
pub(crate) fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<(), DomainError> {
    if condition {
        Ok(())
    } else {
        Err(DomainError::InvalidInput(message()))
    }
}
