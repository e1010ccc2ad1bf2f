use crate::error::DomainError;

/// Rules an entity must satisfy before it is first stored.
pub trait Schema {
    fn validate_new(&self) -> Result<(), DomainError>;
}
