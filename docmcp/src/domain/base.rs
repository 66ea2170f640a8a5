/// Base abstractions for the domain layer
use std::fmt::Debug;

/// Trait for value objects - immutable objects defined by their attributes
/// Value objects are equal if all their attributes are equal
pub trait ValueObject: Clone + PartialEq + Eq + Debug {}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-specific errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid value provided
    InvalidValue(String),
    /// Invalid operation
    InvalidOperation(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
            DomainError::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
