//! Unified error types for the domain layer
//!
//! Provides a common error type used across all rule-system operations,
//! enabling consistent error handling without forcing adapters to use
//! String or anyhow. Error messages are user-facing: the UI surfaces them
//! verbatim as validation feedback.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., empty required text, malformed input)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A referenced characteristic, skill, stress track, aspect, or
    /// consequence does not exist in the current mechanics or rules
    #[error("{entity} \"{name}\" does not exist")]
    NotFound { entity: &'static str, name: String },

    /// A numeric value is outside its configured bounds, or would push a
    /// tracked sum over its budget
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A container is full: no eligible slot or list position remains
    #[error("Capacity reached: {0}")]
    Capacity(String),

    /// The supplied rules are internally inconsistent (a setup bug, as
    /// opposed to a legitimate runtime "no room" state)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl DomainError {
    /// Creates a validation error for malformed or missing input.
    ///
    /// # Example
    /// ```ignore
    /// if text.is_empty() {
    ///     return Err(DomainError::validation("Consequence text cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            name: name.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Create a capacity error
    pub fn capacity(msg: impl Into<String>) -> Self {
        Self::Capacity(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        let err = DomainError::validation("aspect short name cannot be empty");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation failed: aspect short name cannot be empty"
        );
    }

    #[test]
    fn not_found_error_display() {
        let err = DomainError::not_found("Characteristic", "Brawn");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert_eq!(err.to_string(), "Characteristic \"Brawn\" does not exist");
    }

    #[test]
    fn constraint_error_display() {
        let err = DomainError::constraint("Value for Brawn above maximum (5)");
        assert!(matches!(err, DomainError::Constraint(_)));
        assert!(err.to_string().contains("maximum (5)"));
    }

    #[test]
    fn capacity_and_configuration_are_distinct() {
        let full = DomainError::capacity("no available slot for consequence variant \"mild\"");
        let setup = DomainError::configuration("consequence variant \"mild\" does not exist in rules");
        assert!(matches!(full, DomainError::Capacity(_)));
        assert!(matches!(setup, DomainError::Configuration(_)));
        assert_ne!(full, setup);
    }
}
