//! Unified error types for the domain layer
//!
//! Fatal errors here mark content/authoring bugs (unknown names, missing
//! arguments) that must surface during testing rather than be masked at
//! runtime. Expected-empty conditions (duplicate card, clamped-to-zero
//! stat change, absent NPC) are NOT errors - they are boolean results or
//! no-ops at the call site.

use thiserror::Error;

/// Unified error type for domain and engine operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An instruction name with no registered handler
    #[error("Unknown instruction: {0}")]
    UnknownInstruction(String),

    /// An id referenced by content that was never registered
    #[error("Unknown {kind} id: {id}")]
    UnknownId { kind: &'static str, id: String },

    /// A required instruction argument is absent
    #[error("Instruction '{op}' is missing required argument {index} ({expected})")]
    MissingArg {
        op: String,
        index: usize,
        expected: &'static str,
    },

    /// An instruction argument has the wrong shape
    #[error("Instruction '{op}' argument {index}: expected {expected}")]
    BadArg {
        op: String,
        index: usize,
        expected: &'static str,
    },

    /// An action name the router does not know
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Registering the same name twice at startup
    #[error("Duplicate registration: {kind} '{id}'")]
    DuplicateRegistration { kind: &'static str, id: String },

    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Save/load failure wrapping the serializer's message
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl DomainError {
    pub fn unknown_id(kind: &'static str, id: impl Into<String>) -> Self {
        Self::UnknownId {
            kind,
            id: id.into(),
        }
    }

    pub fn missing_arg(op: impl Into<String>, index: usize, expected: &'static str) -> Self {
        Self::MissingArg {
            op: op.into(),
            index,
            expected,
        }
    }

    pub fn bad_arg(op: impl Into<String>, index: usize, expected: &'static str) -> Self {
        Self::BadArg {
            op: op.into(),
            index,
            expected,
        }
    }

    pub fn duplicate(kind: &'static str, id: impl Into<String>) -> Self {
        Self::DuplicateRegistration {
            kind,
            id: id.into(),
        }
    }

    /// Creates a validation error for business rule violations.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_id_message_names_kind_and_id() {
        let err = DomainError::unknown_id("stat", "Charm");
        assert_eq!(err.to_string(), "Unknown stat id: Charm");
    }

    #[test]
    fn missing_arg_message_names_position() {
        let err = DomainError::missing_arg("setTimer", 0, "timer name");
        assert!(err.to_string().contains("setTimer"));
        assert!(err.to_string().contains("argument 0"));
    }
}
