//! Error types for the memory network engine

use thiserror::Error;

/// Result type for network operations
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Errors that can occur while configuring or driving a memory network
#[derive(Error, Debug)]
pub enum NetworkError {
    /// No unit with the given name exists
    #[error("no unit named {name:?} in the network")]
    UnknownUnit {
        /// Name that was looked up
        name: String,
    },

    /// A unit with the given name already exists
    #[error("unit name {name:?} is already used; unit names must be unique")]
    DuplicateUnit {
        /// Name that was rejected
        name: String,
    },

    /// Unrecognized parameter name
    #[error("{name:?} is not a valid network parameter name")]
    UnknownParameter {
        /// Name that was rejected
        name: String,
    },

    /// Operation rejected because the network is running
    #[error("cannot {operation} while the network is running")]
    RunningLocked {
        /// Operation that was rejected
        operation: String,
    },

    /// `start` was called on an already-running network
    #[error("the network is already running")]
    AlreadyRunning,

    /// Incompatible configuration settings
    #[error("configuration conflict: {reason}")]
    ConfigConflict {
        /// Reason for the conflict
        reason: String,
    },

    /// Invalid parameter value
    #[error("invalid parameter {parameter}: {value} (expected {constraint})")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Worker-internal failure
    #[error("internal worker failure: {reason}")]
    Internal {
        /// Reason for the failure
        reason: String,
    },
}

impl NetworkError {
    /// Create an unknown-unit error
    pub fn unknown_unit(name: impl Into<String>) -> Self {
        Self::UnknownUnit { name: name.into() }
    }

    /// Create a duplicate-unit error
    pub fn duplicate_unit(name: impl Into<String>) -> Self {
        Self::DuplicateUnit { name: name.into() }
    }

    /// Create an unknown-parameter error
    pub fn unknown_parameter(name: impl Into<String>) -> Self {
        Self::UnknownParameter { name: name.into() }
    }

    /// Create a running-locked error
    pub fn running_locked(operation: impl Into<String>) -> Self {
        Self::RunningLocked {
            operation: operation.into(),
        }
    }

    /// Create a configuration-conflict error
    pub fn config_conflict(reason: impl Into<String>) -> Self {
        Self::ConfigConflict {
            reason: reason.into(),
        }
    }

    /// Create an internal-failure error
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }

    /// Create an invalid-parameter error
    pub fn invalid_parameter(
        parameter: impl Into<String>,
        value: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            constraint: constraint.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = NetworkError::unknown_unit("apple");
        assert!(matches!(err, NetworkError::UnknownUnit { .. }));

        let err = NetworkError::invalid_parameter("Amax", "0.0", "> Amin");
        assert!(matches!(err, NetworkError::InvalidParameter { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = NetworkError::running_locked("set parameters");
        let msg = format!("{}", err);
        assert!(msg.contains("set parameters"));
        assert!(msg.contains("running"));

        let err = NetworkError::duplicate_unit("apple");
        assert!(format!("{}", err).contains("apple"));
    }
}
