//! `agentforge-errors`
//!
//! Shared error types for the Agentforge control plane, kept in their own
//! crate to avoid circular dependencies between the pipeline, step library,
//! and resource controller crates.

use thiserror::Error;

/// The transport code space every pipeline error is classified into.
/// Mirrors gRPC's status codes closely enough for the RPC layer to map
/// directly onto HTTP statuses without a translation table per resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    FailedPrecondition,
    Internal,
    Canceled,
}

/// The primary error type propagated through the pipeline, step library,
/// and resource controllers.
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        field_path: Option<String>,
    },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("canceled: {0}")]
    Canceled(String),
    #[error("dependency call failed: {0}")]
    Dependency(#[source] Box<ForgeError>),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ForgeError {
    pub fn validation(message: impl Into<String>) -> Self {
        ForgeError::Validation {
            message: message.into(),
            field_path: None,
        }
    }

    pub fn validation_at(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        ForgeError::Validation {
            message: message.into(),
            field_path: Some(field_path.into()),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ForgeError::NotFound(message.into())
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        ForgeError::AlreadyExists(message.into())
    }

    pub fn failed_precondition(message: impl Into<String>) -> Self {
        ForgeError::FailedPrecondition(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ForgeError::Internal(message.into())
    }

    /// Wraps an error returned by a cross-resource client call, preserving
    /// its code rather than collapsing it to `Internal`.
    pub fn dependency(err: ForgeError) -> Self {
        ForgeError::Dependency(Box::new(err))
    }

    /// Classifies this error into the transport code space. Unknown/unmapped
    /// error shapes become `Internal`, per the runtime's failure semantics.
    pub fn code(&self) -> Code {
        match self {
            ForgeError::Validation { .. } => Code::InvalidArgument,
            ForgeError::NotFound(_) => Code::NotFound,
            ForgeError::AlreadyExists(_) => Code::AlreadyExists,
            ForgeError::FailedPrecondition(_) => Code::FailedPrecondition,
            ForgeError::Internal(_) => Code::Internal,
            ForgeError::Canceled(_) => Code::Canceled,
            ForgeError::Dependency(inner) => inner.code(),
            ForgeError::Serialization(_) => Code::Internal,
        }
    }

    /// The field path implicated by this error, if any (only `Validation`
    /// carries one).
    pub fn field_path(&self) -> Option<&str> {
        match self {
            ForgeError::Validation { field_path, .. } => field_path.as_deref(),
            ForgeError::Dependency(inner) => inner.field_path(),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for ForgeError {
    fn from(err: anyhow::Error) -> Self {
        ForgeError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;
