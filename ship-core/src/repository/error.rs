//! Repository error types
//!
//! Structured errors for repository and store operations. A row that does not
//! exist is never an error: lookups return `Option` and by-key writes return
//! `None`. What remains here are capability-guard failures, entity resolution
//! failures, and whatever the store itself reports.
//!
//! # Example
//!
//! ```rust
//! use ship_core::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
//!
//! let error = RepositoryError::missing_soft_deletes(RepositoryOperation::ForceDestroy, "Post");
//! assert!(matches!(error.kind, RepositoryErrorKind::MissingSoftDeleteCapability));
//! assert_eq!(error.entity_type.as_deref(), Some("Post"));
//! ```

use std::fmt;

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Resolving the entity type at repository construction
    Resolve,
    /// Fetching every matching row
    All,
    /// Fetching the first row matching a field
    FindByField,
    /// Fetching the first row matching a field, trashed rows included
    FindByFieldWithTrashed,
    /// Fetching one page of rows
    Paginate,
    /// Inserting a new row
    Create,
    /// Updating a row by primary key
    Update,
    /// Deleting a row by primary key
    Destroy,
    /// Permanently deleting a row by primary key
    ForceDestroy,
    /// Minimum aggregate
    Min,
    /// Maximum aggregate
    Max,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolve => write!(f, "resolve"),
            Self::All => write!(f, "all"),
            Self::FindByField => write!(f, "find_by_field"),
            Self::FindByFieldWithTrashed => write!(f, "find_by_field_with_trashed"),
            Self::Paginate => write!(f, "paginate"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Destroy => write!(f, "destroy"),
            Self::ForceDestroy => write!(f, "force_destroy"),
            Self::Min => write!(f, "min"),
            Self::Max => write!(f, "max"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// The model does not declare the soft-delete capability
    MissingSoftDeleteCapability,
    /// The model could not be resolved by the store
    EntityResolutionFailure,
    /// A row with the same primary key already exists
    AlreadyExists,
    /// Store constraint violation
    ConstraintViolation,
    /// Failed to reach the store
    ConnectionFailed,
    /// Operation timed out
    Timeout,
    /// Underlying store error
    DatabaseError,
    /// Row could not be converted to or from the model
    SerializationError,
    /// Other unclassified error
    Other,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSoftDeleteCapability => write!(f, "missing_soft_delete_capability"),
            Self::EntityResolutionFailure => write!(f, "entity_resolution_failure"),
            Self::AlreadyExists => write!(f, "already_exists"),
            Self::ConstraintViolation => write!(f, "constraint_violation"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::DatabaseError => write!(f, "database_error"),
            Self::SerializationError => write!(f, "serialization_error"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured repository error with operation context
///
/// Carries the operation that failed, the category of failure, and the model
/// (and row, where known) involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The model involved (e.g., "User", "Post")
    pub entity_type: Option<String>,
    /// The primary key of the row involved
    pub entity_id: Option<String>,
}

impl RepositoryError {
    /// Create a new repository error
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// The model does not declare soft deletes but the operation needs them
    ///
    /// Raised before the store is touched by `find_by_field_with_trashed` and
    /// `force_destroy`.
    pub fn missing_soft_deletes(operation: RepositoryOperation, entity_type: &str) -> Self {
        Self {
            operation,
            kind: RepositoryErrorKind::MissingSoftDeleteCapability,
            message: format!(
                "model {} does not declare the soft-delete capability (Model::SOFT_DELETES)",
                entity_type
            ),
            entity_type: Some(entity_type.to_string()),
            entity_id: None,
        }
    }

    /// The store cannot provide the collection backing a model
    pub fn entity_resolution(entity_type: &str, message: impl Into<String>) -> Self {
        Self {
            operation: RepositoryOperation::Resolve,
            kind: RepositoryErrorKind::EntityResolutionFailure,
            message: message.into(),
            entity_type: Some(entity_type.to_string()),
            entity_id: None,
        }
    }

    /// Create an "already exists" error with entity context
    pub fn already_exists(
        operation: RepositoryOperation,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind: RepositoryErrorKind::AlreadyExists,
            message: "Row with this primary key already exists".to_string(),
            entity_type: Some(entity_type.into()),
            entity_id: Some(entity_id.into()),
        }
    }

    /// Create a constraint violation error
    pub fn constraint_violation(
        operation: RepositoryOperation,
        message: impl Into<String>,
    ) -> Self {
        Self::new(operation, RepositoryErrorKind::ConstraintViolation, message)
    }

    /// Create a connection failed error
    pub fn connection_failed(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::ConnectionFailed, message)
    }

    /// Create a timeout error
    pub fn timeout(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Timeout, message)
    }

    /// Create a store error
    pub fn database_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::DatabaseError, message)
    }

    /// Create a serialization error
    pub fn serialization_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::SerializationError, message)
    }

    /// Create an unclassified error
    pub fn other(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Other, message)
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Add the model name without a row id
    #[must_use]
    pub fn with_entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: RepositoryOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Check if this error is retriable (transient errors that may succeed on retry)
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout
        )
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        match (&self.entity_type, &self.entity_id) {
            (Some(entity_type), Some(entity_id)) => write!(f, " [{}: {}]", entity_type, entity_id)?,
            (Some(entity_type), None) => write!(f, " [{}]", entity_type)?,
            _ => {}
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}
