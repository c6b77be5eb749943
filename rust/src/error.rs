//! Error handling and result types for ordered index operations.
//!
//! Both engines share one narrow error taxonomy: lookups and removals that miss,
//! duplicate inserts on the set-oriented B+ insert path, invalid construction
//! parameters, and integrity failures reported by the validators.

use thiserror::Error;

/// Error type for ordered index operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// Key not found in the index.
    #[error("Key not found in index")]
    KeyNotFound,
    /// Key is already present and the operation does not overwrite.
    #[error("Key already exists in index")]
    KeyAlreadyExists,
    /// Invalid fan-out order specified.
    #[error("Invalid order: {0}")]
    InvalidOrder(String),
    /// Internal data structure integrity violation.
    #[error("Data integrity error: {0}")]
    DataIntegrityError(String),
    /// Tree corruption detected.
    #[error("Corrupted tree: {0}")]
    CorruptedTree(String),
}

impl IndexError {
    /// Create an InvalidOrder error with context
    pub fn invalid_order(order: usize, min_required: usize) -> Self {
        Self::InvalidOrder(format!(
            "Order {} is invalid (minimum required: {})",
            order, min_required
        ))
    }

    /// Create a DataIntegrityError with context
    pub fn data_integrity(context: &str, details: &str) -> Self {
        Self::DataIntegrityError(format!("{}: {}", context, details))
    }

    /// Create a CorruptedTree error with context
    pub fn corrupted_tree(component: &str, details: &str) -> Self {
        Self::CorruptedTree(format!("{} corruption: {}", component, details))
    }

    /// Check if this error is a lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound)
    }

    /// Check if this error is an order error
    pub fn is_order_error(&self) -> bool {
        matches!(self, Self::InvalidOrder(_))
    }
}

/// Public result type for index operations that may fail
pub type IndexResult<T> = Result<T, IndexError>;

/// Result type for key lookup operations
pub type KeyResult<T> = Result<T, IndexError>;

/// Result type for index modification operations
pub type ModifyResult<T> = Result<T, IndexError>;

/// Result type for index construction
pub type InitResult<T> = Result<T, IndexError>;

/// Result extension trait for attaching context to index errors
pub trait IndexResultExt<T> {
    /// Convert to an IndexResult with additional context
    fn with_context(self, context: &str) -> IndexResult<T>;

    /// Convert to an IndexResult with operation context
    fn with_operation(self, operation: &str) -> IndexResult<T>;

    /// Log error and continue with default value
    fn or_default_with_log(self) -> T
    where
        T: Default;
}

impl<T> IndexResultExt<T> for Result<T, IndexError> {
    fn with_context(self, context: &str) -> IndexResult<T> {
        self.map_err(|e| match e {
            IndexError::KeyNotFound => IndexError::KeyNotFound,
            IndexError::KeyAlreadyExists => IndexError::KeyAlreadyExists,
            IndexError::InvalidOrder(msg) => {
                IndexError::InvalidOrder(format!("{}: {}", context, msg))
            }
            IndexError::DataIntegrityError(msg) => IndexError::data_integrity(context, &msg),
            IndexError::CorruptedTree(msg) => IndexError::corrupted_tree(context, &msg),
        })
    }

    fn with_operation(self, operation: &str) -> IndexResult<T> {
        self.with_context(&format!("Operation '{}'", operation))
    }

    fn or_default_with_log(self) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "index operation failed, using default");
                T::default()
            }
        }
    }
}
