//! Error Types
//!
//! This module defines the error types used throughout the pass manager.
//!
//! # Overview
//!
//! The main error type [`PassError`] covers all failure modes including:
//! - Malformed pass names and iteration suffixes
//! - Hierarchy invariant violations (duplicates, cross-hierarchy renames)
//! - Lookups of passes that do not exist
//! - Settings, serialization and collaborator failures
//!
//! None of these are fatal. Every store operation leaves the hierarchy in its
//! last valid state when it returns an error.
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, PassError>`.
//!
//! ```rust,ignore
//! use pass_core::errors::{PassError, Result};
//!
//! fn rename() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the pass manager.
#[derive(Error, Debug)]
pub enum PassError {
    // ========================================================================
    // Naming Errors
    // ========================================================================
    /// The name does not follow `type_category_iteration`.
    #[error("Malformed pass name '{0}': expected 'type_category_NN'")]
    MalformedName(String),

    /// The trailing iteration segment is not a positive integer.
    #[error("Bad iteration in pass name '{0}'")]
    BadIteration(String),

    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// A leaf with this name already exists somewhere in the store.
    #[error("A pass named '{0}' already exists")]
    DuplicateLeaf(String),

    /// The new name would move the leaf to another type or category.
    #[error("Pass '{name}' does not belong to '{expected_type}/{expected_category}'")]
    TypeOrCategoryMismatch {
        /// The rejected name
        name: String,
        /// Type the leaf currently lives under
        expected_type: String,
        /// Category the leaf currently lives under
        expected_category: String,
    },

    /// The path does not resolve to an existing leaf.
    #[error("Pass not found: {0}")]
    NotFound(String),

    // ========================================================================
    // Configuration & Serialization Errors
    // ========================================================================
    /// Settings failed validation.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ========================================================================
    // Collaborator Errors
    // ========================================================================
    /// The host network builder reported a failure.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The command queue has no receiver left.
    #[error("Command queue closed")]
    QueueClosed,
}

impl PassError {
    /// Returns `true` for the errors produced when a name fails to parse.
    #[inline]
    #[must_use]
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, Self::MalformedName(_) | Self::BadIteration(_))
    }
}

/// Alias for `Result<T, PassError>`.
pub type Result<T> = std::result::Result<T, PassError>;
