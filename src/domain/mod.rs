// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod book;
pub mod form;
pub mod search;
pub mod view;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Book Domain
pub use book::{validate_book_details, Book, BookDetails, BookId};

// Form Domain
pub use form::{
    BookDraft, BookField, BookFormModel, FieldDescriptor, FieldError, FieldKind, ValidationError,
    FIELD_DESCRIPTORS,
};

// Search
pub use search::VolumeSummary;

// View
pub use view::ViewMode;

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Unknown book field: {0}")]
    UnknownField(String),

    #[error("Unknown view mode: {0}")]
    UnknownViewMode(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
