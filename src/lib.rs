// src/lib.rs
// Book Catalogue - client for a remote book collection
//
// Architecture:
// - Domain-centric: field rules and the form model live in domain
// - Event-driven: the controller announces every change on the event bus
// - Explicit: requests are tagged with the view generation that issued them
// - Application Layer: front-end boundary (commands, DTOs, JSON-lines shell)

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod integrations;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    validate_book_details, Book, BookDetails, BookDraft, BookField, BookFormModel, BookId,
    DomainError, FieldDescriptor, FieldError, FieldKind, ValidationError, ViewMode, VolumeSummary,
    FIELD_DESCRIPTORS,
};

// ============================================================================
// PUBLIC API - Errors & Configuration
// ============================================================================

pub use crate::config::AppConfig;
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    BookDeleted, BookSaved, CatalogueReloaded, DomainEvent, EventBus, EventLogEntry,
    SearchCompleted, StaleResponseDiscarded, ViewModeChanged,
};

// ============================================================================
// PUBLIC API - Remote Access
// ============================================================================

pub use integrations::{CatalogueApiClient, VolumeSearchClient};
pub use repositories::{HttpRemoteBookService, RemoteBookService};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    CatalogueSnapshot, CatalogueViewController, ConfirmationGate, ErrorSlots, InFlight,
    IntentOutcome, Preconfirmed,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::AppState;

pub use application::commands;
pub use application::dto;
