// src/events/types.rs
//
// Facts emitted by the catalogue controller.
//
// RULES:
// - Events are facts, not commands
// - Events carry only the data a listener needs to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{BookId, ViewMode};

/// Trait that all catalogue events implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

macro_rules! impl_domain_event {
    ($name:ident) => {
        impl DomainEvent for $name {
            fn event_id(&self) -> Uuid {
                self.event_id
            }
            fn occurred_at(&self) -> DateTime<Utc> {
                self.occurred_at
            }
            fn event_type(&self) -> &'static str {
                stringify!($name)
            }
        }
    };
}

// ============================================================================
// VIEW EVENTS
// ============================================================================

/// Emitted on every view transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewModeChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub from: ViewMode,
    pub to: ViewMode,
    pub generation: u64,
}

impl ViewModeChanged {
    pub fn new(from: ViewMode, to: ViewMode, generation: u64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            from,
            to,
            generation,
        }
    }
}

impl_domain_event!(ViewModeChanged);

// ============================================================================
// CATALOGUE EVENTS
// ============================================================================

/// Emitted when a list reload finished, successfully or not
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogueReloaded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub book_count: usize,
    pub succeeded: bool,
}

impl CatalogueReloaded {
    pub fn new(book_count: usize, succeeded: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            book_count,
            succeeded,
        }
    }
}

impl_domain_event!(CatalogueReloaded);

/// Emitted when the remote service accepted a create or update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSaved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub book_id: BookId,
    pub title: String,
    pub created: bool,
}

impl BookSaved {
    pub fn new(book_id: BookId, title: String, created: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            book_id,
            title,
            created,
        }
    }
}

impl_domain_event!(BookSaved);

/// Emitted when the remote service confirmed a delete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub book_id: BookId,
}

impl BookDeleted {
    pub fn new(book_id: BookId) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            book_id,
        }
    }
}

impl_domain_event!(BookDeleted);

// ============================================================================
// SEARCH EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCompleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub query: String,
    pub result_count: usize,
}

impl SearchCompleted {
    pub fn new(query: String, result_count: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            query,
            result_count,
        }
    }
}

impl_domain_event!(SearchCompleted);

// ============================================================================
// REQUEST LIFECYCLE
// ============================================================================

/// Emitted when a response arrives for a view that is no longer current
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaleResponseDiscarded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub request: String,
    pub issued_generation: u64,
    pub current_generation: u64,
}

impl StaleResponseDiscarded {
    pub fn new(request: &str, issued_generation: u64, current_generation: u64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            request: request.to_string(),
            issued_generation,
            current_generation,
        }
    }
}

impl_domain_event!(StaleResponseDiscarded);
