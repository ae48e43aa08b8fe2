// src/events/mod.rs
//
// Internal Event System - Public API
//
// EventHandler is internal to the bus and must not be exported

pub mod bus;
pub mod types;

pub use types::DomainEvent;

pub use types::{
    BookDeleted, BookSaved, CatalogueReloaded, SearchCompleted, StaleResponseDiscarded,
    ViewModeChanged,
};

pub use bus::{EventBus, EventLogEntry, EVENT_LOG_CAPACITY};
