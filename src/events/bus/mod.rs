mod event_bus;

pub use event_bus::{EventBus, EventLogEntry, EVENT_LOG_CAPACITY};
