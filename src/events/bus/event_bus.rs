// src/events/bus/event_bus.rs
//
// Synchronous, typed publish/subscribe.
//
// DESIGN PRINCIPLES:
// 1. Synchronous - handlers execute immediately in subscription order
// 2. Observable - every emission is logged
// 3. Type-safe - events are strongly typed
// 4. A panicking handler never takes the others down

use std::any::{Any, TypeId};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::events::types::DomainEvent;

/// Type-erased event handler function
type EventHandler = Box<dyn Fn(&dyn Any) + Send + Sync>;

type HandlerMap = HashMap<TypeId, Vec<EventHandler>>;

/// Entries kept in the event log. Older entries are dropped first.
pub const EVENT_LOG_CAPACITY: usize = 256;

/// Central coordination point between the controller and its observers.
///
/// Cloning shares the same subscriptions and log.
#[derive(Clone)]
pub struct EventBus {
    handlers: Arc<RwLock<HandlerMap>>,
    event_log: Arc<RwLock<VecDeque<EventLogEntry>>>,
    log_capacity: usize,
}

/// A logged event for debugging and tracing
#[derive(Debug, Clone)]
pub struct EventLogEntry {
    pub event_type: String,
    pub event_id: String,
    pub occurred_at: String,
    pub handler_count: usize,
}

// Locks are only poisoned by a panicking handler, which emit() already
// contains, so recovering the guard is sound.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_log_capacity(EVENT_LOG_CAPACITY)
    }

    /// A bus whose log keeps only the `capacity` most recent entries.
    pub fn with_log_capacity(capacity: usize) -> Self {
        Self {
            handlers: Arc::default(),
            event_log: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            log_capacity: capacity,
        }
    }

    /// Subscribe to a specific event type.
    ///
    /// ```ignore
    /// bus.subscribe::<BookSaved, _>(|event| {
    ///     log::info!("saved {}", event.title);
    /// });
    /// ```
    pub fn subscribe<E, F>(&self, handler: F)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let wrapped: EventHandler = Box::new(move |event_any: &dyn Any| {
            if let Some(event) = event_any.downcast_ref::<E>() {
                handler(event);
            } else {
                log::error!(
                    "failed to downcast event in handler for {}",
                    std::any::type_name::<E>()
                );
            }
        });

        write(&self.handlers)
            .entry(TypeId::of::<E>())
            .or_default()
            .push(wrapped);
    }

    /// Log the event, then run every handler for its type in subscription order.
    pub fn emit<E>(&self, event: E)
    where
        E: DomainEvent + 'static,
    {
        let handlers = read(&self.handlers);
        let event_handlers = handlers.get(&TypeId::of::<E>());

        let entry = EventLogEntry {
            event_type: event.event_type().to_string(),
            event_id: event.event_id().to_string(),
            occurred_at: event.occurred_at().to_rfc3339(),
            handler_count: event_handlers.map_or(0, Vec::len),
        };

        log::debug!(
            "[EVENT] {} (id: {}) | {} handlers",
            entry.event_type,
            entry.event_id,
            entry.handler_count
        );
        {
            let mut event_log = write(&self.event_log);
            if self.log_capacity > 0 {
                if event_log.len() == self.log_capacity {
                    event_log.pop_front();
                }
                event_log.push_back(entry);
            }
        }

        let Some(event_handlers) = event_handlers else {
            return;
        };

        for (idx, handler) in event_handlers.iter().enumerate() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler(&event as &dyn Any);
            }));

            if result.is_err() {
                log::error!("handler {} for {} panicked", idx, event.event_type());
            }
        }
    }

    /// The most recent entries, oldest first.
    pub fn get_event_log(&self) -> Vec<EventLogEntry> {
        read(&self.event_log).iter().cloned().collect()
    }

    pub fn clear_event_log(&self) {
        write(&self.event_log).clear();
    }

    pub fn subscriber_count<E>(&self) -> usize
    where
        E: 'static,
    {
        read(&self.handlers)
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}
