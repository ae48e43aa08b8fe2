// src/application/state.rs

use std::sync::Arc;

use crate::events::EventBus;
use crate::services::CatalogueViewController;

/// Shared handles for every command.
/// Built once in main.rs.
#[derive(Clone)]
pub struct AppState {
    pub event_bus: Arc<EventBus>,
    pub catalogue: Arc<CatalogueViewController>,
}
