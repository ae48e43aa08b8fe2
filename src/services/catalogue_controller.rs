// src/services/catalogue_controller.rs
//
// Catalogue View Controller - the client-side state machine
//
// - Owns the view mode, the cached collection, the selection, search results
//   and one error slot per concern
// - Delegates drafts and validation to BookFormModel
// - Delegates every network effect to RemoteBookService
// - Transport failures end up in state, never in the caller's hands
//
// Every view transition bumps the generation. Requests carry the generation
// they were issued under and their responses are dropped if it has moved on.
// The state lock is never held across an await.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{
    Book, BookDraft, BookField, BookFormModel, BookId, ValidationError, ViewMode, VolumeSummary,
};
use crate::error::{AppError, AppResult};
use crate::events::{
    BookDeleted, BookSaved, CatalogueReloaded, EventBus, SearchCompleted, StaleResponseDiscarded,
    ViewModeChanged,
};
use crate::repositories::RemoteBookService;
use crate::services::confirmation::ConfirmationGate;

const FETCH_ERROR: &str = "Could not load books";
const LOOKUP_ERROR: &str = "Could not load book";
const SAVE_ERROR: &str = "Could not save book";
const DELETE_ERROR: &str = "Could not delete book";
const SEARCH_ERROR: &str = "Could not search books";

/// What happened to a user intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentOutcome {
    /// The result was applied to the controller state
    Applied,
    /// Validation failed; nothing was sent
    Rejected,
    /// The user declined the confirmation gate
    Declined,
    /// Nothing to do (blank search)
    Skipped,
    /// The remote call failed; the matching error slot is set
    Failed,
    /// The view moved on before the response arrived; it was discarded
    Stale,
}

/// One message per concern. A later success of the same kind clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorSlots {
    pub fetch: Option<String>,
    pub save: Option<String>,
    pub delete: Option<String>,
    pub search: Option<String>,
}

/// Requests currently awaiting a response, by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InFlight {
    pub reloads: usize,
    pub lookups: usize,
    pub saves: usize,
    pub deletes: usize,
    pub searches: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestKind {
    Reload,
    Lookup,
    Save,
    Delete,
    Search,
}

impl RequestKind {
    fn name(self) -> &'static str {
        match self {
            RequestKind::Reload => "reload",
            RequestKind::Lookup => "lookup",
            RequestKind::Save => "save",
            RequestKind::Delete => "delete",
            RequestKind::Search => "search",
        }
    }
}

impl InFlight {
    fn counter(&mut self, kind: RequestKind) -> &mut usize {
        match kind {
            RequestKind::Reload => &mut self.reloads,
            RequestKind::Lookup => &mut self.lookups,
            RequestKind::Save => &mut self.saves,
            RequestKind::Delete => &mut self.deletes,
            RequestKind::Search => &mut self.searches,
        }
    }

    pub fn any(&self) -> bool {
        self.reloads + self.lookups + self.saves + self.deletes + self.searches > 0
    }
}

#[derive(Debug, Clone, Copy)]
struct Ticket {
    generation: u64,
    kind: RequestKind,
}

#[derive(Debug, Default)]
struct CatalogueState {
    mode: ViewMode,
    generation: u64,
    books: Vec<Book>,
    selected: Option<Book>,
    form: BookFormModel,
    search_query: String,
    search_results: Vec<VolumeSummary>,
    errors: ErrorSlots,
    in_flight: InFlight,
}

impl CatalogueState {
    fn require(&self, mode: ViewMode, operation: &'static str) -> AppResult<()> {
        if self.mode != mode {
            return Err(AppError::InvalidTransition {
                operation,
                mode: self.mode,
            });
        }
        Ok(())
    }

    fn issue(&mut self, kind: RequestKind) -> Ticket {
        *self.in_flight.counter(kind) += 1;
        Ticket {
            generation: self.generation,
            kind,
        }
    }
}

/// Immutable copy of everything a front end needs to render.
#[derive(Debug, Clone)]
pub struct CatalogueSnapshot {
    pub mode: ViewMode,
    pub generation: u64,
    pub books: Vec<Book>,
    pub selected: Option<Book>,
    pub draft: BookDraft,
    pub editing_id: Option<BookId>,
    pub validation: Option<ValidationError>,
    pub search_query: String,
    pub search_results: Vec<VolumeSummary>,
    pub errors: ErrorSlots,
    pub in_flight: InFlight,
}

pub struct CatalogueViewController {
    service: Arc<dyn RemoteBookService>,
    event_bus: Arc<EventBus>,
    state: Mutex<CatalogueState>,
}

impl CatalogueViewController {
    pub fn new(service: Arc<dyn RemoteBookService>, event_bus: Arc<EventBus>) -> Self {
        Self {
            service,
            event_bus,
            state: Mutex::new(CatalogueState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, CatalogueState> {
        // No code path panics while holding the lock
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> CatalogueSnapshot {
        let state = self.state();
        CatalogueSnapshot {
            mode: state.mode,
            generation: state.generation,
            books: state.books.clone(),
            selected: state.selected.clone(),
            draft: state.form.draft().clone(),
            editing_id: state.form.editing_id().cloned(),
            validation: state.form.errors().cloned(),
            search_query: state.search_query.clone(),
            search_results: state.search_results.clone(),
            errors: state.errors.clone(),
            in_flight: state.in_flight,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.state().mode
    }

    /// Look a book up in the cached collection.
    pub fn cached_book(&self, id: &BookId) -> Option<Book> {
        self.state().books.iter().find(|book| &book.id == id).cloned()
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    fn transition(&self, target: ViewMode) {
        let event = {
            let mut state = self.state();
            let from = state.mode;

            if from == ViewMode::Form && target != ViewMode::Form {
                state.form.reset();
            }
            if target != ViewMode::Search {
                state.selected = None;
            }
            state.mode = target;
            state.generation += 1;

            ViewModeChanged::new(from, target, state.generation)
        };

        log::debug!(
            "view {} -> {} (generation {})",
            event.from,
            event.to,
            event.generation
        );
        self.event_bus.emit(event);
    }

    /// Switch views. Entering the list reloads it.
    pub async fn navigate(&self, target: ViewMode) -> IntentOutcome {
        self.transition(target);
        if target == ViewMode::List {
            self.reload().await
        } else {
            IntentOutcome::Applied
        }
    }

    /// Open an empty form; submitting it creates a book.
    pub fn start_create(&self) {
        self.transition(ViewMode::Form);
        self.state().form.reset();
    }

    /// Open the form on a copy of `book`; submitting it updates that book.
    pub fn start_edit(&self, book: &Book) {
        self.transition(ViewMode::Form);
        self.state().form.load_from(book);
    }

    /// Open the form for `id` and fill it from a fresh copy of the record.
    pub async fn start_edit_by_id(&self, id: &BookId) -> IntentOutcome {
        self.transition(ViewMode::Form);
        let ticket = {
            let mut state = self.state();
            state.form.begin_session(id.clone());
            state.issue(RequestKind::Lookup)
        };

        let result = self.service.get(id).await;

        let Some(mut state) = self.settle(ticket) else {
            return IntentOutcome::Stale;
        };
        match result {
            Ok(book) => {
                state.errors.fetch = None;
                state.form.load_from(&book);
                IntentOutcome::Applied
            }
            Err(e) => {
                log::error!("failed to load book {} for editing: {}", id, e);
                state.errors.fetch = Some(LOOKUP_ERROR.to_string());
                IntentOutcome::Failed
            }
        }
    }

    pub fn show_details(&self, book: &Book) {
        self.transition(ViewMode::Details);
        self.state().selected = Some(book.clone());
    }

    pub async fn show_details_by_id(&self, id: &BookId) -> IntentOutcome {
        self.transition(ViewMode::Details);
        let ticket = self.state().issue(RequestKind::Lookup);

        let result = self.service.get(id).await;

        let Some(mut state) = self.settle(ticket) else {
            return IntentOutcome::Stale;
        };
        match result {
            Ok(book) => {
                state.errors.fetch = None;
                state.selected = Some(book);
                IntentOutcome::Applied
            }
            Err(e) => {
                log::error!("failed to load book {}: {}", id, e);
                state.errors.fetch = Some(LOOKUP_ERROR.to_string());
                IntentOutcome::Failed
            }
        }
    }

    // ========================================================================
    // FORM
    // ========================================================================

    pub fn set_field(&self, field: BookField, value: impl Into<String>) -> AppResult<()> {
        let mut state = self.state();
        state.require(ViewMode::Form, "set_field")?;
        state.form.set_field(field, value);
        Ok(())
    }

    /// Validate the draft and create or update depending on the editing session.
    pub async fn submit(&self) -> AppResult<IntentOutcome> {
        let (ticket, details, editing_id) = {
            let mut state = self.state();
            state.require(ViewMode::Form, "submit")?;

            match state.form.validate_and_record() {
                Err(errors) => {
                    log::info!("submission rejected: {}", errors);
                    return Ok(IntentOutcome::Rejected);
                }
                Ok(details) => {
                    let editing_id = state.form.editing_id().cloned();
                    (state.issue(RequestKind::Save), details, editing_id)
                }
            }
        };

        let result = match &editing_id {
            Some(id) => self.service.update(id, &details).await,
            None => self.service.create(&details).await,
        };

        let saved = {
            let Some(mut state) = self.settle(ticket) else {
                return Ok(IntentOutcome::Stale);
            };
            match result {
                Ok(book) => {
                    state.errors.save = None;
                    state.form.reset();
                    BookSaved::new(book.id, book.details.title, editing_id.is_none())
                }
                Err(e) => {
                    // Draft stays so the user can retry without retyping
                    log::error!("failed to save book: {}", e);
                    state.errors.save = Some(SAVE_ERROR.to_string());
                    return Ok(IntentOutcome::Failed);
                }
            }
        };

        log::info!(
            "{} book {} ({})",
            if saved.created { "created" } else { "updated" },
            saved.book_id,
            saved.title
        );
        self.event_bus.emit(saved);

        self.navigate(ViewMode::List).await;
        Ok(IntentOutcome::Applied)
    }

    // ========================================================================
    // COLLECTION
    // ========================================================================

    /// Delete a book once the gate says yes, then reload the list.
    pub async fn remove(&self, id: &BookId, gate: &dyn ConfirmationGate) -> IntentOutcome {
        let prompt = match self.cached_book(id) {
            Some(book) => format!("Delete \"{}\"?", book.title()),
            None => format!("Delete book {}?", id),
        };
        if !gate.confirm(&prompt) {
            log::debug!("delete of {} declined", id);
            return IntentOutcome::Declined;
        }

        let ticket = self.state().issue(RequestKind::Delete);
        let result = self.service.delete(id).await;

        {
            let Some(mut state) = self.settle(ticket) else {
                return IntentOutcome::Stale;
            };
            if let Err(e) = result {
                // The list is left as it was; the user retries by hand
                log::error!("failed to delete book {}: {}", id, e);
                state.errors.delete = Some(DELETE_ERROR.to_string());
                return IntentOutcome::Failed;
            }
            state.errors.delete = None;
            if state.selected.as_ref().is_some_and(|book| &book.id == id) {
                state.selected = None;
            }
        }

        log::info!("deleted book {}", id);
        self.event_bus.emit(BookDeleted::new(id.clone()));
        self.reload().await;
        IntentOutcome::Applied
    }

    /// Replace the cached collection with the server's. A failure empties it.
    pub async fn reload(&self) -> IntentOutcome {
        let ticket = self.state().issue(RequestKind::Reload);
        let result = self.service.list().await;

        let (event, outcome) = {
            let Some(mut state) = self.settle(ticket) else {
                return IntentOutcome::Stale;
            };
            match result {
                Ok(books) => {
                    state.books = books;
                    state.errors.fetch = None;
                    (
                        CatalogueReloaded::new(state.books.len(), true),
                        IntentOutcome::Applied,
                    )
                }
                Err(e) => {
                    // An old list could be mistaken for current truth
                    log::error!("failed to load books: {}", e);
                    state.books.clear();
                    state.errors.fetch = Some(FETCH_ERROR.to_string());
                    (CatalogueReloaded::new(0, false), IntentOutcome::Failed)
                }
            }
        };

        self.event_bus.emit(event);
        outcome
    }

    // ========================================================================
    // SEARCH
    // ========================================================================

    /// Query the external provider. Blank queries change nothing.
    pub async fn search(&self, query: &str) -> AppResult<IntentOutcome> {
        let query = query.trim();
        let ticket = {
            let mut state = self.state();
            state.require(ViewMode::Search, "search")?;
            if query.is_empty() {
                return Ok(IntentOutcome::Skipped);
            }
            state.search_query = query.to_string();
            state.issue(RequestKind::Search)
        };

        let result = self.service.search(query).await;

        let event = {
            let Some(mut state) = self.settle(ticket) else {
                return Ok(IntentOutcome::Stale);
            };
            match result {
                Ok(results) => {
                    state.errors.search = None;
                    state.search_results = results;
                    SearchCompleted::new(query.to_string(), state.search_results.len())
                }
                Err(e) => {
                    log::warn!("search for {:?} failed: {}", query, e);
                    state.errors.search = Some(SEARCH_ERROR.to_string());
                    return Ok(IntentOutcome::Failed);
                }
            }
        };

        self.event_bus.emit(event);
        Ok(IntentOutcome::Applied)
    }

    // ========================================================================
    // INTERNAL: request bookkeeping
    // ========================================================================

    /// Re-acquire the state for a finished request, or `None` if it is stale.
    fn settle(&self, ticket: Ticket) -> Option<MutexGuard<'_, CatalogueState>> {
        let mut state = self.state();
        let counter = state.in_flight.counter(ticket.kind);
        *counter = counter.saturating_sub(1);

        if state.generation == ticket.generation {
            return Some(state);
        }

        let current = state.generation;
        drop(state);

        log::debug!(
            "discarding {} response from generation {} (now {})",
            ticket.kind.name(),
            ticket.generation,
            current
        );
        self.event_bus.emit(StaleResponseDiscarded::new(
            ticket.kind.name(),
            ticket.generation,
            current,
        ));
        None
    }
}
