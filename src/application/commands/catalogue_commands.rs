// src/application/commands/catalogue_commands.rs
//
// Catalogue Command Handlers
//
// RULES:
// - Parse names into domain types
// - Call the controller
// - Return the rendered view
// - Never contain business logic

use crate::application::{
    dto::CatalogueViewDto, error_handling::ToErrorResponse, state::AppState,
};
use crate::domain::{BookId, ViewMode};
use crate::services::{IntentOutcome, Preconfirmed};

use super::CommandResult;

/// Render the current state without changing it
pub fn view_catalogue(state: &AppState) -> CatalogueViewDto {
    CatalogueViewDto::from(state.catalogue.snapshot())
}

/// Switch to the named view
pub async fn navigate(state: &AppState, mode: &str) -> CommandResult {
    let mode = mode.parse::<ViewMode>().to_error_response()?;
    let outcome = state.catalogue.navigate(mode).await;
    Ok(view_catalogue(state).with_outcome(outcome))
}

/// Fetch the collection again
pub async fn reload_catalogue(state: &AppState) -> CommandResult {
    let outcome = state.catalogue.reload().await;
    Ok(view_catalogue(state).with_outcome(outcome))
}

/// Open the details view, from the cache when the book is listed
pub async fn show_details(state: &AppState, id: BookId) -> CommandResult {
    let outcome = match state.catalogue.cached_book(&id) {
        Some(book) => {
            state.catalogue.show_details(&book);
            IntentOutcome::Applied
        }
        None => state.catalogue.show_details_by_id(&id).await,
    };
    Ok(view_catalogue(state).with_outcome(outcome))
}

/// Delete a book. `confirmed` is the answer the front end already collected.
pub async fn remove_book(state: &AppState, id: BookId, confirmed: bool) -> CommandResult {
    let outcome = state
        .catalogue
        .remove(&id, &Preconfirmed(confirmed))
        .await;
    Ok(view_catalogue(state).with_outcome(outcome))
}
