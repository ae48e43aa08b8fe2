// src/application/commands/form_commands.rs
//
// Form Command Handlers

use crate::application::{error_handling::ToErrorResponse, state::AppState};
use crate::domain::{BookField, BookId};
use crate::services::IntentOutcome;

use super::{view_catalogue, CommandResult};

/// Open an empty form
pub fn start_create(state: &AppState) -> CommandResult {
    state.catalogue.start_create();
    Ok(view_catalogue(state).with_outcome(IntentOutcome::Applied))
}

/// Open the form on an existing book, from the cache when it is listed
pub async fn start_edit(state: &AppState, id: BookId) -> CommandResult {
    let outcome = match state.catalogue.cached_book(&id) {
        Some(book) => {
            state.catalogue.start_edit(&book);
            IntentOutcome::Applied
        }
        None => state.catalogue.start_edit_by_id(&id).await,
    };
    Ok(view_catalogue(state).with_outcome(outcome))
}

/// Overwrite one draft field
pub fn set_field(state: &AppState, field: &str, value: String) -> CommandResult {
    let field = field.parse::<BookField>().to_error_response()?;
    state.catalogue.set_field(field, value).to_error_response()?;
    Ok(view_catalogue(state).with_outcome(IntentOutcome::Applied))
}

/// Validate and save the draft
pub async fn submit_form(state: &AppState) -> CommandResult {
    let outcome = state.catalogue.submit().await.to_error_response()?;
    Ok(view_catalogue(state).with_outcome(outcome))
}
