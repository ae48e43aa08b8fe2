// src/application/commands/search_commands.rs
//
// Search Command Handlers

use crate::application::{error_handling::ToErrorResponse, state::AppState};

use super::{view_catalogue, CommandResult};

/// Query the external provider from the search view
pub async fn search_books(state: &AppState, query: &str) -> CommandResult {
    let outcome = state.catalogue.search(query).await.to_error_response()?;
    Ok(view_catalogue(state).with_outcome(outcome))
}
