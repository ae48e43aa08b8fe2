// src/application/commands/mod.rs
//
// Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between a front end and the controller
// - Commands accept plain values, return the rendered view
// - Commands handle error conversion for the front end
// - Commands NEVER contain business logic

pub mod catalogue_commands;
pub mod form_commands;
pub mod search_commands;

pub use catalogue_commands::*;
pub use form_commands::*;
pub use search_commands::*;

use crate::application::{dto::CatalogueViewDto, error_handling::ErrorResponse};

/// What every command returns
pub type CommandResult = Result<CatalogueViewDto, ErrorResponse>;
