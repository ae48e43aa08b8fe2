// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Boundary between a front end and the catalogue controller
// - Translates controller snapshots into DTOs
// - Translates AppError into ErrorResponse
// - The JSON-lines shell is one such front end

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod shell;
pub mod state;

pub use commands::*;
pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use shell::{run_shell, Intent};
pub use state::AppState;
