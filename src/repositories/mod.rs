// src/repositories/mod.rs
//
// Repository layer
//
// RULES:
// - Repositories are DUMB request/response mappers
// - NO view state
// - NO event emission
// - Every call is stateless

pub mod remote_book_service;

pub use remote_book_service::{HttpRemoteBookService, RemoteBookService};

#[cfg(test)]
pub use remote_book_service::MockRemoteBookService;

#[cfg(test)]
pub(crate) mod gated_remote_book_service;

#[cfg(test)]
pub(crate) use gated_remote_book_service::GatedRemoteBookService;
