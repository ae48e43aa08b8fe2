// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod catalogue_controller;
pub mod confirmation;


pub use catalogue_controller::{
    CatalogueSnapshot, CatalogueViewController, ErrorSlots, InFlight, IntentOutcome,
};

pub use confirmation::{ConfirmationGate, Preconfirmed};

#[cfg(test)]
pub use confirmation::MockConfirmationGate;
