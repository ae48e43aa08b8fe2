// src/integrations/mod.rs
//
// External Integrations Module
//
// - Infrastructure, not domain: clients map wire payloads to domain values
// - Never touch controller state

pub mod catalogue_api;
pub mod http;
pub mod volume_search;

pub use catalogue_api::client::CatalogueApiClient;
pub use volume_search::client::VolumeSearchClient;
