// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are front-end-friendly representations
// - DTOs are simple, serializable structs
// - Conversion FROM controller snapshots only (never TO)

use serde::Serialize;

use crate::domain::{Book, FieldKind, ViewMode, VolumeSummary, FIELD_DESCRIPTORS};
use crate::services::{CatalogueSnapshot, ErrorSlots, InFlight, IntentOutcome};

// ============================================================================
// BOOK DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookDto {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub genre: String,
    pub pages: u32,
    pub rating: f64,
    pub price: f64,
}

// ============================================================================
// FORM DTOs
// ============================================================================

/// One rendered form row, driven by the field descriptor table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDto {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormDto {
    pub editing_id: Option<String>,
    pub fields: Vec<FieldDto>,
}

// ============================================================================
// SEARCH DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeDto {
    pub id: String,
    pub title: String,
    pub byline: String,
    pub info_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchDto {
    pub query: String,
    pub results: Vec<VolumeDto>,
}

// ============================================================================
// VIEW DTO
// ============================================================================

/// Everything a front end needs to draw the current screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogueViewDto {
    pub mode: ViewMode,
    pub generation: u64,
    pub books: Vec<BookDto>,
    pub selected: Option<BookDto>,
    /// Present only while the form is open
    pub form: Option<FormDto>,
    pub search: SearchDto,
    pub errors: ErrorSlots,
    pub busy: bool,
    pub in_flight: InFlight,
    /// How the intent that produced this view was handled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<IntentOutcome>,
}

impl CatalogueViewDto {
    pub fn with_outcome(mut self, outcome: IntentOutcome) -> Self {
        self.outcome = Some(outcome);
        self
    }
}

// ============================================================================
// CONVERSION HELPERS (Domain → DTO)
// ============================================================================

impl From<&Book> for BookDto {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.to_string(),
            title: book.details.title.clone(),
            author: book.details.author.clone(),
            description: book.details.description.clone(),
            genre: book.details.genre.clone(),
            pages: book.details.pages,
            rating: book.details.rating,
            price: book.details.price,
        }
    }
}

impl From<&VolumeSummary> for VolumeDto {
    fn from(volume: &VolumeSummary) -> Self {
        Self {
            id: volume.id.clone(),
            title: volume.title.clone(),
            byline: volume.byline(),
            info_link: volume.info_link.clone(),
        }
    }
}

impl From<&CatalogueSnapshot> for FormDto {
    fn from(snapshot: &CatalogueSnapshot) -> Self {
        let fields = FIELD_DESCRIPTORS
            .iter()
            .map(|descriptor| FieldDto {
                name: descriptor.field.name(),
                label: descriptor.label,
                kind: descriptor.kind,
                required: descriptor.required,
                value: snapshot.draft.get(descriptor.field).to_string(),
                error: snapshot
                    .validation
                    .as_ref()
                    .and_then(|validation| validation.for_field(descriptor.field))
                    .map(|error| error.to_string()),
            })
            .collect();

        Self {
            editing_id: snapshot.editing_id.as_ref().map(ToString::to_string),
            fields,
        }
    }
}

impl From<CatalogueSnapshot> for CatalogueViewDto {
    fn from(snapshot: CatalogueSnapshot) -> Self {
        let form = (snapshot.mode == ViewMode::Form).then(|| FormDto::from(&snapshot));

        Self {
            mode: snapshot.mode,
            generation: snapshot.generation,
            books: snapshot.books.iter().map(BookDto::from).collect(),
            selected: snapshot.selected.as_ref().map(BookDto::from),
            form,
            search: SearchDto {
                query: snapshot.search_query,
                results: snapshot.search_results.iter().map(VolumeDto::from).collect(),
            },
            errors: snapshot.errors,
            busy: snapshot.in_flight.any(),
            in_flight: snapshot.in_flight,
            outcome: None,
        }
    }
}
