use super::entity::BookDetails;
use crate::domain::form::{BookField, FIELD_DESCRIPTORS};
use crate::domain::{DomainError, DomainResult};

pub const MIN_PAGES: u32 = 1;
pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;
pub const MIN_PRICE: f64 = 0.0;

/// Validates all book invariants on an already-typed payload.
/// Used as the last guard before a payload leaves the client.
///
/// Walks the same descriptor table the form validates against, so the
/// bounds live in one place.
pub fn validate_book_details(details: &BookDetails) -> DomainResult<()> {
    for descriptor in FIELD_DESCRIPTORS.iter() {
        match field_value(details, descriptor.field) {
            FieldValue::Text(text) => {
                if descriptor.required && text.trim().is_empty() {
                    return Err(DomainError::InvariantViolation(format!(
                        "{} cannot be empty",
                        descriptor.field
                    )));
                }
            }
            FieldValue::Number(value) => {
                if !descriptor.admits(value) {
                    return Err(DomainError::InvariantViolation(format!(
                        "{} is out of range: {}",
                        descriptor.field, value
                    )));
                }
            }
        }
    }
    Ok(())
}

enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
}

fn field_value(details: &BookDetails, field: BookField) -> FieldValue<'_> {
    match field {
        BookField::Title => FieldValue::Text(&details.title),
        BookField::Author => FieldValue::Text(&details.author),
        BookField::Description => FieldValue::Text(&details.description),
        BookField::Genre => FieldValue::Text(&details.genre),
        BookField::Pages => FieldValue::Number(f64::from(details.pages)),
        BookField::Rating => FieldValue::Number(details.rating),
        BookField::Price => FieldValue::Number(details.price),
    }
}
