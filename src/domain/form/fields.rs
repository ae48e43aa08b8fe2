use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::book::invariants::{MAX_RATING, MIN_PAGES, MIN_PRICE, MIN_RATING};
use crate::domain::DomainError;

/// The seven editable fields of a book, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookField {
    Title,
    Author,
    Description,
    Genre,
    Pages,
    Rating,
    Price,
}

impl BookField {
    pub const ALL: [BookField; 7] = [
        BookField::Title,
        BookField::Author,
        BookField::Description,
        BookField::Genre,
        BookField::Pages,
        BookField::Rating,
        BookField::Price,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Description => "description",
            BookField::Genre => "genre",
            BookField::Pages => "pages",
            BookField::Rating => "rating",
            BookField::Price => "price",
        }
    }

    pub fn descriptor(self) -> &'static FieldDescriptor {
        // FIELD_DESCRIPTORS is laid out in the same order as ALL
        &FIELD_DESCRIPTORS[self as usize]
    }
}

impl std::fmt::Display for BookField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BookField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| DomainError::UnknownField(s.to_string()))
    }
}

/// How a field's text is coerced on submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    Real,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub field: BookField,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FieldDescriptor {
    const fn text(field: BookField, label: &'static str, required: bool) -> Self {
        Self {
            field,
            label,
            kind: FieldKind::Text,
            required,
            min: None,
            max: None,
        }
    }

    const fn numeric(
        field: BookField,
        label: &'static str,
        kind: FieldKind,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Self {
        Self {
            field,
            label,
            kind,
            required: true,
            min,
            max,
        }
    }

    pub fn admits(&self, value: f64) -> bool {
        value.is_finite()
            && self.min.map_or(true, |min| value >= min)
            && self.max.map_or(true, |max| value <= max)
    }
}

/// Ordered field table. Validation and rendering both walk this list.
pub const FIELD_DESCRIPTORS: [FieldDescriptor; 7] = [
    FieldDescriptor::text(BookField::Title, "Title", true),
    FieldDescriptor::text(BookField::Author, "Author", true),
    FieldDescriptor::text(BookField::Description, "Description", false),
    FieldDescriptor::text(BookField::Genre, "Genre", true),
    FieldDescriptor::numeric(
        BookField::Pages,
        "Pages",
        FieldKind::Integer,
        Some(MIN_PAGES as f64),
        Some(u32::MAX as f64),
    ),
    FieldDescriptor::numeric(
        BookField::Rating,
        "Rating",
        FieldKind::Real,
        Some(MIN_RATING),
        Some(MAX_RATING),
    ),
    FieldDescriptor::numeric(BookField::Price, "Price", FieldKind::Real, Some(MIN_PRICE), None),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_order_matches_fields() {
        for field in BookField::ALL {
            assert_eq!(field.descriptor().field, field);
        }
    }

    #[test]
    fn test_field_from_name() {
        assert_eq!("pages".parse::<BookField>().unwrap(), BookField::Pages);
        assert!("isbn".parse::<BookField>().is_err());
        assert!("Title".parse::<BookField>().is_err());
    }

    #[test]
    fn test_rating_descriptor_bounds() {
        let rating = BookField::Rating.descriptor();
        assert!(rating.admits(0.0));
        assert!(rating.admits(5.0));
        assert!(!rating.admits(-1.0));
        assert!(!rating.admits(5.1));
    }
}
