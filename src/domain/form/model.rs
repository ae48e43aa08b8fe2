use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::fields::{BookField, FieldDescriptor, FieldKind, FIELD_DESCRIPTORS};
use crate::domain::book::{Book, BookDetails, BookId};

/// The text-typed draft bound to the form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub description: String,
    pub genre: String,
    pub pages: String,
    pub rating: String,
    pub price: String,
}

impl BookDraft {
    pub fn get(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Description => &self.description,
            BookField::Genre => &self.genre,
            BookField::Pages => &self.pages,
            BookField::Rating => &self.rating,
            BookField::Price => &self.price,
        }
    }

    fn slot(&mut self, field: BookField) -> &mut String {
        match field {
            BookField::Title => &mut self.title,
            BookField::Author => &mut self.author,
            BookField::Description => &mut self.description,
            BookField::Genre => &mut self.genre,
            BookField::Pages => &mut self.pages,
            BookField::Rating => &mut self.rating,
            BookField::Price => &mut self.price,
        }
    }

    pub fn is_empty(&self) -> bool {
        BookField::ALL.iter().all(|field| self.get(*field).is_empty())
    }
}

impl From<&BookDetails> for BookDraft {
    fn from(details: &BookDetails) -> Self {
        // f64 Display is the shortest text that parses back to the same value
        Self {
            title: details.title.clone(),
            author: details.author.clone(),
            description: details.description.clone(),
            genre: details.genre.clone(),
            pages: details.pages.to_string(),
            rating: details.rating.to_string(),
            price: details.price.to_string(),
        }
    }
}

/// A single failing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum FieldError {
    #[error("{0} is required")]
    MissingField(BookField),

    #[error("{0} is out of range")]
    InvalidRange(BookField),
}

impl FieldError {
    pub fn field(&self) -> BookField {
        match self {
            FieldError::MissingField(field) | FieldError::InvalidRange(field) => *field,
        }
    }
}

/// Every failing field of a draft, in rule order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    fn new(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// The failure a fail-fast validator would have reported.
    pub fn first(&self) -> FieldError {
        self.errors[0]
    }

    pub fn for_field(&self, field: BookField) -> Option<FieldError> {
        self.errors.iter().copied().find(|error| error.field() == field)
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationError {}

enum FieldValue {
    Text,
    Integer(u32),
    Real(f64),
}

fn coerce(descriptor: &FieldDescriptor, raw: &str) -> Result<FieldValue, FieldError> {
    let field = descriptor.field;
    match descriptor.kind {
        FieldKind::Text => {
            if descriptor.required && raw.trim().is_empty() {
                Err(FieldError::MissingField(field))
            } else {
                Ok(FieldValue::Text)
            }
        }
        FieldKind::Integer => raw
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|value| descriptor.admits(*value as f64))
            .and_then(|value| u32::try_from(value).ok())
            .map(FieldValue::Integer)
            .ok_or(FieldError::InvalidRange(field)),
        FieldKind::Real => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| descriptor.admits(*value))
            .map(FieldValue::Real)
            .ok_or(FieldError::InvalidRange(field)),
    }
}

/// Owns the draft, the editing session and the last validation result.
#[derive(Debug, Clone, Default)]
pub struct BookFormModel {
    draft: BookDraft,
    editing_id: Option<BookId>,
    errors: Option<ValidationError>,
}

impl BookFormModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &BookDraft {
        &self.draft
    }

    /// Present when submission should update rather than create.
    pub fn editing_id(&self) -> Option<&BookId> {
        self.editing_id.as_ref()
    }

    pub fn errors(&self) -> Option<&ValidationError> {
        self.errors.as_ref()
    }

    /// Overwrites one field. Validation is deferred to submission.
    pub fn set_field(&mut self, field: BookField, value: impl Into<String>) {
        *self.draft.slot(field) = value.into();
    }

    pub fn reset(&mut self) {
        self.draft = BookDraft::default();
        self.editing_id = None;
        self.errors = None;
    }

    pub fn load_from(&mut self, book: &Book) {
        self.draft = BookDraft::from(&book.details);
        self.editing_id = Some(book.id.clone());
        self.errors = None;
    }

    /// Binds the form to an id whose fields have not arrived yet.
    pub fn begin_session(&mut self, id: BookId) {
        self.draft = BookDraft::default();
        self.editing_id = Some(id);
        self.errors = None;
    }

    /// Coerces the draft into a typed payload, collecting every failing field.
    pub fn validate(&self) -> Result<BookDetails, ValidationError> {
        let mut details = BookDetails {
            title: self.draft.title.clone(),
            author: self.draft.author.clone(),
            description: self.draft.description.clone(),
            genre: self.draft.genre.clone(),
            ..BookDetails::default()
        };
        let mut errors = Vec::new();

        for descriptor in FIELD_DESCRIPTORS.iter() {
            match coerce(descriptor, self.draft.get(descriptor.field)) {
                Ok(FieldValue::Text) => {}
                Ok(FieldValue::Integer(pages)) => details.pages = pages,
                Ok(FieldValue::Real(value)) => match descriptor.field {
                    BookField::Rating => details.rating = value,
                    _ => details.price = value,
                },
                Err(error) => errors.push(error),
            }
        }

        match ValidationError::new(errors) {
            Some(error) => Err(error),
            None => Ok(details),
        }
    }

    /// Like `validate`, but remembers the outcome for rendering.
    pub fn validate_and_record(&mut self) -> Result<BookDetails, ValidationError> {
        let result = self.validate();
        self.errors = result.as_ref().err().cloned();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> BookFormModel {
        let mut form = BookFormModel::new();
        form.set_field(BookField::Title, "Dune");
        form.set_field(BookField::Author, "Herbert");
        form.set_field(BookField::Genre, "SciFi");
        form.set_field(BookField::Pages, "412");
        form.set_field(BookField::Rating, "4.5");
        form.set_field(BookField::Price, "9.99");
        form
    }

    fn single_error(form: &BookFormModel) -> FieldError {
        let error = form.validate().unwrap_err();
        assert_eq!(error.errors().len(), 1, "unexpected errors: {}", error);
        error.first()
    }

    #[test]
    fn test_valid_draft_normalizes_numbers() {
        let details = filled().validate().unwrap();
        assert_eq!(details.title, "Dune");
        assert_eq!(details.description, "");
        assert_eq!(details.pages, 412);
        assert_eq!(details.rating, 4.5);
        assert_eq!(details.price, 9.99);
    }

    #[test]
    fn test_required_text_fields() {
        for field in [BookField::Title, BookField::Author, BookField::Genre] {
            let mut form = filled();
            form.set_field(field, "   ");
            assert_eq!(single_error(&form), FieldError::MissingField(field));
        }
    }

    #[test]
    fn test_description_may_be_empty() {
        let mut form = filled();
        form.set_field(BookField::Description, "");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_pages_must_be_positive_integer() {
        for raw in ["0", "-3", "abc", "", "12.5", "99999999999"] {
            let mut form = filled();
            form.set_field(BookField::Pages, raw);
            assert_eq!(
                single_error(&form),
                FieldError::InvalidRange(BookField::Pages),
                "pages = {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_pages_tolerates_surrounding_whitespace() {
        let mut form = filled();
        form.set_field(BookField::Pages, " 300 ");
        assert_eq!(form.validate().unwrap().pages, 300);
    }

    #[test]
    fn test_rating_range() {
        for raw in ["-1", "5.1", "great", "NaN", "inf"] {
            let mut form = filled();
            form.set_field(BookField::Rating, raw);
            assert_eq!(
                single_error(&form),
                FieldError::InvalidRange(BookField::Rating),
                "rating = {:?}",
                raw
            );
        }
        for raw in ["0", "5", "2.75"] {
            let mut form = filled();
            form.set_field(BookField::Rating, raw);
            assert!(form.validate().is_ok(), "rating = {:?}", raw);
        }
    }

    #[test]
    fn test_price_must_be_non_negative() {
        for raw in ["-0.01", "free", "inf"] {
            let mut form = filled();
            form.set_field(BookField::Price, raw);
            assert_eq!(single_error(&form), FieldError::InvalidRange(BookField::Price));
        }
        let mut form = filled();
        form.set_field(BookField::Price, "0");
        assert_eq!(form.validate().unwrap().price, 0.0);
    }

    #[test]
    fn test_collects_all_failures_in_rule_order() {
        let form = BookFormModel::new();
        let error = form.validate().unwrap_err();
        assert_eq!(
            error.errors(),
            &[
                FieldError::MissingField(BookField::Title),
                FieldError::MissingField(BookField::Author),
                FieldError::MissingField(BookField::Genre),
                FieldError::InvalidRange(BookField::Pages),
                FieldError::InvalidRange(BookField::Rating),
                FieldError::InvalidRange(BookField::Price),
            ]
        );
        assert_eq!(error.first(), FieldError::MissingField(BookField::Title));
        assert_eq!(error.for_field(BookField::Description), None);
    }

    #[test]
    fn test_error_message_joins_fields() {
        let mut form = filled();
        form.set_field(BookField::Title, "");
        form.set_field(BookField::Price, "-2");
        let error = form.validate().unwrap_err();
        assert_eq!(error.to_string(), "title is required; price is out of range");
    }

    #[test]
    fn test_load_from_round_trips() {
        let book = Book::new(
            BookId::new("b-1"),
            BookDetails {
                title: "The Left Hand of Darkness".to_string(),
                author: "Le Guin".to_string(),
                description: "Gethen, in winter".to_string(),
                genre: "SciFi".to_string(),
                pages: 304,
                rating: 4.25,
                price: 0.1 + 0.2,
            },
        );

        let mut form = BookFormModel::new();
        form.load_from(&book);

        assert_eq!(form.editing_id(), Some(&book.id));
        assert_eq!(form.validate().unwrap(), book.details);
    }

    #[test]
    fn test_reset_clears_session_and_errors() {
        let mut form = filled();
        form.begin_session(BookId::new("9"));
        assert!(form.validate_and_record().is_err());
        assert!(form.errors().is_some());

        form.reset();
        assert!(form.draft().is_empty());
        assert!(form.editing_id().is_none());
        assert!(form.errors().is_none());
    }

    #[test]
    fn test_validate_and_record_clears_on_success() {
        let mut form = filled();
        form.set_field(BookField::Pages, "0");
        assert!(form.validate_and_record().is_err());

        form.set_field(BookField::Pages, "1");
        assert!(form.validate_and_record().is_ok());
        assert!(form.errors().is_none());
    }
}
