pub mod fields;
pub mod model;

pub use fields::{BookField, FieldDescriptor, FieldKind, FIELD_DESCRIPTORS};
pub use model::{BookDraft, BookFormModel, FieldError, ValidationError};
