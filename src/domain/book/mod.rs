pub mod entity;
pub mod invariants;

pub use entity::{Book, BookDetails, BookId};
pub use invariants::validate_book_details;
