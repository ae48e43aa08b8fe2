// src/integrations/catalogue_api/client.rs
//
// REST client for the `/books` collection.
//
// - GET    /books       -> array of Book
// - GET    /books/{id}  -> Book
// - POST   /books       -> created Book
// - PUT    /books/{id}  -> updated Book
// - DELETE /books/{id}  -> ack (ignored)
//
// Records are decoded leniently: numeric fields may arrive as numeric
// strings and `description` may be missing. An empty `rating` or `price`
// reads as 0. `pages` must be a whole count of at least one, so an empty,
// missing or zero `pages` is rejected.
// Anything else that does not fit the Book shape fails the whole response.

use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

use crate::config::parse_url;
use crate::domain::book::invariants::MIN_PAGES;
use crate::domain::{Book, BookDetails, BookId};
use crate::error::{AppError, AppResult};
use crate::integrations::http::{build_http_client, contract_violation, send_checked};

/// A number that may have been stored as text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
}

impl LenientNumber {
    fn to_f64(&self, field: &str) -> AppResult<f64> {
        let value = match self {
            LenientNumber::Number(value) => *value,
            LenientNumber::Text(text) if text.trim().is_empty() => 0.0,
            LenientNumber::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                contract_violation(format!("{} is not a number: {:?}", field, text))
            })?,
        };
        if !value.is_finite() {
            return Err(contract_violation(format!("{} is not finite", field)));
        }
        Ok(value)
    }

    fn to_u32(&self, field: &str) -> AppResult<u32> {
        if matches!(self, LenientNumber::Text(text) if text.trim().is_empty()) {
            return Err(contract_violation(format!("{} is empty", field)));
        }
        let value = self.to_f64(field)?;
        if value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
            return Err(contract_violation(format!(
                "{} is not a whole count: {}",
                field, value
            )));
        }
        Ok(value as u32)
    }
}

impl Default for LenientNumber {
    fn default() -> Self {
        LenientNumber::Number(0.0)
    }
}

/// Book as it travels on the wire
#[derive(Debug, Deserialize)]
struct BookRecord {
    #[serde(default, alias = "_id")]
    id: Option<BookId>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    genre: String,
    #[serde(default)]
    pages: LenientNumber,
    #[serde(default)]
    rating: LenientNumber,
    #[serde(default)]
    price: LenientNumber,
}

impl BookRecord {
    /// `fallback_id` covers servers that echo an update without its id.
    fn into_book(self, fallback_id: Option<&BookId>) -> AppResult<Book> {
        let id = self
            .id
            .or_else(|| fallback_id.cloned())
            .ok_or_else(|| contract_violation("book record has no id"))?;

        let pages = self.pages.to_u32("pages")?;
        if pages < MIN_PAGES {
            return Err(contract_violation(format!(
                "pages must be at least {}, got {}",
                MIN_PAGES, pages
            )));
        }

        Ok(Book::new(
            id,
            BookDetails {
                pages,
                rating: self.rating.to_f64("rating")?,
                price: self.price.to_f64("price")?,
                title: self.title,
                author: self.author,
                description: self.description.unwrap_or_default(),
                genre: self.genre,
            },
        ))
    }
}

pub fn parse_book_list(body: &str) -> AppResult<Vec<Book>> {
    let records: Vec<BookRecord> = serde_json::from_str(body)?;
    records
        .into_iter()
        .map(|record| record.into_book(None))
        .collect()
}

pub fn parse_book(body: &str, fallback_id: Option<&BookId>) -> AppResult<Book> {
    let record: BookRecord = serde_json::from_str(body)?;
    record.into_book(fallback_id)
}

/// Catalogue API client
pub struct CatalogueApiClient {
    books_url: Url,
    http_client: Client,
}

impl CatalogueApiClient {
    pub fn new(books_url: &str, timeout: Duration) -> AppResult<Self> {
        Ok(Self::with_client(
            parse_url(books_url)?,
            build_http_client(timeout)?,
        ))
    }

    pub fn with_client(books_url: Url, http_client: Client) -> Self {
        Self {
            books_url,
            http_client,
        }
    }

    pub fn books_url(&self) -> &Url {
        &self.books_url
    }

    /// `{books_url}/{id}` with the id percent-encoded as one path segment.
    pub fn book_url(&self, id: &BookId) -> AppResult<Url> {
        let mut url = self.books_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::InvalidUrl {
                url: self.books_url.to_string(),
                reason: "cannot be a base URL".to_string(),
            })?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        let response = send_checked(self.http_client.get(self.books_url.clone())).await?;
        parse_book_list(&response.text().await?)
    }

    pub async fn get_book(&self, id: &BookId) -> AppResult<Book> {
        let url = self.book_url(id)?;
        let response = send_checked(self.http_client.get(url)).await?;
        parse_book(&response.text().await?, Some(id))
    }

    pub async fn create_book(&self, details: &BookDetails) -> AppResult<Book> {
        let request = self.http_client.post(self.books_url.clone()).json(details);
        let response = send_checked(request).await?;
        parse_book(&response.text().await?, None)
    }

    pub async fn update_book(&self, id: &BookId, details: &BookDetails) -> AppResult<Book> {
        let url = self.book_url(id)?;
        let response = send_checked(self.http_client.put(url).json(details)).await?;
        let body = response.text().await?;

        if body.trim().is_empty() {
            // Some servers acknowledge a PUT with an empty body
            return Ok(Book::new(id.clone(), details.clone()));
        }
        parse_book(&body, Some(id))
    }

    pub async fn delete_book(&self, id: &BookId) -> AppResult<()> {
        let url = self.book_url(id)?;
        send_checked(self.http_client.delete(url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CatalogueApiClient {
        CatalogueApiClient::new("http://localhost:8080/books", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_book_url_encodes_id() {
        let client = client();
        assert_eq!(
            client.book_url(&BookId::new("42")).unwrap().as_str(),
            "http://localhost:8080/books/42"
        );
        assert_eq!(
            client.book_url(&BookId::new("a/b c")).unwrap().as_str(),
            "http://localhost:8080/books/a%2Fb%20c"
        );
    }

    #[test]
    fn test_book_url_with_trailing_slash() {
        let client =
            CatalogueApiClient::new("http://localhost:8080/books/", Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            client.book_url(&BookId::new("7")).unwrap().as_str(),
            "http://localhost:8080/books/7"
        );
    }

    #[test]
    fn test_parse_list() {
        let body = r#"[
            {"id": "1", "title": "Dune", "author": "Herbert", "description": "Spice",
             "genre": "SciFi", "pages": 412, "rating": 4.5, "price": 9.99},
            {"id": 2, "title": "Emma", "author": "Austen",
             "genre": "Classic", "pages": "474", "rating": "4", "price": "0"}
        ]"#;

        let books = parse_book_list(body).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].id, BookId::new("1"));
        assert_eq!(books[0].details.pages, 412);
        assert_eq!(books[1].id, BookId::new("2"));
        assert_eq!(books[1].details.description, "");
        assert_eq!(books[1].details.pages, 474);
        assert_eq!(books[1].details.rating, 4.0);
    }

    #[test]
    fn test_mongo_style_id() {
        let body = r#"{"_id": "65f0c2", "title": "Dune", "author": "Herbert",
                       "genre": "SciFi", "pages": 412, "rating": 4.5, "price": 9.99}"#;
        let book = parse_book(body, None).unwrap();
        assert_eq!(book.id.as_str(), "65f0c2");
    }

    #[test]
    fn test_missing_id_uses_fallback() {
        let body = r#"{"title": "Dune", "author": "Herbert", "genre": "SciFi",
                       "pages": 412, "rating": 4.5, "price": 9.99}"#;

        assert!(parse_book(body, None).is_err());
        let book = parse_book(body, Some(&BookId::new("9"))).unwrap();
        assert_eq!(book.id.as_str(), "9");
    }

    #[test]
    fn test_junk_numbers_fail_whole_list() {
        let body = r#"[
            {"id": "1", "title": "Dune", "author": "Herbert", "genre": "SciFi",
             "pages": "many", "rating": 4.5, "price": 9.99}
        ]"#;
        let error = parse_book_list(body).unwrap_err();
        assert!(matches!(error, AppError::Decode(_)));
    }

    #[test]
    fn test_fractional_pages_rejected() {
        let body = r#"{"id": "1", "title": "Dune", "author": "Herbert", "genre": "SciFi",
                       "pages": 41.5, "rating": 4.5, "price": 9.99}"#;
        assert!(parse_book(body, None).is_err());
    }

    #[test]
    fn test_empty_pages_rejected() {
        let body = r#"{"id": "1", "title": "Dune", "author": "Herbert", "genre": "SciFi",
                       "pages": "", "rating": "", "price": ""}"#;
        let error = parse_book(body, None).unwrap_err();
        assert!(matches!(error, AppError::Decode(_)));
        assert!(error.to_string().contains("pages is empty"));
    }

    #[test]
    fn test_zero_or_missing_pages_rejected() {
        let zero = r#"{"id": "1", "title": "Dune", "author": "Herbert", "genre": "SciFi",
                       "pages": 0, "rating": 4.5, "price": 9.99}"#;
        let missing = r#"{"id": "1", "title": "Dune", "author": "Herbert", "genre": "SciFi",
                          "rating": 4.5, "price": 9.99}"#;
        assert!(parse_book(zero, None).is_err());
        assert!(parse_book(missing, None).is_err());
    }

    #[test]
    fn test_empty_rating_and_price_read_as_zero() {
        let body = r#"{"id": "1", "title": "Dune", "author": "Herbert", "genre": "SciFi",
                       "pages": "412", "rating": "", "price": " "}"#;
        let book = parse_book(body, None).unwrap();
        assert_eq!(book.details.rating, 0.0);
        assert_eq!(book.details.price, 0.0);
    }

    #[test]
    fn test_non_array_list_is_decode_error() {
        let error = parse_book_list(r#"{"message": "oops"}"#).unwrap_err();
        assert!(error.is_transport());
    }
}
