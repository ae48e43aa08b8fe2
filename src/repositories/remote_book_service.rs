// src/repositories/remote_book_service.rs
//
// The I/O boundary of the catalogue: CRUD on the books collection plus the
// external search. Stateless; owns no catalogue data.

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::domain::{validate_book_details, Book, BookDetails, BookId, VolumeSummary};
use crate::error::AppResult;
use crate::integrations::{CatalogueApiClient, VolumeSearchClient};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteBookService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Book>>;
    async fn get(&self, id: &BookId) -> AppResult<Book>;
    async fn create(&self, details: &BookDetails) -> AppResult<Book>;
    async fn update(&self, id: &BookId, details: &BookDetails) -> AppResult<Book>;
    async fn delete(&self, id: &BookId) -> AppResult<()>;
    async fn search(&self, query: &str) -> AppResult<Vec<VolumeSummary>>;
}

pub struct HttpRemoteBookService {
    catalogue: CatalogueApiClient,
    search: VolumeSearchClient,
}

impl HttpRemoteBookService {
    pub fn new(catalogue: CatalogueApiClient, search: VolumeSearchClient) -> Self {
        Self { catalogue, search }
    }

    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let catalogue = CatalogueApiClient::new(&config.books_url(), config.timeout())?;
        let search = VolumeSearchClient::new(&config.search_url(), config.timeout())?;
        Ok(Self::new(catalogue, search))
    }
}

#[async_trait]
impl RemoteBookService for HttpRemoteBookService {
    async fn list(&self) -> AppResult<Vec<Book>> {
        log::debug!("GET {}", self.catalogue.books_url());
        self.catalogue.list_books().await
    }

    async fn get(&self, id: &BookId) -> AppResult<Book> {
        log::debug!("GET book {}", id);
        self.catalogue.get_book(id).await
    }

    async fn create(&self, details: &BookDetails) -> AppResult<Book> {
        validate_book_details(details)?;
        log::debug!("POST book {:?}", details.title);
        self.catalogue.create_book(details).await
    }

    async fn update(&self, id: &BookId, details: &BookDetails) -> AppResult<Book> {
        validate_book_details(details)?;
        log::debug!("PUT book {}", id);
        self.catalogue.update_book(id, details).await
    }

    async fn delete(&self, id: &BookId) -> AppResult<()> {
        log::debug!("DELETE book {}", id);
        self.catalogue.delete_book(id).await
    }

    async fn search(&self, query: &str) -> AppResult<Vec<VolumeSummary>> {
        log::debug!("search {:?}", query);
        self.search.search(query).await
    }
}
