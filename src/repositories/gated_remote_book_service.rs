// src/repositories/gated_remote_book_service.rs
//
// Test double whose `list` and `create` responses are released by the test.
// Lets a test interleave user intents with requests that are still in flight.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::oneshot;

use crate::domain::{Book, BookDetails, BookId, VolumeSummary};
use crate::error::{AppError, AppResult};
use crate::repositories::RemoteBookService;

type Gate<T> = Mutex<VecDeque<oneshot::Receiver<AppResult<T>>>>;

#[derive(Default)]
pub struct GatedRemoteBookService {
    lists: Gate<Vec<Book>>,
    creates: Gate<Book>,
}

impl GatedRemoteBookService {
    /// The next `list` call waits for the returned sender.
    pub fn gate_list(&self) -> oneshot::Sender<AppResult<Vec<Book>>> {
        let (tx, rx) = oneshot::channel();
        self.lists.lock().unwrap().push_back(rx);
        tx
    }

    /// The next `create` call waits for the returned sender.
    pub fn gate_create(&self) -> oneshot::Sender<AppResult<Book>> {
        let (tx, rx) = oneshot::channel();
        self.creates.lock().unwrap().push_back(rx);
        tx
    }
}

fn unexpected<T>() -> AppResult<T> {
    Err(AppError::Other("unexpected call".to_string()))
}

async fn released<T>(gate: &Gate<T>) -> AppResult<T> {
    let rx = gate.lock().unwrap().pop_front();
    match rx {
        Some(rx) => rx
            .await
            .unwrap_or_else(|_| Err(AppError::Other("gate dropped".to_string()))),
        None => unexpected(),
    }
}

#[async_trait]
impl RemoteBookService for GatedRemoteBookService {
    async fn list(&self) -> AppResult<Vec<Book>> {
        released(&self.lists).await
    }
    async fn get(&self, _id: &BookId) -> AppResult<Book> {
        unexpected()
    }
    async fn create(&self, _details: &BookDetails) -> AppResult<Book> {
        released(&self.creates).await
    }
    async fn update(&self, _id: &BookId, _details: &BookDetails) -> AppResult<Book> {
        unexpected()
    }
    async fn delete(&self, _id: &BookId) -> AppResult<()> {
        unexpected()
    }
    async fn search(&self, _query: &str) -> AppResult<Vec<VolumeSummary>> {
        unexpected()
    }
}
