// src/integrations/http.rs
//
// Shared HTTP plumbing for the integration clients.

use reqwest::{header, Client, RequestBuilder, Response};
use std::time::Duration;

use crate::error::{AppError, AppResult};

const USER_AGENT: &str = concat!("book-catalogue/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client used by every integration.
pub fn build_http_client(timeout: Duration) -> AppResult<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );

    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()?;
    Ok(client)
}

/// Send a request and turn a non-2xx status into `RemoteStatus`.
pub async fn send_checked(request: RequestBuilder) -> AppResult<Response> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(AppError::RemoteStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    Ok(response)
}

/// Decode error helper for payloads that parse as JSON but break our contract.
pub fn contract_violation(message: impl std::fmt::Display) -> AppError {
    AppError::Decode(<serde_json::Error as serde::de::Error>::custom(message))
}
