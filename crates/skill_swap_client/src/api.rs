//! crates/skill_swap_client/src/api.rs
//!
//! The client-side contract for the swap board REST API, and its `reqwest`
//! implementation.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, error};
use uuid::Uuid;

use crate::model::{ErrorBody, InterestFields, SwapDocument, SwapFields};

const INVALID_INDEX_MESSAGE: &str = "Invalid user index";

//=========================================================================================
// Client Error and Result Types
//=========================================================================================

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        details: BTreeMap<String, Option<String>>,
    },
    #[error("Invalid user index")]
    InvalidIndex,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

//=========================================================================================
// The API Port
//=========================================================================================

#[async_trait]
pub trait SwapApi: Send + Sync {
    async fn list_swaps(&self) -> ClientResult<Vec<SwapDocument>>;

    async fn create_swap(&self, fields: &SwapFields) -> ClientResult<SwapDocument>;

    async fn update_swap(&self, id: Uuid, fields: &SwapFields) -> ClientResult<SwapDocument>;

    /// The server only confirms deletion; it does not return the document.
    async fn delete_swap(&self, id: Uuid) -> ClientResult<()>;

    async fn add_interest(&self, id: Uuid, fields: &InterestFields) -> ClientResult<SwapDocument>;

    async fn update_interest_at(
        &self,
        id: Uuid,
        index: usize,
        fields: &InterestFields,
    ) -> ClientResult<SwapDocument>;

    async fn delete_interest_at(&self, id: Uuid, index: usize) -> ClientResult<SwapDocument>;

    async fn update_interest(
        &self,
        id: Uuid,
        interest_id: Uuid,
        fields: &InterestFields,
    ) -> ClientResult<SwapDocument>;

    async fn delete_interest(&self, id: Uuid, interest_id: Uuid) -> ClientResult<SwapDocument>;
}

//=========================================================================================
// HTTP Implementation
//=========================================================================================

/// Talks to a running API service over HTTP.
#[derive(Clone)]
pub struct HttpSwapApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSwapApi {
    /// `base_url` is the service root, e.g. `http://localhost:5001`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api/swaps{}", self.base_url, path);
        debug!("{} {}", method, url);
        self.http.request(method, url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        if response.status().is_success() {
            return Ok(response.json::<T>().await?);
        }
        Err(error_from_response(response).await)
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        self.send(self.request(method, path).json(body)).await
    }
}

/// Maps a non-success response onto the client error taxonomy.
pub(crate) fn classify_error(status: StatusCode, body: ErrorBody) -> ClientError {
    match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(body.message),
        StatusCode::BAD_REQUEST if body.message == INVALID_INDEX_MESSAGE => ClientError::InvalidIndex,
        StatusCode::BAD_REQUEST => ClientError::Validation {
            message: body.message,
            details: body.details.unwrap_or_default(),
        },
        StatusCode::CONFLICT => ClientError::Conflict(body.message),
        _ => ClientError::Server {
            status: status.as_u16(),
            message: body.message,
        },
    }
}

async fn error_from_response(response: Response) -> ClientError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ErrorBody>(&text).unwrap_or_else(|_| ErrorBody {
        message: text,
        details: None,
    });
    if status.is_server_error() {
        error!("Swap board returned {}: {}", status, body.message);
    }
    classify_error(status, body)
}

#[async_trait]
impl SwapApi for HttpSwapApi {
    async fn list_swaps(&self) -> ClientResult<Vec<SwapDocument>> {
        self.send(self.request(Method::GET, "")).await
    }

    async fn create_swap(&self, fields: &SwapFields) -> ClientResult<SwapDocument> {
        self.send_json(Method::POST, "", fields).await
    }

    async fn update_swap(&self, id: Uuid, fields: &SwapFields) -> ClientResult<SwapDocument> {
        self.send_json(Method::PUT, &format!("/{}", id), fields).await
    }

    async fn delete_swap(&self, id: Uuid) -> ClientResult<()> {
        let _confirmation: ErrorBody = self
            .send(self.request(Method::DELETE, &format!("/{}", id)))
            .await?;
        Ok(())
    }

    async fn add_interest(&self, id: Uuid, fields: &InterestFields) -> ClientResult<SwapDocument> {
        self.send_json(Method::POST, &format!("/{}/interested", id), fields)
            .await
    }

    async fn update_interest_at(
        &self,
        id: Uuid,
        index: usize,
        fields: &InterestFields,
    ) -> ClientResult<SwapDocument> {
        self.send_json(Method::PUT, &format!("/{}/interested/{}", id, index), fields)
            .await
    }

    async fn delete_interest_at(&self, id: Uuid, index: usize) -> ClientResult<SwapDocument> {
        self.send(self.request(Method::DELETE, &format!("/{}/interested/{}", id, index)))
            .await
    }

    async fn update_interest(
        &self,
        id: Uuid,
        interest_id: Uuid,
        fields: &InterestFields,
    ) -> ClientResult<SwapDocument> {
        self.send_json(
            Method::PUT,
            &format!("/{}/interests/{}", id, interest_id),
            fields,
        )
        .await
    }

    async fn delete_interest(&self, id: Uuid, interest_id: Uuid) -> ClientResult<SwapDocument> {
        self.send(self.request(
            Method::DELETE,
            &format!("/{}/interests/{}", id, interest_id),
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn body(message: &str) -> ErrorBody {
        ErrorBody {
            message: message.to_string(),
            details: None,
        }
    }

    #[rstest]
    #[case(StatusCode::NOT_FOUND, "Skill swap not found")]
    #[case(StatusCode::BAD_REQUEST, "Invalid user index")]
    #[case(StatusCode::CONFLICT, "modified concurrently")]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong!")]
    fn classifies_statuses(#[case] status: StatusCode, #[case] message: &str) {
        let err = classify_error(status, body(message));
        let matched = match status {
            StatusCode::NOT_FOUND => matches!(err, ClientError::NotFound(_)),
            StatusCode::BAD_REQUEST => matches!(err, ClientError::InvalidIndex),
            StatusCode::CONFLICT => matches!(err, ClientError::Conflict(_)),
            _ => matches!(err, ClientError::Server { status: 500, .. }),
        };
        assert!(matched, "unexpected classification {:?}", err);
    }

    #[test]
    fn validation_keeps_itemized_details() {
        let parsed: ErrorBody = serde_json::from_str(
            r#"{"message":"Missing required fields","details":{"name":null,"email":"Email is required"}}"#,
        )
        .unwrap();
        match classify_error(StatusCode::BAD_REQUEST, parsed) {
            ClientError::Validation { message, details } => {
                assert_eq!(message, "Missing required fields");
                assert_eq!(details.get("name"), Some(&None));
                assert_eq!(
                    details.get("email"),
                    Some(&Some("Email is required".to_string()))
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = HttpSwapApi::new("http://localhost:5001/");
        assert_eq!(api.base_url, "http://localhost:5001");
    }
}
