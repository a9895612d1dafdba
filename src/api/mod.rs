//! HTTP boundary to the borrowing service backend
//!
//! All endpoints the client consumes live behind the [`BorrowingApi`]
//! trait so services can be tested against a mock. The concrete
//! [`ApiClient`] wraps `reqwest` and the decode layer that normalizes the
//! backend's loosely shaped responses.

pub mod decode;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    config::BackendConfig,
    error::{AppError, AppResult},
    models::{
        BookingRequest, BorrowedUnit, BorrowingDetail, BorrowingSummary, Category, Equipment,
        ReturnRequest,
    },
};

/// Operations the client consumes from the backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BorrowingApi: Send + Sync {
    /// `GET /equipment`
    async fn list_equipment(&self) -> AppResult<Vec<Equipment>>;

    /// `GET /category`
    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    /// `POST /borrowing`, returns the new transaction id
    async fn create_booking(&self, request: BookingRequest) -> AppResult<i64>;

    /// `GET /borrowing/detail/{id}`
    async fn borrowing_detail(&self, id: i64) -> AppResult<BorrowingDetail>;

    /// `GET /borrowingDetail/with-equipment/{id}?excludeReturned=true`
    async fn borrowed_units(&self, borrowing_id: i64) -> AppResult<Vec<BorrowedUnit>>;

    /// `POST /borrowingDetail/return-items`
    async fn return_units(&self, request: ReturnRequest) -> AppResult<()>;

    /// `GET /borrowing/user/{userId}`
    async fn user_borrowings(&self, user_id: i64) -> AppResult<Vec<BorrowingSummary>>;
}

/// Error body the backend sends on non-2xx responses
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedBooking {
    id: i64,
}

/// Concrete `reqwest`-backed client
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &BackendConfig, token: Option<String>) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.with_auth(self.http.get(format!("{}{}", self.base_url, path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.with_auth(self.http.post(format!("{}{}", self.base_url, path)))
    }

    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and parse the response body as JSON, converting
    /// non-2xx responses into `AppError::NotFound`/`AppError::Api` with
    /// the backend's message when it provides one.
    ///
    /// Mutation endpoints acknowledge with 200 or 204 and may send no body
    /// at all; an empty or non-JSON success body is `Value::Null` rather
    /// than an error, so callers that discard the body (returns) succeed
    /// and only callers that decode an object fail.
    async fn send(&self, builder: RequestBuilder) -> AppResult<Value> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            if body.trim().is_empty() {
                return Ok(Value::Null);
            }
            return match serde_json::from_str(&body) {
                Ok(value) => Ok(value),
                Err(e) => {
                    tracing::warn!("Ignoring non-JSON body of successful response: {}", e);
                    Ok(Value::Null)
                }
            };
        }

        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| format!("Request failed with status {}", status));

        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(message));
        }

        Err(AppError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl BorrowingApi for ApiClient {
    async fn list_equipment(&self) -> AppResult<Vec<Equipment>> {
        let body = self.send(self.get("/equipment")).await?;
        Ok(decode::decode_list(body, "equipment"))
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let body = self.send(self.get("/category")).await?;
        Ok(decode::decode_list(body, "category"))
    }

    async fn create_booking(&self, request: BookingRequest) -> AppResult<i64> {
        let body = self.send(self.post("/borrowing").json(&request)).await?;
        let created: CreatedBooking = decode::decode_object(body, "booking")?;
        Ok(created.id)
    }

    async fn borrowing_detail(&self, id: i64) -> AppResult<BorrowingDetail> {
        let path = format!("/borrowing/detail/{}", id);
        let body = self.send(self.get(&path)).await?;
        decode::decode_object(body, "borrowing detail")
    }

    async fn borrowed_units(&self, borrowing_id: i64) -> AppResult<Vec<BorrowedUnit>> {
        let path = format!(
            "/borrowingDetail/with-equipment/{}?excludeReturned=true",
            borrowing_id
        );
        let body = self.send(self.get(&path)).await?;
        Ok(decode::decode_list(body, "borrowed units"))
    }

    async fn return_units(&self, request: ReturnRequest) -> AppResult<()> {
        self.send(self.post("/borrowingDetail/return-items").json(&request))
            .await?;
        Ok(())
    }

    async fn user_borrowings(&self, user_id: i64) -> AppResult<Vec<BorrowingSummary>> {
        let path = format!("/borrowing/user/{}", user_id);
        let body = self.send(self.get(&path)).await?;
        Ok(decode::decode_list(body, "borrowing history"))
    }
}
