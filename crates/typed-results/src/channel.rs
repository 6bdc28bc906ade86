// crates/typed-results/src/channel.rs - the response channel results write themselves onto
use axum::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::{Result, ResultError};

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// A live response being written.
///
/// Writes are not transactional: once `set_status_code` has run the status
/// is committed even if the body write later fails.
#[async_trait]
pub trait ResponseChannel: Send {
    fn set_status_code(&mut self, status: StatusCode);

    /// Serialize `value` as the response body with the given content type.
    async fn write_serialized<T>(&mut self, value: &T, content_type: &'static str) -> Result<()>
    where
        T: Serialize + Sync + ?Sized;
}

/// In-memory channel that turns into an axum [`Response`].
#[derive(Debug)]
pub struct BufferedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

impl Default for BufferedResponse {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseChannel for BufferedResponse {
    fn set_status_code(&mut self, status: StatusCode) {
        self.status = status;
    }

    async fn write_serialized<T>(&mut self, value: &T, content_type: &'static str) -> Result<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        if self.body.is_some() {
            return Err(ResultError::BodyAlreadyWritten);
        }

        let bytes = serde_json::to_vec(value)?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.body = Some(bytes);
        Ok(())
    }
}

impl IntoResponse for BufferedResponse {
    fn into_response(self) -> Response {
        let body = self.body.map(Body::from).unwrap_or_else(Body::empty);
        (self.status, self.headers, body).into_response()
    }
}
