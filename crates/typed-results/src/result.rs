// crates/typed-results/src/result.rs - the typed result value and its execute/describe pair
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use axum::async_trait;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::FutureExt;
use serde::Serialize;

use crate::channel::{BufferedResponse, ResponseChannel, APPLICATION_JSON, APPLICATION_PROBLEM_JSON};
use crate::error::{Result, ResultError};
use crate::logging::{Logger, LoggerFactory, TracingLoggerFactory};
use crate::metadata::{DescribeResponse, EndpointMetadataContext, PayloadType};
use crate::problem::{ProblemDetails, ProblemDetailsAdapter};
use crate::status::{CoercionPolicy, Variant};

/// What a result will write as its body, decided at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultBody<T> {
    /// Status only.
    Empty,
    /// The caller's payload, serialized as `application/json`.
    Value(T),
    /// A problem synthesised for an error status with no payload.
    Problem(ProblemDetails),
}

impl<T> From<Option<T>> for ResultBody<T> {
    fn from(payload: Option<T>) -> Self {
        match payload {
            Some(value) => ResultBody::Value(value),
            None => ResultBody::Empty,
        }
    }
}

/// Writes a decided response onto a channel.
///
/// Consumes the result, so a value executes at most once.
#[async_trait]
pub trait ExecuteResult: Send {
    async fn execute<C>(self, channel: &mut C, loggers: &dyn LoggerFactory) -> Result<()>
    where
        C: ResponseChannel;
}

/// An immutable HTTP response decision: the status code fixed by `V` and an
/// optional payload.
///
/// ```ignore
/// async fn create(Json(user): Json<NewUser>) -> Results<Created<User>, Conflict<ErrorInfo>> {
///     match store.insert(user) {
///         Ok(user) => Results::First(Created::new(Some(user))),
///         Err(_) => Results::Second(Conflict::new(Some(ErrorInfo::duplicate()))),
///     }
/// }
/// ```
pub struct TypedResult<T, V> {
    body: ResultBody<T>,
    problem_shaped: bool,
    variant: PhantomData<fn() -> V>,
}

impl<T: Any, V: Variant> TypedResult<T, V> {
    pub fn new(payload: Option<T>) -> Self {
        Self::with_adapter(payload, &ProblemDetailsAdapter::default())
    }

    /// Construct using a caller-supplied problem adapter.
    ///
    /// Problem-shaped payloads are recognised here too and later written as
    /// `application/problem+json`, whatever the status.
    pub fn with_adapter(mut payload: Option<T>, adapter: &ProblemDetailsAdapter) -> Self {
        let problem_shaped = payload
            .as_mut()
            .map_or(false, |value| adapter.is_problem_shaped(value));
        let body = match V::COERCION {
            CoercionPolicy::ProblemDefaults => adapter.apply_defaults_if_needed(payload, V::STATUS),
            CoercionPolicy::Passthrough => ResultBody::from(payload),
        };
        Self {
            body,
            problem_shaped,
            variant: PhantomData,
        }
    }
}

impl<T, V: Variant> TypedResult<T, V> {
    pub fn status_code(&self) -> StatusCode {
        V::STATUS
    }

    /// The caller's payload, if one was given.
    pub fn value(&self) -> Option<&T> {
        match &self.body {
            ResultBody::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Content type the body will be written with, `None` when there is no body.
    pub fn content_type(&self) -> Option<&'static str> {
        match &self.body {
            ResultBody::Empty => None,
            ResultBody::Value(_) => Some(self.value_content_type()),
            ResultBody::Problem(_) => Some(APPLICATION_PROBLEM_JSON),
        }
    }

    fn value_content_type(&self) -> &'static str {
        if self.problem_shaped {
            APPLICATION_PROBLEM_JSON
        } else {
            APPLICATION_JSON
        }
    }

    pub fn body(&self) -> &ResultBody<T> {
        &self.body
    }

    pub fn into_body(self) -> ResultBody<T> {
        self.body
    }
}

impl<T: fmt::Debug, V: Variant> fmt::Debug for TypedResult<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedResult")
            .field("status", &V::STATUS)
            .field("body", &self.body)
            .finish()
    }
}

impl<T: Clone, V> Clone for TypedResult<T, V> {
    fn clone(&self) -> Self {
        Self {
            body: self.body.clone(),
            problem_shaped: self.problem_shaped,
            variant: PhantomData,
        }
    }
}

#[async_trait]
impl<T, V> ExecuteResult for TypedResult<T, V>
where
    T: Serialize + Send + Sync,
    V: Variant,
{
    async fn execute<C>(self, channel: &mut C, loggers: &dyn LoggerFactory) -> Result<()>
    where
        C: ResponseChannel,
    {
        {
            let logger = loggers.create_logger(V::LOG_CATEGORY);
            logger.writing_status_code(V::STATUS);
        }
        channel.set_status_code(V::STATUS);

        match &self.body {
            ResultBody::Empty => Ok(()),
            ResultBody::Value(value) => {
                channel
                    .write_serialized(value, self.value_content_type())
                    .await
            }
            ResultBody::Problem(problem) => {
                channel
                    .write_serialized(problem, APPLICATION_PROBLEM_JSON)
                    .await
            }
        }
    }
}

impl<T: 'static, V: Variant> DescribeResponse for TypedResult<T, V> {
    fn populate_metadata(ctx: &mut EndpointMetadataContext) {
        ctx.populate(PayloadType::of::<T>(), V::STATUS, APPLICATION_JSON);
    }
}

/// Execute a result into a fresh [`BufferedResponse`].
pub async fn execute_buffered<R: ExecuteResult>(
    result: R,
    loggers: &dyn LoggerFactory,
) -> Result<BufferedResponse> {
    let mut channel = BufferedResponse::new();
    result.execute(&mut channel, loggers).await?;
    Ok(channel)
}

/// Execute a result synchronously with tracing-backed logging.
pub fn into_buffered_response<R: ExecuteResult>(result: R) -> Response {
    into_buffered_response_with(result, &TracingLoggerFactory)
}

/// Execute a result synchronously with the given logger factory.
///
/// Serialization failures are logged and mapped to a bare 500.
pub fn into_buffered_response_with<R: ExecuteResult>(
    result: R,
    loggers: &dyn LoggerFactory,
) -> Response {
    let outcome = execute_buffered(result, loggers)
        .now_or_never()
        .unwrap_or(Err(ResultError::Suspended));

    match outcome {
        Ok(channel) => channel.into_response(),
        Err(err) => {
            tracing::error!("Failed to execute typed result: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

impl<T, V> IntoResponse for TypedResult<T, V>
where
    T: Serialize + Send + Sync,
    V: Variant,
{
    fn into_response(self) -> Response {
        into_buffered_response(self)
    }
}
