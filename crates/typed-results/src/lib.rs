// crates/typed-results/src/lib.rs - typed HTTP results for axum
//
// A handler returns an immutable value instead of mutating a response:
// - `Conflict<T>`, `Created<T>`, ... decide the status code and payload.
// - `ExecuteResult::execute` writes that decision onto a `ResponseChannel`.
// - `DescribeResponse::populate_metadata` declares the same status code and
//   payload type to API tooling without an instance or a request.
//
// Both paths read the status code from the variant marker, so they cannot
// disagree. Results also implement `IntoResponse` and can be returned from
// axum handlers directly.
pub mod channel;
pub mod error;
pub mod logging;
pub mod macros;
pub mod metadata;
pub mod problem;
pub mod result;
pub mod results;
pub mod status;

pub use axum;
pub use axum::http::StatusCode;
pub use channel::{BufferedResponse, ResponseChannel, APPLICATION_JSON, APPLICATION_PROBLEM_JSON};
pub use error::{Result, ResultError};
pub use logging::{Logger, LoggerFactory, TracingLoggerFactory};
pub use metadata::{
    describe, DescribeResponse, EndpointDescription, EndpointMetadataContext,
    EndpointMetadataEntry, EndpointRegistry, PayloadType, RegistryBuilder,
};
pub use problem::{
    default_problem_shape, ProblemDetails, ProblemDetailsAdapter, ProblemShape,
    ValidationProblem,
};
pub use result::{
    execute_buffered, into_buffered_response, into_buffered_response_with, ExecuteResult,
    ResultBody, TypedResult,
};
pub use results::Results;
pub use status::*;
