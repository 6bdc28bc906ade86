// crates/typed-results/src/results.rs - an endpoint that can answer with one of two typed results
use axum::async_trait;
use axum::response::{IntoResponse, Response};

use crate::channel::ResponseChannel;
use crate::error::Result;
use crate::logging::LoggerFactory;
use crate::metadata::{DescribeResponse, EndpointMetadataContext};
use crate::result::{into_buffered_response, ExecuteResult};

/// One of two results. Describing it declares both arms, in order.
///
/// Nest to go wider: `Results<Created<User>, Results<Conflict<ErrorInfo>, BadRequest<ValidationProblem>>>`.
#[derive(Debug, Clone)]
pub enum Results<A, B> {
    First(A),
    Second(B),
}

#[async_trait]
impl<A, B> ExecuteResult for Results<A, B>
where
    A: ExecuteResult,
    B: ExecuteResult,
{
    async fn execute<C>(self, channel: &mut C, loggers: &dyn LoggerFactory) -> Result<()>
    where
        C: ResponseChannel,
    {
        match self {
            Results::First(result) => result.execute(channel, loggers).await,
            Results::Second(result) => result.execute(channel, loggers).await,
        }
    }
}

impl<A, B> DescribeResponse for Results<A, B>
where
    A: DescribeResponse,
    B: DescribeResponse,
{
    fn populate_metadata(ctx: &mut EndpointMetadataContext) {
        A::populate_metadata(ctx);
        B::populate_metadata(ctx);
    }
}

impl<A, B> IntoResponse for Results<A, B>
where
    A: ExecuteResult,
    B: ExecuteResult,
{
    fn into_response(self) -> Response {
        into_buffered_response(self)
    }
}
