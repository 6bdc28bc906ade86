// crates/typed-results/src/status.rs - fixed status codes and coercion policy per result variant
//
// A variant is a zero-sized marker. `TypedResult<T, V>` reads everything that
// distinguishes one result kind from another off `V`, so adding a sibling is a
// single `declare_variant!` line.
use axum::http::StatusCode;

/// Whether a variant runs its payload through the problem-details adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionPolicy {
    /// Error statuses get problem defaults applied at construction.
    ProblemDefaults,
    /// The payload is written exactly as given.
    Passthrough,
}

/// Compile-time identity of a result variant.
pub trait Variant: Send + Sync + 'static {
    /// Status code written by every result of this variant.
    const STATUS: StatusCode;

    /// Logger category used when the result executes.
    const LOG_CATEGORY: &'static str;

    const COERCION: CoercionPolicy = CoercionPolicy::ProblemDefaults;
}

/// `true` for 4xx and 5xx codes.
pub fn is_error_status(status: StatusCode) -> bool {
    status.is_client_error() || status.is_server_error()
}

crate::declare_variant!(
    /// 200 OK with an optional JSON body.
    OkStatus,
    OkResult,
    StatusCode::OK,
    "typed_results.result.OkObjectResult"
);

crate::declare_variant!(
    /// 201 Created with an optional JSON body.
    CreatedStatus,
    Created,
    StatusCode::CREATED,
    "typed_results.result.CreatedResult"
);

crate::declare_variant!(
    /// 202 Accepted with an optional JSON body.
    AcceptedStatus,
    Accepted,
    StatusCode::ACCEPTED,
    "typed_results.result.AcceptedResult"
);

crate::declare_variant!(
    /// 400 Bad Request carrying an optional error payload.
    BadRequestStatus,
    BadRequest,
    StatusCode::BAD_REQUEST,
    "typed_results.result.BadRequestObjectResult"
);

crate::declare_variant!(
    /// 404 Not Found carrying an optional payload.
    NotFoundStatus,
    NotFound,
    StatusCode::NOT_FOUND,
    "typed_results.result.NotFoundObjectResult"
);

crate::declare_variant!(
    /// 409 Conflict carrying an optional error payload.
    ConflictStatus,
    Conflict,
    StatusCode::CONFLICT,
    "typed_results.result.ConflictObjectResult"
);

crate::declare_variant!(
    /// 422 Unprocessable Entity carrying an optional error payload.
    UnprocessableEntityStatus,
    UnprocessableEntity,
    StatusCode::UNPROCESSABLE_ENTITY,
    "typed_results.result.UnprocessableEntityObjectResult"
);

crate::declare_variant!(
    /// 500 Internal Server Error carrying an optional payload.
    InternalServerErrorStatus,
    InternalServerError,
    StatusCode::INTERNAL_SERVER_ERROR,
    "typed_results.result.InternalServerErrorObjectResult"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_range() {
        assert!(is_error_status(StatusCode::CONFLICT));
        assert!(is_error_status(StatusCode::BAD_GATEWAY));
        assert!(!is_error_status(StatusCode::OK));
        assert!(!is_error_status(StatusCode::SEE_OTHER));
    }

    #[test]
    fn test_conflict_variant() {
        assert_eq!(ConflictStatus::STATUS, StatusCode::CONFLICT);
        assert_eq!(
            ConflictStatus::LOG_CATEGORY,
            "typed_results.result.ConflictObjectResult"
        );
        assert_eq!(ConflictStatus::COERCION, CoercionPolicy::ProblemDefaults);
    }
}
