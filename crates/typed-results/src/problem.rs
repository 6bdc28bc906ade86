// crates/typed-results/src/problem.rs - problem-details payloads and the defaults adapter
use std::any::Any;
use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::result::ResultBody;
use crate::status::is_error_status;

/// Machine-readable error body (RFC 7807 field names).
///
/// Every field is optional and omitted from JSON when unset. Anything the
/// caller wants beyond the conventional five goes into `extensions`, which
/// is flattened into the top-level object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(flatten)]
    pub extensions: serde_json::Map<String, serde_json::Value>,
}

impl ProblemDetails {
    pub fn new() -> Self {
        Self::default()
    }

    /// A problem carrying only `status`.
    pub fn for_status(status: StatusCode) -> Self {
        Self {
            status: Some(status.as_u16()),
            ..Self::default()
        }
    }

    pub fn problem_type(mut self, problem_type: impl Into<String>) -> Self {
        self.problem_type = Some(problem_type.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = Some(status.as_u16());
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Add an extension member.
    ///
    /// Values that fail to serialize are stored as `null`. Use
    /// [`ProblemDetails::try_extension`] to get the error instead.
    pub fn extension(self, key: impl Into<String>, value: impl Serialize) -> Self {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(value) => self.with_extension_value(key, value),
            Err(_) => self.with_extension_value(key, serde_json::Value::Null),
        }
    }

    pub fn try_extension(
        self,
        key: impl Into<String>,
        value: impl Serialize,
    ) -> Result<Self, serde_json::Error> {
        let value = serde_json::to_value(value)?;
        Ok(self.with_extension_value(key.into(), value))
    }

    fn with_extension_value(mut self, key: String, value: serde_json::Value) -> Self {
        self.extensions.insert(key, value);
        self
    }
}

/// Problem details plus per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationProblem {
    #[serde(flatten)]
    pub problem: ProblemDetails,
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationProblem {
    pub const DEFAULT_TITLE: &'static str = "One or more validation errors occurred.";

    pub fn new(errors: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            problem: ProblemDetails::new().title(Self::DEFAULT_TITLE),
            errors,
        }
    }

    pub fn error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
        self
    }
}

/// Predicate deciding whether a payload is problem-shaped, returning the
/// problem fields to fill in when it is.
pub type ProblemShape = fn(&mut dyn Any) -> Option<&mut ProblemDetails>;

/// Recognises [`ProblemDetails`] and [`ValidationProblem`].
pub fn default_problem_shape(payload: &mut dyn Any) -> Option<&mut ProblemDetails> {
    if payload.is::<ProblemDetails>() {
        return payload.downcast_mut::<ProblemDetails>();
    }
    payload
        .downcast_mut::<ValidationProblem>()
        .map(|validation| &mut validation.problem)
}

/// Applies problem-details conventions to result payloads.
///
/// Runs once, when a result is constructed. Error statuses with no payload
/// get a problem body carrying `status`; problem-shaped payloads missing
/// `status` get it filled in. Everything else passes through untouched.
#[derive(Clone, Copy)]
pub struct ProblemDetailsAdapter {
    shape: ProblemShape,
}

impl ProblemDetailsAdapter {
    pub fn new() -> Self {
        Self::with_shape(default_problem_shape)
    }

    /// Use a custom predicate for what counts as problem-shaped.
    pub fn with_shape(shape: ProblemShape) -> Self {
        Self { shape }
    }

    pub fn is_problem_shaped<T: Any>(&self, payload: &mut T) -> bool {
        (self.shape)(payload as &mut dyn Any).is_some()
    }

    pub fn apply_defaults_if_needed<T: Any>(
        &self,
        payload: Option<T>,
        status: StatusCode,
    ) -> ResultBody<T> {
        if !is_error_status(status) {
            return ResultBody::from(payload);
        }

        match payload {
            None => ResultBody::Problem(ProblemDetails::for_status(status)),
            Some(mut value) => {
                if let Some(problem) = (self.shape)(&mut value as &mut dyn Any) {
                    problem.status.get_or_insert(status.as_u16());
                }
                ResultBody::Value(value)
            }
        }
    }
}

impl std::fmt::Debug for ProblemDetailsAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProblemDetailsAdapter").finish_non_exhaustive()
    }
}

impl Default for ProblemDetailsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct ErrorInfo {
        message: String,
    }

    #[test]
    fn test_absent_payload_becomes_problem() {
        let body = ProblemDetailsAdapter::new()
            .apply_defaults_if_needed::<ErrorInfo>(None, StatusCode::CONFLICT);
        match body {
            ResultBody::Problem(problem) => {
                assert_eq!(problem.status, Some(409));
                assert_eq!(problem.detail, None);
                assert_eq!(problem.title, None);
            }
            other => panic!("expected problem body, got {:?}", other),
        }
    }

    #[test]
    fn test_success_status_leaves_absent_payload_empty() {
        let body =
            ProblemDetailsAdapter::new().apply_defaults_if_needed::<ErrorInfo>(None, StatusCode::OK);
        assert!(matches!(body, ResultBody::Empty));
    }

    #[test]
    fn test_plain_payload_untouched() {
        let info = ErrorInfo {
            message: "duplicate key".into(),
        };
        let body = ProblemDetailsAdapter::new()
            .apply_defaults_if_needed(Some(info), StatusCode::CONFLICT);
        match body {
            ResultBody::Value(value) => assert_eq!(value.message, "duplicate key"),
            other => panic!("expected value body, got {:?}", other),
        }
    }

    #[test]
    fn test_problem_payload_gets_status() {
        let problem = ProblemDetails::new().detail("already exists");
        let body = ProblemDetailsAdapter::new()
            .apply_defaults_if_needed(Some(problem), StatusCode::CONFLICT);
        let ResultBody::Value(problem) = body else {
            panic!("expected value body");
        };
        assert_eq!(problem.status, Some(409));
        assert_eq!(problem.detail.as_deref(), Some("already exists"));
    }

    #[test]
    fn test_problem_payload_keeps_caller_status() {
        let problem = ProblemDetails::new().status(StatusCode::GONE);
        let body = ProblemDetailsAdapter::new()
            .apply_defaults_if_needed(Some(problem), StatusCode::CONFLICT);
        let ResultBody::Value(problem) = body else {
            panic!("expected value body");
        };
        assert_eq!(problem.status, Some(410));
    }

    #[test]
    fn test_problem_payload_on_success_untouched() {
        let body = ProblemDetailsAdapter::new()
            .apply_defaults_if_needed(Some(ProblemDetails::new()), StatusCode::OK);
        let ResultBody::Value(problem) = body else {
            panic!("expected value body");
        };
        assert_eq!(problem.status, None);
    }

    #[test]
    fn test_validation_problem_is_problem_shaped() {
        let validation = ValidationProblem::default().error("email", "is taken");
        let body = ProblemDetailsAdapter::new()
            .apply_defaults_if_needed(Some(validation), StatusCode::UNPROCESSABLE_ENTITY);
        let ResultBody::Value(validation) = body else {
            panic!("expected value body");
        };
        assert_eq!(validation.problem.status, Some(422));
        assert_eq!(validation.errors["email"], vec!["is taken".to_string()]);
    }

    #[test]
    fn test_custom_shape() {
        fn nothing_is_a_problem(_: &mut dyn Any) -> Option<&mut ProblemDetails> {
            None
        }
        let adapter = ProblemDetailsAdapter::with_shape(nothing_is_a_problem);
        let mut problem = ProblemDetails::new();
        assert!(!adapter.is_problem_shaped(&mut problem));

        let body = adapter.apply_defaults_if_needed(Some(problem), StatusCode::CONFLICT);
        let ResultBody::Value(problem) = body else {
            panic!("expected value body");
        };
        assert_eq!(problem.status, None);
    }

    #[test]
    fn test_problem_serialization_omits_empty_fields() {
        let problem = ProblemDetails::for_status(StatusCode::CONFLICT)
            .extension("trace_id", "abc123");
        let value = serde_json::to_value(&problem).unwrap();
        assert_eq!(value, json!({ "status": 409, "trace_id": "abc123" }));
    }

    struct Opaque;

    impl Serialize for Opaque {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("opaque"))
        }
    }

    #[test]
    fn test_extension_failure() {
        let problem = ProblemDetails::new().extension("context", Opaque);
        assert_eq!(problem.extensions["context"], serde_json::Value::Null);

        assert!(ProblemDetails::new().try_extension("context", Opaque).is_err());
        let problem = ProblemDetails::new().try_extension("retry", 3).unwrap();
        assert_eq!(problem.extensions["retry"], json!(3));
    }

    #[test]
    fn test_validation_problem_serialization() {
        let validation = ValidationProblem::new(BTreeMap::new())
            .error("name", "is required")
            .error("name", "is too short");
        let value = serde_json::to_value(&validation).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "One or more validation errors occurred.",
                "errors": { "name": ["is required", "is too short"] }
            })
        );
    }
}
