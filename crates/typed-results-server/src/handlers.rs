// File: src/handlers.rs
// Purpose: Demo user endpoints returning typed results

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use typed_results::{
    Conflict, Created, EndpointRegistry, NotFound, OkResult, ProblemDetails, Results,
    UnprocessableEntity, ValidationProblem,
};

use crate::app::{AppState, Respond};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
}

impl UserInput {
    fn validate(&self) -> Option<ValidationProblem> {
        let mut problem = ValidationProblem::new(BTreeMap::new());
        if self.name.trim().is_empty() {
            problem = problem.error("name", "must not be empty");
        }
        if !self.email.contains('@') {
            problem = problem.error("email", "must be an email address");
        }
        (!problem.errors.is_empty()).then_some(problem)
    }
}

/// Body of a 409 on duplicate registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
}

/// In-memory user table keyed by id.
#[derive(Debug, Default)]
pub struct UserStore {
    users: BTreeMap<u64, User>,
    next_id: u64,
}

impl UserStore {
    pub fn get(&self, id: u64) -> Option<&User> {
        self.users.get(&id)
    }

    /// Returns `None` when the email is already registered.
    pub fn insert(&mut self, input: UserInput) -> Option<User> {
        if self.email_taken(&input.email) {
            return None;
        }
        self.next_id += 1;
        let user = User {
            id: self.next_id,
            name: input.name,
            email: input.email,
        };
        self.users.insert(user.id, user.clone());
        Some(user)
    }

    pub fn update(&mut self, id: u64, input: UserInput) -> Option<User> {
        let user = self.users.get_mut(&id)?;
        user.name = input.name;
        user.email = input.email;
        Some(user.clone())
    }

    fn email_taken(&self, email: &str) -> bool {
        self.users.values().any(|u| u.email == email)
    }
}

pub type CreateUserResult = Results<Created<User>, Conflict<ErrorInfo>>;
pub type GetUserResult = Results<OkResult<User>, NotFound<ProblemDetails>>;
pub type UpdateUserResult =
    Results<OkResult<User>, Results<NotFound<ProblemDetails>, UnprocessableEntity<ValidationProblem>>>;
pub type ListEndpointsResult = OkResult<EndpointRegistry>;

fn user_not_found(id: u64) -> NotFound<ProblemDetails> {
    NotFound::new(Some(
        ProblemDetails::new()
            .title("User not found")
            .detail(format!("No user with id {}", id))
            .instance(format!("/users/{}", id)),
    ))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<UserInput>,
) -> Respond<CreateUserResult> {
    let email = input.email.clone();
    let result: CreateUserResult = match state.users.write().await.insert(input) {
        Some(user) => Results::First(Created::new(Some(user))),
        None => Results::Second(Conflict::new(Some(ErrorInfo {
            message: format!("A user with email {} already exists", email),
        }))),
    };
    state.respond(result)
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Respond<GetUserResult> {
    let result: GetUserResult = match state.users.read().await.get(id) {
        Some(user) => Results::First(OkResult::new(Some(user.clone()))),
        None => Results::Second(user_not_found(id)),
    };
    state.respond(result)
}

/// PUT /users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<UserInput>,
) -> Respond<UpdateUserResult> {
    let result: UpdateUserResult = if let Some(problem) = input.validate() {
        Results::Second(Results::Second(UnprocessableEntity::new(Some(problem))))
    } else {
        match state.users.write().await.update(id, input) {
            Some(user) => Results::First(OkResult::new(Some(user))),
            None => Results::Second(Results::First(user_not_found(id))),
        }
    };
    state.respond(result)
}

/// GET on the configured metadata route
pub async fn list_endpoints(State(state): State<AppState>) -> Respond<ListEndpointsResult> {
    state.respond(OkResult::new(Some(state.registry.as_ref().clone())))
}
