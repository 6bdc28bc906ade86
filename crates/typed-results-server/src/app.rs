// File: src/app.rs
// Purpose: Application state, endpoint registration and router assembly

use std::future::Future;
use std::sync::Arc;

use axum::handler::Handler;
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::{self, MethodRouter};
use axum::Router;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use typed_results::{
    into_buffered_response_with, DescribeResponse, EndpointRegistry, ExecuteResult, LoggerFactory,
    RegistryBuilder, TracingLoggerFactory,
};

use crate::config::Config;
use crate::handlers::{create_user, get_user, list_endpoints, update_user, UserStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<RwLock<UserStore>>,
    pub loggers: Arc<dyn LoggerFactory>,
    pub registry: Arc<EndpointRegistry>,
}

impl AppState {
    pub fn new(registry: EndpointRegistry) -> Self {
        Self::with_loggers(registry, Arc::new(TracingLoggerFactory))
    }

    pub fn with_loggers(registry: EndpointRegistry, loggers: Arc<dyn LoggerFactory>) -> Self {
        Self {
            users: Arc::new(RwLock::new(UserStore::default())),
            loggers,
            registry: Arc::new(registry),
        }
    }

    /// Pair a typed result with this app's logger factory.
    pub fn respond<R: ExecuteResult>(&self, result: R) -> Respond<R> {
        Respond {
            result,
            loggers: self.loggers.clone(),
        }
    }
}

/// Handler return type: a typed result executed with the app's logger factory.
pub struct Respond<R> {
    result: R,
    loggers: Arc<dyn LoggerFactory>,
}

impl<R> Respond<R> {
    pub fn result(&self) -> &R {
        &self.result
    }
}

impl<R: ExecuteResult> IntoResponse for Respond<R> {
    fn into_response(self) -> Response {
        into_buffered_response_with(self.result, self.loggers.as_ref())
    }
}

/// Links a handler fn to the typed result its future resolves to.
///
/// `Args` is the tuple of extractor types, which keeps the impls for each
/// arity apart.
pub trait TypedHandler<Args> {
    type Result: DescribeResponse;
}

macro_rules! impl_typed_handler {
    ($($ty:ident),*) => {
        impl<F, Fut, R, $($ty,)*> TypedHandler<($($ty,)*)> for F
        where
            F: FnOnce($($ty),*) -> Fut,
            Fut: Future<Output = Respond<R>>,
            R: DescribeResponse,
        {
            type Result = R;
        }
    };
}

impl_typed_handler!();
impl_typed_handler!(T1);
impl_typed_handler!(T1, T2);
impl_typed_handler!(T1, T2, T3);
impl_typed_handler!(T1, T2, T3, T4);

/// Router builder that records each handler's declared responses as the
/// route is added, so the registry always matches what is served.
pub struct TypedRouter {
    router: Router<AppState>,
    registry: RegistryBuilder,
}

impl TypedRouter {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            registry: RegistryBuilder::new(),
        }
    }

    pub fn get<H, T, A>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, AppState> + TypedHandler<A>,
        T: 'static,
    {
        self.add::<<H as TypedHandler<A>>::Result>(Method::GET, path, routing::get(handler))
    }

    pub fn post<H, T, A>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, AppState> + TypedHandler<A>,
        T: 'static,
    {
        self.add::<<H as TypedHandler<A>>::Result>(Method::POST, path, routing::post(handler))
    }

    pub fn put<H, T, A>(self, path: &str, handler: H) -> Self
    where
        H: Handler<T, AppState> + TypedHandler<A>,
        T: 'static,
    {
        self.add::<<H as TypedHandler<A>>::Result>(Method::PUT, path, routing::put(handler))
    }

    pub fn into_parts(self) -> (Router<AppState>, EndpointRegistry) {
        (self.router, self.registry.build())
    }

    fn add<R: DescribeResponse>(
        mut self,
        method: Method,
        path: &str,
        route: MethodRouter<AppState>,
    ) -> Self {
        self.registry.describe::<R>(method, path);
        self.router = self.router.route(path, route);
        self
    }
}

impl Default for TypedRouter {
    fn default() -> Self {
        Self::new()
    }
}

fn routes(config: &Config) -> TypedRouter {
    let mut routes = TypedRouter::new()
        .post("/users", create_user)
        .get("/users/:id", get_user)
        .put("/users/:id", update_user);

    if config.metadata.enabled {
        routes = routes.get(&config.metadata.route, list_endpoints);
    }

    routes
}

/// Every route's possible responses, taken from the handlers' return types.
pub fn endpoint_registry(config: &Config) -> EndpointRegistry {
    let (_, registry) = routes(config).into_parts();
    registry
}

pub fn router(config: &Config, state: AppState) -> Router {
    let (app, _) = routes(config).into_parts();

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use typed_results::{Conflict, Results};

    async fn claim(
        State(state): State<AppState>,
        Path(name): Path<String>,
    ) -> Respond<Results<typed_results::Created<String>, Conflict<String>>> {
        state.respond(Results::Second(Conflict::new(Some(name))))
    }

    #[test]
    fn test_registry_follows_handler_return_type() {
        let (_, registry) = TypedRouter::new().put("/names/:name", claim).into_parts();

        let endpoint = registry.get(&Method::PUT, "/names/:name").unwrap();
        let statuses: Vec<StatusCode> = endpoint.responses.iter().map(|r| r.status_code).collect();
        assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
        assert!(endpoint.responses[1].payload_type.is::<String>());
    }

    #[test]
    fn test_default_registry() {
        let registry = endpoint_registry(&Config::default());
        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry
                .get(&Method::GET, "/users/:id")
                .map(|e| e.responses.len()),
            Some(2)
        );
    }
}
