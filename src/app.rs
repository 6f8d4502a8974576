use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::IdentityStore;
use crate::config::AppConfig;
use crate::handlers;
use crate::middleware::basic_auth_middleware;
use crate::services::PersonService;

/// Shared, immutable per-process state handed to middleware and handlers
#[derive(Clone)]
pub struct AppState {
    pub people: PersonService,
    pub identities: Arc<IdentityStore>,
}

impl AppState {
    pub fn new(people: PersonService, identities: IdentityStore) -> Self {
        Self {
            people,
            identities: Arc::new(identities),
        }
    }
}

/// Build the full router: routes, access control, body limit, tracing, CORS
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(handlers::system::root))
        .route("/health", get(handlers::system::health))
        .merge(docs_routes())
        // Person API
        .merge(person_routes())
        .fallback(handlers::system::fallback)
        .layer(middleware::from_fn_with_state(state.clone(), basic_auth_middleware))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }

    router
}

fn person_routes() -> Router<AppState> {
    use handlers::person;

    Router::new()
        .route("/v1/get-person/:personId", get(person::get_person))
        .route("/v1/post-person", post(person::post_person))
        .route("/v1/delete-person/:personId", delete(person::delete_person))
}

fn docs_routes() -> Router<AppState> {
    use handlers::docs;

    Router::new()
        .route("/swagger-ui.html", get(docs::swagger_ui_redirect))
        .merge(docs::swagger_ui())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    match allowed_origins(origins) {
        None => CorsLayer::permissive(),
        Some(allowed) => CorsLayer::new()
            .allow_origin(allowed)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
    }
}

/// Configured origins as header values; `None` allows any origin.
/// Entries that are not valid header values are dropped.
fn allowed_origins(origins: &[String]) -> Option<Vec<HeaderValue>> {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return None;
    }

    let allowed = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(allowed)
}
