use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{required_access, Access, AuthUser, Credentials, IdentityStore, Role};
use crate::error::ApiError;

/// HTTP Basic access-control middleware.
///
/// Resolves the route's requirement from the static rule table, authenticates
/// any presented credentials and rejects the request before it reaches a
/// handler when the requirement is not met. Nothing is remembered between
/// requests. On success the caller's [`AuthUser`] is injected into the
/// request extensions.
pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let access = required_access(request.method(), request.uri().path());

    let credentials = extract_credentials(&request)?;
    let auth_user = match credentials {
        Some(credentials) => Some(authenticate(state.identities.clone(), credentials).await?),
        None => None,
    };

    match (access, &auth_user) {
        (Access::Public, _) => {}
        (Access::Authenticated, Some(_)) => {}
        (Access::AnyRole(roles), Some(user)) => {
            if !user.has_any_role(roles) {
                let required: Vec<String> = roles.iter().map(Role::to_string).collect();
                tracing::warn!(
                    "Access denied: '{}' lacks {} for {} {}",
                    user.username,
                    required.join(" or "),
                    request.method(),
                    request.uri().path()
                );
                return Err(ApiError::forbidden("Access is denied"));
            }
        }
        (_, None) => {
            tracing::debug!(
                "Rejected anonymous request to {} {}",
                request.method(),
                request.uri().path()
            );
            return Err(ApiError::unauthorized(
                "Full authentication is required to access this resource",
            ));
        }
    }

    if let Some(user) = auth_user {
        request.extensions_mut().insert(user);
    }

    Ok(next.run(request).await)
}

/// Read and decode the `Authorization` header, if any
fn extract_credentials(request: &Request) -> Result<Option<Credentials>, ApiError> {
    let Some(value) = request.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    Ok(Some(Credentials::from_basic_header(value)?))
}

/// Verify credentials on the blocking pool; bad credentials are a 401
/// wherever they are presented.
async fn authenticate(
    identities: Arc<IdentityStore>,
    credentials: Credentials,
) -> Result<AuthUser, ApiError> {
    let username = credentials.username.clone();
    let result = tokio::task::spawn_blocking(move || identities.authenticate(&credentials))
        .await
        .map_err(crate::auth::AuthError::from)??;

    result.ok_or_else(|| {
        tracing::warn!("Failed basic authentication for user '{}'", username);
        ApiError::unauthorized("Bad credentials")
    })
}
