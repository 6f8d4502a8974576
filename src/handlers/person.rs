// handlers/person.rs - /v1 person endpoints

use axum::extract::{Extension, State};

use crate::api::{PersonId, ValidatedJson};
use crate::app::AppState;
use crate::auth::AuthUser;
use crate::database::models::person::{Person, PersonDraft, PersonPayload};
use crate::error::ApiError;
use crate::services::PersonOutcome;

/// GET /v1/get-person/:personId - READ_ONLY or READ_WRITE
#[utoipa::path(
    get,
    path = "/v1/get-person/{personId}",
    params(("personId" = i32, Path, description = "Person id")),
    responses(
        (status = 200, description = "Person found", body = Person),
        (status = 401, description = "Missing or bad credentials"),
        (status = 403, description = "Requires READ_ONLY or READ_WRITE"),
        (status = 404, description = "Person not found", body = String, content_type = "text/plain")
    ),
    security(("basicAuth" = []))
)]
pub async fn get_person(
    State(state): State<AppState>,
    PersonId(id): PersonId,
) -> Result<PersonOutcome, ApiError> {
    Ok(state.people.get_person(id).await?)
}

/// POST /v1/post-person - READ_WRITE
///
/// 201 with the stored record when it was inserted, 200 when the body's `id`
/// matched and overwrote an existing record.
#[utoipa::path(
    post,
    path = "/v1/post-person",
    request_body = PersonPayload,
    responses(
        (status = 200, description = "Existing person overwritten", body = Person),
        (status = 201, description = "Person created", body = Person),
        (status = 400, description = "Validation failure", body = [String]),
        (status = 401, description = "Missing or bad credentials"),
        (status = 403, description = "Requires READ_WRITE")
    ),
    security(("basicAuth" = []))
)]
pub async fn post_person(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<PersonPayload>,
) -> Result<PersonOutcome, ApiError> {
    tracing::debug!("post-person by '{}' (id: {:?})", user.username, payload.id);
    Ok(state.people.post_person(PersonDraft::from(payload)).await?)
}

/// DELETE /v1/delete-person/:personId - public
#[utoipa::path(
    delete,
    path = "/v1/delete-person/{personId}",
    params(("personId" = i32, Path, description = "Person id")),
    responses(
        (status = 200, description = "Person deleted", body = String, content_type = "text/plain"),
        (status = 404, description = "Person not found", body = String, content_type = "text/plain")
    )
)]
pub async fn delete_person(
    State(state): State<AppState>,
    PersonId(id): PersonId,
) -> Result<PersonOutcome, ApiError> {
    Ok(state.people.delete_person(id).await?)
}
