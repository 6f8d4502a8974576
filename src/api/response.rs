use axum::{
    response::{IntoResponse, Response},
    Json,
};

use crate::services::PersonOutcome;

// Records render as JSON; confirmations and misses as plain text.
impl IntoResponse for PersonOutcome {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let Some(message) = self.message() {
            return (status, message).into_response();
        }

        match self {
            PersonOutcome::Found(person)
            | PersonOutcome::Created(person)
            | PersonOutcome::Updated(person) => (status, Json(person)).into_response(),
            PersonOutcome::Deleted(_) | PersonOutcome::NotFound(_) => status.into_response(),
        }
    }
}
