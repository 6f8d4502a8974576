// handlers/docs.rs - OpenAPI document and interactive docs (public)

use axum::response::Redirect;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::database::models::person::{Person, PersonPayload};
use crate::handlers::person;

/// Name of the Basic security scheme referenced by the person operations
pub const BASIC_AUTH_SCHEME: &str = "basicAuth";

#[derive(OpenApi)]
#[openapi(
    info(title = "Person API", version = "v1"),
    paths(person::get_person, person::post_person, person::delete_person),
    components(schemas(Person, PersonPayload)),
    modifiers(&BasicAuthScheme)
)]
pub struct ApiDoc;

struct BasicAuthScheme;

impl Modify for BasicAuthScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            BASIC_AUTH_SCHEME,
            SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
        );
    }
}

/// Swagger UI under /swagger-ui with the document at /v3/api-docs
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/v3/api-docs", ApiDoc::openapi())
}

/// GET /swagger-ui.html - legacy entry point
pub async fn swagger_ui_redirect() -> Redirect {
    Redirect::permanent("/swagger-ui/index.html")
}
