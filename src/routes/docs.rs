use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

const SWAGGER_UI_PATH: &str = "/docs";
const OPENAPI_JSON_PATH: &str = "/api-doc/openapi.json";

/// Swagger UI for the match play API, plus the raw OpenAPI document it renders.
pub fn router(state: SharedState) -> Router<SharedState> {
    let ui: Router<SharedState> = SwaggerUi::new(SWAGGER_UI_PATH)
        .url(OPENAPI_JSON_PATH, ApiDoc::openapi())
        .into();

    ui.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_public_and_admin_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/healthcheck",
            "/public/standings",
            "/public/teams/{id}/players",
            "/public/matches/{id}/holes",
            "/admin/matches/{id}/holes",
            "/admin/matches/{id}/status",
            "/admin/teams/{id}/players",
            "/sse/live",
            "/ws",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
