use utoipa::OpenApi;
use utoipa::ToSchema;
use utoipa_swagger_ui::SwaggerUi;

use crate::errors::ErrorBody;
use crate::routes::spaceships::SpaceshipInput;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Mirrors `models::spaceship::Model` for the schema.
#[derive(ToSchema)]
pub struct SpaceshipDoc {
    /// Storage-assigned identifier
    pub id: i64,
    pub name: String,
    pub series: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::spaceships::list,
        crate::routes::spaceships::get,
        crate::routes::spaceships::search,
        crate::routes::spaceships::create,
        crate::routes::spaceships::update,
        crate::routes::spaceships::delete,
    ),
    components(
        schemas(
            HealthResponse,
            SpaceshipDoc,
            SpaceshipInput,
            ErrorBody,
        )
    ),
    tags(
        (name = "health"),
        (name = "spaceships")
    )
)]
pub struct ApiDoc;

/// Swagger UI at `/swagger-ui`, document at `/api-docs/openapi.json`.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
