use axum::{extract::{OriginalUri, State}, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use service::errors::ServiceError;
use service::pagination::PageRequest;
use service::spaceship::{Spaceship, SpaceshipDraft};
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};

use common::metrics::NEGATIVE_ID_LOOKUPS_TOTAL;
use crate::{errors::ApiError, extract::{ApiJson, ApiPath, ApiQuery}, state::ServerState};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Zero-based page index
    #[serde(default)]
    pub page: i64,
    /// Page size
    #[serde(default = "default_size")]
    pub size: i64,
}

fn default_size() -> i64 { PageRequest::DEFAULT_SIZE }

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Substring to look for in spaceship names
    pub name: String,
}

/// Request body for create and update; an `id` field, if sent, is ignored.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SpaceshipInput {
    pub name: String,
    pub series: String,
}

#[utoipa::path(
    get, path = "/api/spaceships", tag = "spaceships",
    params(ListQuery),
    responses(
        (status = 200, description = "Spaceships retrieved", body = [crate::openapi::SpaceshipDoc]),
        (status = 400, description = "Invalid pagination parameters", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorBody)
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> Result<Json<Vec<Spaceship>>, ApiError> {
    let ships = state
        .spaceships
        .list_page(PageRequest::new(q.page, q.size))
        .await
        .map_err(|e| ApiError::from_service(e, uri.path()))?;
    info!(page = q.page, size = q.size, count = ships.len(), "list spaceships");
    Ok(Json(ships))
}

#[utoipa::path(
    get, path = "/api/spaceships/{id}", tag = "spaceships",
    params(("id" = i64, Path, description = "Spaceship id")),
    responses(
        (status = 200, description = "Spaceship retrieved", body = crate::openapi::SpaceshipDoc),
        (status = 400, description = "Id is not an integer", body = crate::errors::ErrorBody),
        (status = 404, description = "Spaceship not found", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorBody)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Spaceship>, ApiError> {
    // Logged only; the lookup still runs.
    if id < 0 {
        NEGATIVE_ID_LOOKUPS_TOTAL.inc();
        warn!(id, "attempt to fetch spaceship with negative id");
    }
    state
        .spaceships
        .get_by_id(id)
        .await
        .and_then(|found| found.ok_or_else(|| ServiceError::spaceship_not_found(id)))
        .map(Json)
        .map_err(|e| ApiError::from_service(e, uri.path()))
}

#[utoipa::path(
    get, path = "/api/spaceships/search", tag = "spaceships",
    params(SearchQuery),
    responses(
        (status = 200, description = "Spaceships whose name contains the fragment", body = [crate::openapi::SpaceshipDoc]),
        (status = 400, description = "Missing name parameter", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorBody)
    )
)]
pub async fn search(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    ApiQuery(q): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<Spaceship>>, ApiError> {
    let ships = state
        .spaceships
        .search_by_name(&q.name)
        .await
        .map_err(|e| ApiError::from_service(e, uri.path()))?;
    info!(name = %q.name, count = ships.len(), "search spaceships");
    Ok(Json(ships))
}

#[utoipa::path(
    post, path = "/api/spaceships", tag = "spaceships",
    request_body = SpaceshipInput,
    responses(
        (status = 200, description = "Spaceship created", body = crate::openapi::SpaceshipDoc),
        (status = 400, description = "Malformed request body", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorBody)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    ApiJson(input): ApiJson<SpaceshipInput>,
) -> Result<Json<Spaceship>, ApiError> {
    let created = state
        .spaceships
        .save(SpaceshipDraft::new(input.name, input.series))
        .await
        .map_err(|e| ApiError::from_service(e, uri.path()))?;
    Ok(Json(created))
}

#[utoipa::path(
    put, path = "/api/spaceships/{id}", tag = "spaceships",
    params(("id" = i64, Path, description = "Spaceship id")),
    request_body = SpaceshipInput,
    responses(
        (status = 200, description = "Spaceship updated (created under this id if absent)", body = crate::openapi::SpaceshipDoc),
        (status = 400, description = "Malformed id or request body", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorBody)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<SpaceshipInput>,
) -> Result<Json<Spaceship>, ApiError> {
    let updated = state
        .spaceships
        .save(SpaceshipDraft::new(input.name, input.series).with_id(id))
        .await
        .map_err(|e| ApiError::from_service(e, uri.path()))?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete, path = "/api/spaceships/{id}", tag = "spaceships",
    params(("id" = i64, Path, description = "Spaceship id")),
    responses(
        (status = 204, description = "Spaceship deleted (or never existed)"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorBody)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .spaceships
        .delete_by_id(id)
        .await
        .map_err(|e| ApiError::from_service(e, uri.path()))?;
    Ok(StatusCode::NO_CONTENT)
}
