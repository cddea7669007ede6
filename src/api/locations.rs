//! Rental location endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::location::{CreateLocation, Location, UpdateLocation},
};

use super::AuthenticatedUser;

/// List active locations
#[utoipa::path(
    get,
    path = "/locations",
    tag = "locations",
    responses(
        (status = 200, description = "Location list", body = Vec<Location>)
    )
)]
pub async fn list_locations(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Location>>> {
    let locations = state.services.equipment.list_locations().await?;
    Ok(Json(locations))
}

/// Get a location by ID
#[utoipa::path(
    get,
    path = "/locations/{id}",
    tag = "locations",
    params(("id" = i32, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Location details", body = Location),
        (status = 404, description = "Location not found")
    )
)]
pub async fn get_location(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Location>> {
    let location = state.services.equipment.get_location(id).await?;
    Ok(Json(location))
}

/// Create a location
#[utoipa::path(
    post,
    path = "/locations",
    tag = "locations",
    security(("bearer_auth" = [])),
    request_body = CreateLocation,
    responses(
        (status = 201, description = "Location created", body = Location),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn create_location(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateLocation>,
) -> AppResult<(StatusCode, Json<Location>)> {
    claims.require_staff()?;
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let location = state.services.equipment.create_location(&request).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

/// Update a location
#[utoipa::path(
    put,
    path = "/locations/{id}",
    tag = "locations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Location ID")),
    request_body = UpdateLocation,
    responses(
        (status = 200, description = "Location updated", body = Location),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "Location not found")
    )
)]
pub async fn update_location(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateLocation>,
) -> AppResult<Json<Location>> {
    claims.require_staff()?;

    let location = state
        .services
        .equipment
        .update_location(id, &request)
        .await?;
    Ok(Json(location))
}

/// Soft-delete a location
#[utoipa::path(
    delete,
    path = "/locations/{id}",
    tag = "locations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Location ID")),
    responses(
        (status = 204, description = "Location deleted"),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "Location not found")
    )
)]
pub async fn delete_location(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_staff()?;

    state.services.equipment.delete_location(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
