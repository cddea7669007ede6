//! Equipment catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::Booking,
        enums::EquipmentStatus,
        equipment::{AvailabilityQuery, CreateEquipment, Equipment, EquipmentQuery, UpdateEquipment},
    },
};

use super::AuthenticatedUser;

/// Availability response for a date range
#[derive(Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub equipment_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub available: bool,
}

/// Next-available response
#[derive(Serialize, ToSchema)]
pub struct NextAvailableResponse {
    pub equipment_id: i32,
    pub next_available_date: NaiveDate,
}

/// Status update request
#[derive(Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: EquipmentStatus,
}

/// List equipment with filters
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    params(EquipmentQuery),
    responses(
        (status = 200, description = "Equipment list", body = Vec<Equipment>)
    )
)]
pub async fn list_equipment(
    State(state): State<crate::AppState>,
    Query(query): Query<EquipmentQuery>,
) -> AppResult<Json<Vec<Equipment>>> {
    let equipment = state.services.equipment.list(&query).await?;
    Ok(Json(equipment))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.get(id).await?;
    Ok(Json(equipment))
}

/// Get equipment by its human-readable code
#[utoipa::path(
    get,
    path = "/equipment/code/{code}",
    tag = "equipment",
    params(("code" = String, Path, description = "Equipment code")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment_by_code(
    State(state): State<crate::AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.get_by_code(&code).await?;
    Ok(Json(equipment))
}

/// Create equipment
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = Equipment),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn create_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateEquipment>,
) -> AppResult<(StatusCode, Json<Equipment>)> {
    claims.require_staff()?;
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let equipment = state.services.equipment.create(&request).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Update equipment details
#[utoipa::path(
    put,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = UpdateEquipment,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn update_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateEquipment>,
) -> AppResult<Json<Equipment>> {
    claims.require_staff()?;

    let equipment = state.services.equipment.update(id, &request).await?;
    Ok(Json(equipment))
}

/// Manually change equipment status (maintenance workflow)
#[utoipa::path(
    put,
    path = "/equipment/{id}/status",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Equipment),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn update_equipment_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateStatusRequest>,
) -> AppResult<Json<Equipment>> {
    claims.require_staff()?;

    let equipment = state
        .services
        .equipment
        .update_status(id, request.status)
        .await?;
    Ok(Json(equipment))
}

/// Retire equipment (soft delete)
#[utoipa::path(
    delete,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 204, description = "Equipment retired"),
        (status = 403, description = "Administrator privileges required"),
        (status = 404, description = "Equipment not found"),
        (status = 409, description = "Equipment is currently rented")
    )
)]
pub async fn delete_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.equipment.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Check availability over a date range
#[utoipa::path(
    get,
    path = "/equipment/{id}/availability",
    tag = "equipment",
    params(
        ("id" = i32, Path, description = "Equipment ID"),
        AvailabilityQuery
    ),
    responses(
        (status = 200, description = "Availability for the range", body = AvailabilityResponse),
        (status = 400, description = "Invalid date range"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn check_availability(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    if query.start_date > query.end_date {
        return Err(AppError::Validation(
            "start_date must not be after end_date".to_string(),
        ));
    }

    state.services.equipment.get(id).await?;
    let available = state
        .services
        .bookings
        .is_available(id, query.start_date, query.end_date)
        .await?;

    Ok(Json(AvailabilityResponse {
        equipment_id: id,
        start_date: query.start_date,
        end_date: query.end_date,
        available,
    }))
}

/// Earliest date the equipment becomes free
#[utoipa::path(
    get,
    path = "/equipment/{id}/next-available",
    tag = "equipment",
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Next available date", body = NextAvailableResponse),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn next_available(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<NextAvailableResponse>> {
    let next_available_date = state.services.bookings.next_available_date(id).await?;
    Ok(Json(NextAvailableResponse {
        equipment_id: id,
        next_available_date,
    }))
}

/// All bookings for an equipment item
#[utoipa::path(
    get,
    path = "/equipment/{id}/bookings",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Bookings for the equipment", body = Vec<Booking>),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Booking>>> {
    claims.require_staff()?;

    let bookings = state.services.bookings.get_equipment_bookings(id).await?;
    Ok(Json(bookings))
}
