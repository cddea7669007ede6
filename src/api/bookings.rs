//! Booking lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::booking::{Booking, BookingQuery, CancelBooking, CreateBooking},
};

use super::AuthenticatedUser;

/// Discount/tax adjustment request
#[derive(Deserialize, ToSchema)]
pub struct AdjustmentsRequest {
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
}

/// List bookings with optional filters
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(BookingQuery),
    responses(
        (status = 200, description = "Booking list", body = Vec<Booking>),
        (status = 403, description = "Staff privileges required")
    )
)]
pub async fn list_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BookingQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    claims.require_staff()?;

    let bookings = state.services.bookings.list(&query).await?;
    Ok(Json(bookings))
}

/// The current user's bookings
#[utoipa::path(
    get,
    path = "/bookings/my",
    tag = "bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's bookings", body = Vec<Booking>)
    )
)]
pub async fn my_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = state
        .services
        .bookings
        .get_customer_bookings(claims.user_id)
        .await?;
    Ok(Json(bookings))
}

/// Get a booking by ID. Customers may only see their own bookings.
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = Booking),
        (status = 403, description = "Not the booking owner"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Booking>> {
    let booking = state.services.bookings.get(id).await?;
    require_owner_or_staff(&claims, &booking)?;
    Ok(Json(booking))
}

/// Get a booking by its booking number
#[utoipa::path(
    get,
    path = "/bookings/number/{number}",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("number" = String, Path, description = "Booking number")),
    responses(
        (status = 200, description = "Booking details", body = Booking),
        (status = 403, description = "Not the booking owner"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking_by_number(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(number): Path<String>,
) -> AppResult<Json<Booking>> {
    let booking = state.services.bookings.get_by_number(&number).await?;
    require_owner_or_staff(&claims, &booking)?;
    Ok(Json(booking))
}

/// Create a booking for the current user
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Equipment not found"),
        (status = 409, description = "Equipment already booked for the range")
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let booking = state
        .services
        .bookings
        .create_booking(request, claims.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Confirm a pending booking
#[utoipa::path(
    post,
    path = "/bookings/{id}/confirm",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking confirmed", body = Booking),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking is not pending")
    )
)]
pub async fn confirm_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Booking>> {
    claims.require_staff()?;

    let booking = state
        .services
        .bookings
        .confirm_booking(id, claims.user_id)
        .await?;
    Ok(Json(booking))
}

/// Approve a booking (idempotent staff confirmation)
#[utoipa::path(
    post,
    path = "/bookings/{id}/approve",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking approved", body = Booking),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking cannot be approved")
    )
)]
pub async fn approve_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Booking>> {
    claims.require_staff()?;

    let booking = state
        .services
        .bookings
        .approve_booking(id, claims.user_id)
        .await?;
    Ok(Json(booking))
}

/// Start a booking (equipment handed over)
#[utoipa::path(
    post,
    path = "/bookings/{id}/start",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking started", body = Booking),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking cannot be started")
    )
)]
pub async fn start_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Booking>> {
    claims.require_staff()?;

    let booking = state.services.bookings.start_booking(id).await?;
    Ok(Json(booking))
}

/// Complete a booking (equipment returned)
#[utoipa::path(
    post,
    path = "/bookings/{id}/complete",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking completed", body = Booking),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking is not in progress")
    )
)]
pub async fn complete_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Booking>> {
    claims.require_staff()?;

    let booking = state.services.bookings.complete_booking(id).await?;
    Ok(Json(booking))
}

/// Cancel a booking. Customers may cancel their own bookings.
#[utoipa::path(
    post,
    path = "/bookings/{id}/cancel",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = CancelBooking,
    responses(
        (status = 200, description = "Booking cancelled", body = Booking),
        (status = 403, description = "Not the booking owner"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking is already terminal")
    )
)]
pub async fn cancel_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<CancelBooking>,
) -> AppResult<Json<Booking>> {
    let booking = state.services.bookings.get(id).await?;
    require_owner_or_staff(&claims, &booking)?;

    let booking = state
        .services
        .bookings
        .cancel_booking(id, request.reason, claims.user_id)
        .await?;
    Ok(Json(booking))
}

/// Mark a confirmed booking as a no-show
#[utoipa::path(
    post,
    path = "/bookings/{id}/no-show",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking marked as no-show", body = Booking),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking is not confirmed")
    )
)]
pub async fn mark_no_show(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Booking>> {
    claims.require_staff()?;

    let booking = state.services.bookings.mark_no_show(id).await?;
    Ok(Json(booking))
}

/// Record discount/tax adjustments on a booking
#[utoipa::path(
    put,
    path = "/bookings/{id}/adjustments",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = AdjustmentsRequest,
    responses(
        (status = 200, description = "Adjustments recorded", body = Booking),
        (status = 400, description = "Negative adjustment"),
        (status = 403, description = "Staff privileges required"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn apply_adjustments(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<AdjustmentsRequest>,
) -> AppResult<Json<Booking>> {
    claims.require_staff()?;

    let booking = state
        .services
        .bookings
        .apply_adjustments(id, request.discount_amount, request.tax_amount)
        .await?;
    Ok(Json(booking))
}

fn require_owner_or_staff(
    claims: &crate::models::user::UserClaims,
    booking: &Booking,
) -> Result<(), AppError> {
    if claims.user_id == booking.customer_id || claims.is_staff() {
        Ok(())
    } else {
        Err(AppError::Authorization(
            "You do not have access to this booking".to_string(),
        ))
    }
}
