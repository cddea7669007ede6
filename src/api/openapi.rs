//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, bookings, categories, equipment, health, locations, notifications, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EquipTrack API",
        version = "1.0.0",
        description = "Equipment Rental Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "EquipTrack Team", email = "contact@equiptrack.io")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::get_equipment_by_code,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::update_equipment_status,
        equipment::delete_equipment,
        equipment::check_availability,
        equipment::next_available,
        equipment::get_equipment_bookings,
        // Bookings
        bookings::list_bookings,
        bookings::my_bookings,
        bookings::get_booking,
        bookings::get_booking_by_number,
        bookings::create_booking,
        bookings::confirm_booking,
        bookings::approve_booking,
        bookings::start_booking,
        bookings::complete_booking,
        bookings::cancel_booking,
        bookings::mark_no_show,
        bookings::apply_adjustments,
        // Users
        users::list_users,
        users::get_user,
        users::get_user_bookings,
        // Notifications
        notifications::list_notifications,
        notifications::unread_count,
        notifications::mark_read,
        notifications::mark_all_read,
        notifications::delete_notification,
        // Categories
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        // Locations
        locations::list_locations,
        locations::get_location,
        locations::create_location,
        locations::update_location,
        locations::delete_location,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::RegisterUser,
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            crate::models::user::User,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            crate::models::equipment::EquipmentQuery,
            crate::models::equipment::AvailabilityQuery,
            equipment::AvailabilityResponse,
            equipment::NextAvailableResponse,
            equipment::UpdateStatusRequest,
            // Bookings
            crate::models::booking::Booking,
            crate::models::booking::CreateBooking,
            crate::models::booking::CancelBooking,
            crate::models::booking::BookingQuery,
            bookings::AdjustmentsRequest,
            // Notifications
            crate::models::notification::Notification,
            notifications::UnreadCountResponse,
            notifications::MarkAllReadResponse,
            // Categories
            crate::models::category::Category,
            crate::models::category::CreateCategory,
            crate::models::category::UpdateCategory,
            // Locations
            crate::models::location::Location,
            crate::models::location::CreateLocation,
            crate::models::location::UpdateLocation,
            // Enums
            crate::models::enums::BookingStatus,
            crate::models::enums::PaymentStatus,
            crate::models::enums::EquipmentStatus,
            crate::models::enums::EquipmentCondition,
            crate::models::enums::UserRole,
            crate::models::enums::AccountStatus,
            crate::models::enums::NotificationType,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "equipment", description = "Equipment catalog and availability"),
        (name = "bookings", description = "Booking lifecycle management"),
        (name = "users", description = "User management"),
        (name = "notifications", description = "User notifications"),
        (name = "categories", description = "Equipment categories"),
        (name = "locations", description = "Rental locations")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
