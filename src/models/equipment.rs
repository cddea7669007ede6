//! Equipment model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{EquipmentCondition, EquipmentStatus};

/// Equipment model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    /// Unique human-readable code (e.g. "EQ000042")
    pub equipment_code: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    /// Base rate; a missing daily rate is a configuration error and makes the
    /// item unpriceable rather than free.
    pub daily_rate: Option<Decimal>,
    /// Weekly tier; absent means the tier is not offered
    pub weekly_rate: Option<Decimal>,
    /// Monthly tier; absent means the tier is not offered
    pub monthly_rate: Option<Decimal>,
    pub status: EquipmentStatus,
    pub condition: EquipmentCondition,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub image_url: Option<String>,
    /// Soft-delete marker, independent of status
    pub is_active: bool,
    pub is_featured: bool,
    pub minimum_rental_days: i32,
    pub maximum_rental_days: i32,
    pub security_deposit: Option<Decimal>,
    pub last_maintenance_date: Option<DateTime<Utc>>,
    pub next_maintenance_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub daily_rate: Option<Decimal>,
    pub weekly_rate: Option<Decimal>,
    pub monthly_rate: Option<Decimal>,
    pub condition: Option<EquipmentCondition>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub image_url: Option<String>,
    pub is_featured: Option<bool>,
    pub minimum_rental_days: Option<i32>,
    pub maximum_rental_days: Option<i32>,
    pub security_deposit: Option<Decimal>,
}

/// Update equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipment {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub daily_rate: Option<Decimal>,
    pub weekly_rate: Option<Decimal>,
    pub monthly_rate: Option<Decimal>,
    pub condition: Option<EquipmentCondition>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub image_url: Option<String>,
    pub is_featured: Option<bool>,
    pub minimum_rental_days: Option<i32>,
    pub maximum_rental_days: Option<i32>,
    pub security_deposit: Option<Decimal>,
    pub next_maintenance_date: Option<DateTime<Utc>>,
}

/// Equipment query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EquipmentQuery {
    /// Free-text search over name/description/manufacturer/model
    pub search: Option<String>,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub status: Option<EquipmentStatus>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub featured: Option<bool>,
    /// Only equipment currently bookable (AVAILABLE and active)
    pub available: Option<bool>,
}

/// Date-range availability query
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AvailabilityQuery {
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
}
