//! Booking model and related types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{BookingStatus, PaymentStatus};

/// Booking model from database. Bookings are never physically deleted;
/// terminal states are retained for audit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub id: i32,
    /// Unique, immutable human-readable identifier (e.g. "BK4521700042")
    pub booking_number: String,
    pub customer_id: i32,
    pub equipment_id: i32,
    /// Rental start date, inclusive
    pub start_date: NaiveDate,
    /// Rental end date, inclusive
    pub end_date: NaiveDate,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub total_amount: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub final_amount: Decimal,
    pub security_deposit: Option<Decimal>,
    pub requires_delivery: bool,
    pub delivery_fee: Option<Decimal>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub customer_notes: Option<String>,
    pub admin_notes: Option<String>,
    pub actual_pickup_time: Option<DateTime<Utc>>,
    pub actual_return_time: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub confirmed_by_id: Option<i32>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub cancelled_by_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Closed-interval overlap: two bookings conflict when they share at
    /// least one calendar day.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && self.end_date >= start
    }

    /// Whether the booking window contains the given day (both ends inclusive)
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start_date <= day && self.end_date >= day
    }
}

/// Create booking request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBooking {
    pub equipment_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub requires_delivery: Option<bool>,
    pub delivery_fee: Option<Decimal>,
    pub delivery_address: Option<String>,
    pub security_deposit: Option<Decimal>,
    #[validate(length(max = 2000, message = "Notes too long"))]
    pub customer_notes: Option<String>,
}

/// Cancel booking request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelBooking {
    pub reason: Option<String>,
}

/// Booking query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookingQuery {
    pub status: Option<BookingStatus>,
    pub customer_id: Option<i32>,
    pub equipment_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn booking(start: NaiveDate, end: NaiveDate) -> Booking {
        let now = Utc::now();
        Booking {
            id: 1,
            booking_number: "BK0000000001".to_string(),
            customer_id: 1,
            equipment_id: 1,
            start_date: start,
            end_date: end,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            total_amount: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            final_amount: Decimal::ZERO,
            security_deposit: None,
            requires_delivery: false,
            delivery_fee: None,
            delivery_address: None,
            notes: None,
            customer_notes: None,
            admin_notes: None,
            actual_pickup_time: None,
            actual_return_time: None,
            confirmed_at: None,
            confirmed_by_id: None,
            cancelled_at: None,
            cancellation_reason: None,
            cancelled_by_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn overlap_is_closed_on_both_ends() {
        let b = booking(date(2024, 1, 10), date(2024, 1, 20));
        // Shares exactly the boundary day
        assert!(b.overlaps(date(2024, 1, 20), date(2024, 1, 25)));
        assert!(b.overlaps(date(2024, 1, 5), date(2024, 1, 10)));
        // Fully inside / fully covering
        assert!(b.overlaps(date(2024, 1, 12), date(2024, 1, 15)));
        assert!(b.overlaps(date(2024, 1, 1), date(2024, 1, 31)));
        // Adjacent but disjoint
        assert!(!b.overlaps(date(2024, 1, 21), date(2024, 1, 25)));
        assert!(!b.overlaps(date(2024, 1, 1), date(2024, 1, 9)));
    }

    #[test]
    fn contains_is_inclusive() {
        let b = booking(date(2024, 1, 10), date(2024, 1, 20));
        assert!(b.contains(date(2024, 1, 10)));
        assert!(b.contains(date(2024, 1, 20)));
        assert!(!b.contains(date(2024, 1, 21)));
    }
}
