//! Booking lifecycle service
//!
//! Orchestrates the booking state machine: every operation delegates the
//! transactional work to the repository and then fires the matching
//! notification. Notification failures are logged and swallowed; they never
//! roll back a committed transition.

use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::{
    error::AppResult,
    models::booking::{Booking, BookingQuery, CreateBooking},
    repository::Repository,
    services::notifications::NotificationsService,
};

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
    notifications: NotificationsService,
}

impl BookingsService {
    pub fn new(repository: Repository, notifications: NotificationsService) -> Self {
        Self {
            repository,
            notifications,
        }
    }

    /// List bookings with optional filters
    pub async fn list(&self, query: &BookingQuery) -> AppResult<Vec<Booking>> {
        self.repository.bookings.list(query).await
    }

    /// Get a booking by ID
    pub async fn get(&self, id: i32) -> AppResult<Booking> {
        self.repository.bookings.get_by_id(id).await
    }

    /// Get a booking by its booking number
    pub async fn get_by_number(&self, number: &str) -> AppResult<Booking> {
        self.repository.bookings.get_by_number(number).await
    }

    /// Get a customer's bookings
    pub async fn get_customer_bookings(&self, customer_id: i32) -> AppResult<Vec<Booking>> {
        self.repository.users.get_by_id(customer_id).await?;
        self.repository.bookings.find_by_customer(customer_id).await
    }

    /// Get all bookings for an equipment item
    pub async fn get_equipment_bookings(&self, equipment_id: i32) -> AppResult<Vec<Booking>> {
        self.repository.equipment.get_by_id(equipment_id).await?;
        self.repository.bookings.find_by_equipment(equipment_id).await
    }

    /// Whether the equipment is free of active bookings over the range
    pub async fn is_available(
        &self,
        equipment_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<bool> {
        self.repository
            .bookings
            .is_available(equipment_id, start_date, end_date)
            .await
    }

    /// Create a new booking for a customer
    pub async fn create_booking(
        &self,
        data: CreateBooking,
        customer_id: i32,
    ) -> AppResult<Booking> {
        let booking = self.repository.bookings.create(&data, customer_id).await?;
        self.notifications.booking_created(&booking).await;
        Ok(booking)
    }

    /// Confirm a pending booking (marks it paid, manual trust flow)
    pub async fn confirm_booking(&self, id: i32, confirmed_by: i32) -> AppResult<Booking> {
        let booking = self.repository.bookings.confirm(id, confirmed_by).await?;
        self.notifications.booking_status_updated(&booking).await;
        Ok(booking)
    }

    /// Staff approval of a booking
    pub async fn approve_booking(&self, id: i32, approved_by: i32) -> AppResult<Booking> {
        let booking = self.repository.bookings.approve(id, approved_by).await?;
        self.notifications.booking_status_updated(&booking).await;
        Ok(booking)
    }

    /// Start a booking (equipment handed over)
    pub async fn start_booking(&self, id: i32) -> AppResult<Booking> {
        self.repository.bookings.start(id).await
    }

    /// Complete a booking (equipment returned)
    pub async fn complete_booking(&self, id: i32) -> AppResult<Booking> {
        let booking = self.repository.bookings.complete(id).await?;
        self.notifications.booking_completed(&booking).await;
        Ok(booking)
    }

    /// Cancel a booking
    pub async fn cancel_booking(
        &self,
        id: i32,
        reason: Option<String>,
        cancelled_by: i32,
    ) -> AppResult<Booking> {
        let booking = self
            .repository
            .bookings
            .cancel(id, reason.as_deref(), cancelled_by)
            .await?;
        self.notifications.booking_cancelled(&booking).await;
        Ok(booking)
    }

    /// Mark a confirmed booking as a no-show
    pub async fn mark_no_show(&self, id: i32) -> AppResult<Booking> {
        self.repository.bookings.mark_no_show(id).await
    }

    /// Record discount/tax adjustments on a booking
    pub async fn apply_adjustments(
        &self,
        id: i32,
        discount: Decimal,
        tax: Decimal,
    ) -> AppResult<Booking> {
        self.repository.bookings.apply_adjustments(id, discount, tax).await
    }

    /// Earliest date the equipment becomes free, judged from today
    pub async fn next_available_date(&self, equipment_id: i32) -> AppResult<NaiveDate> {
        self.repository.equipment.get_by_id(equipment_id).await?;
        let bookings = self.repository.bookings.find_by_equipment(equipment_id).await?;
        let today = Utc::now().date_naive();
        Ok(next_available_from(&bookings, today))
    }
}

/// Scan bookings for the earliest free date: every active booking whose
/// window contains `today` pushes the candidate past its end date. `today`
/// is evaluated once by the caller so the scan is self-consistent.
fn next_available_from(bookings: &[Booking], today: NaiveDate) -> NaiveDate {
    let mut candidate = today;
    for booking in bookings {
        if !booking.status.is_active() {
            continue;
        }
        if booking.contains(today) {
            if let Some(next) = booking.end_date.checked_add_days(Days::new(1)) {
                if next > candidate {
                    candidate = next;
                }
            }
        }
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{BookingStatus, PaymentStatus};
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn booking(start: NaiveDate, end: NaiveDate, status: BookingStatus) -> Booking {
        let now = Utc::now();
        Booking {
            id: 1,
            booking_number: "BK0000000001".to_string(),
            customer_id: 1,
            equipment_id: 1,
            start_date: start,
            end_date: end,
            status,
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
    fn unoccupied_equipment_is_available_today() {
        let today = date(2024, 6, 1);
        assert_eq!(next_available_from(&[], today), today);
    }

    #[test]
    fn booking_ending_in_three_days_frees_up_on_day_four() {
        let today = date(2024, 6, 1);
        let bookings = vec![booking(
            date(2024, 5, 28),
            date(2024, 6, 4),
            BookingStatus::InProgress,
        )];
        assert_eq!(next_available_from(&bookings, today), date(2024, 6, 5));
    }

    #[test]
    fn cancelled_and_completed_bookings_are_ignored() {
        let today = date(2024, 6, 1);
        let bookings = vec![
            booking(date(2024, 5, 28), date(2024, 6, 10), BookingStatus::Cancelled),
            booking(date(2024, 5, 28), date(2024, 6, 10), BookingStatus::Completed),
        ];
        assert_eq!(next_available_from(&bookings, today), today);
    }

    #[test]
    fn future_bookings_do_not_move_todays_availability() {
        let today = date(2024, 6, 1);
        let bookings = vec![booking(
            date(2024, 6, 10),
            date(2024, 6, 20),
            BookingStatus::Confirmed,
        )];
        assert_eq!(next_available_from(&bookings, today), today);
    }

    #[test]
    fn longest_current_booking_wins() {
        let today = date(2024, 6, 1);
        let bookings = vec![
            booking(date(2024, 5, 30), date(2024, 6, 2), BookingStatus::InProgress),
            booking(date(2024, 6, 1), date(2024, 6, 7), BookingStatus::Confirmed),
        ];
        assert_eq!(next_available_from(&bookings, today), date(2024, 6, 8));
    }

    #[test]
    fn booking_ending_today_frees_up_tomorrow() {
        let today = date(2024, 6, 1);
        let bookings = vec![booking(
            date(2024, 5, 28),
            date(2024, 6, 1),
            BookingStatus::InProgress,
        )];
        assert_eq!(next_available_from(&bookings, today), date(2024, 6, 2));
    }
}
