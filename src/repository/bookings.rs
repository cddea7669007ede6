//! Bookings repository: booking lifecycle and availability queries
//!
//! Every lifecycle transition runs in a single transaction that also updates
//! the linked equipment's status, so a failed transition leaves both rows
//! untouched. Booking creation serializes per equipment item through a
//! Postgres advisory lock, closing the check-then-act window between the
//! availability check and the insert.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingQuery, CreateBooking},
        enums::{BookingStatus, EquipmentStatus, PaymentStatus},
        equipment::Equipment,
    },
    pricing::{self, RateTable},
};

/// Advisory lock namespace for booking creation ("BK")
const BOOKING_LOCK_CLASS: i32 = 0x424B;

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get booking by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
    }

    /// Get booking by its booking number
    pub async fn get_by_number(&self, booking_number: &str) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE booking_number = $1")
            .bind(booking_number)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Booking {} not found", booking_number))
            })
    }

    /// List bookings, newest first, with optional filters
    pub async fn list(&self, query: &BookingQuery) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE ($1::booking_status IS NULL OR status = $1)
              AND ($2::int4 IS NULL OR customer_id = $2)
              AND ($3::int4 IS NULL OR equipment_id = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(query.status)
        .bind(query.customer_id)
        .bind(query.equipment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    /// Get bookings for a customer, newest first
    pub async fn find_by_customer(&self, customer_id: i32) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE customer_id = $1 ORDER BY created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    /// Get all bookings for an equipment item
    pub async fn find_by_equipment(&self, equipment_id: i32) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE equipment_id = $1 ORDER BY start_date",
        )
        .bind(equipment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    /// Whether the equipment has no active booking overlapping the
    /// closed interval [start_date, end_date]
    pub async fn is_available(
        &self,
        equipment_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<bool> {
        let occupied: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE equipment_id = $1
                  AND status NOT IN ('CANCELLED', 'COMPLETED')
                  AND start_date <= $3 AND end_date >= $2
            )
            "#,
        )
        .bind(equipment_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(!occupied)
    }

    /// Create a new booking.
    ///
    /// The whole operation is one transaction holding a per-equipment
    /// advisory lock: equipment lookup, conflict check, price calculation,
    /// booking-number assignment (from a sequence, never count+1), insert and
    /// the equipment status change all commit or roll back together.
    pub async fn create(&self, data: &CreateBooking, customer_id: i32) -> AppResult<Booking> {
        // Reject inverted ranges before touching the database
        pricing::rental_days(data.start_date, data.end_date)?;

        let mut tx = self.pool.begin().await?;

        // Serialize concurrent creates for the same equipment item
        sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
            .bind(BOOKING_LOCK_CLASS)
            .bind(data.equipment_id)
            .execute(&mut *tx)
            .await?;

        let equipment = sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(data.equipment_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Equipment {} not found", data.equipment_id))
            })?;

        let conflict: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE equipment_id = $1
                  AND status NOT IN ('CANCELLED', 'COMPLETED')
                  AND start_date <= $3 AND end_date >= $2
            )
            "#,
        )
        .bind(data.equipment_id)
        .bind(data.start_date)
        .bind(data.end_date)
        .fetch_one(&mut *tx)
        .await?;

        if conflict {
            return Err(AppError::Conflict(
                "Equipment is not available for the selected dates".to_string(),
            ));
        }

        let requires_delivery = data.requires_delivery.unwrap_or(false);
        let total_amount = pricing::compute_total(
            data.start_date,
            data.end_date,
            &RateTable::from(&equipment),
            requires_delivery,
            data.delivery_fee,
        )?;

        let booking_number = Self::next_booking_number(&mut tx).await?;

        // Discount/tax are recorded but applied only through the explicit
        // adjustment hook; at creation final mirrors total.
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                booking_number, customer_id, equipment_id, start_date, end_date,
                status, payment_status,
                total_amount, discount_amount, tax_amount, final_amount,
                security_deposit, requires_delivery, delivery_fee, delivery_address,
                customer_notes
            )
            VALUES ($1, $2, $3, $4, $5, 'PENDING', 'UNPAID', $6, 0, 0, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&booking_number)
        .bind(customer_id)
        .bind(data.equipment_id)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(total_amount)
        .bind(data.security_deposit)
        .bind(requires_delivery)
        .bind(data.delivery_fee)
        .bind(&data.delivery_address)
        .bind(&data.customer_notes)
        .fetch_one(&mut *tx)
        .await?;

        Self::set_equipment_status(&mut tx, data.equipment_id, EquipmentStatus::Rented).await?;

        tx.commit().await?;

        tracing::info!(
            "Booking {} created for equipment {} ({} - {})",
            booking.booking_number,
            data.equipment_id,
            data.start_date,
            data.end_date
        );
        Ok(booking)
    }

    /// Confirm a pending booking. The manual payment flow marks the booking
    /// paid here without gateway verification.
    pub async fn confirm(&self, id: i32, confirmed_by: i32) -> AppResult<Booking> {
        self.confirm_inner(id, confirmed_by, false).await
    }

    /// Staff approval: like confirm, but re-approving an already confirmed
    /// booking is allowed.
    pub async fn approve(&self, id: i32, approved_by: i32) -> AppResult<Booking> {
        self.confirm_inner(id, approved_by, true).await
    }

    async fn confirm_inner(
        &self,
        id: i32,
        confirmed_by: i32,
        allow_reconfirm: bool,
    ) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;
        let booking = Self::get_for_update(&mut tx, id).await?;

        let legal = if allow_reconfirm {
            booking.status.can_transition_to(BookingStatus::Confirmed)
        } else {
            booking.status == BookingStatus::Pending
        };
        if !legal {
            return Err(AppError::Conflict(format!(
                "Cannot confirm booking in status {}",
                booking.status
            )));
        }

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = 'CONFIRMED', payment_status = $2,
                confirmed_at = now(), confirmed_by_id = $3, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(PaymentStatus::Paid)
        .bind(confirmed_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(booking)
    }

    /// Start a booking (equipment picked up)
    pub async fn start(&self, id: i32) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;
        let booking = Self::get_for_update(&mut tx, id).await?;

        if !booking.status.can_transition_to(BookingStatus::InProgress) {
            return Err(AppError::Conflict(format!(
                "Cannot start booking in status {}",
                booking.status
            )));
        }

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = 'IN_PROGRESS', actual_pickup_time = now(), updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        Self::set_equipment_status(&mut tx, booking.equipment_id, EquipmentStatus::Rented)
            .await?;

        tx.commit().await?;
        Ok(booking)
    }

    /// Complete a booking (equipment returned)
    pub async fn complete(&self, id: i32) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;
        let booking = Self::get_for_update(&mut tx, id).await?;

        if !booking.status.can_transition_to(BookingStatus::Completed) {
            return Err(AppError::Conflict(format!(
                "Cannot complete booking in status {}",
                booking.status
            )));
        }

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = 'COMPLETED', actual_return_time = now(), updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        Self::release_equipment(&mut tx, booking.equipment_id, booking.id, false).await?;

        tx.commit().await?;
        Ok(booking)
    }

    /// Cancel a booking with a reason
    pub async fn cancel(
        &self,
        id: i32,
        reason: Option<&str>,
        cancelled_by: i32,
    ) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;
        let booking = Self::get_for_update(&mut tx, id).await?;

        if !booking.status.can_transition_to(BookingStatus::Cancelled) {
            return Err(AppError::Conflict(format!(
                "Cannot cancel booking in status {}",
                booking.status
            )));
        }

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = 'CANCELLED', cancelled_at = now(),
                cancellation_reason = $2, cancelled_by_id = $3, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(reason)
        .bind(cancelled_by)
        .fetch_one(&mut *tx)
        .await?;

        Self::release_equipment(&mut tx, booking.equipment_id, booking.id, true).await?;

        tx.commit().await?;
        Ok(booking)
    }

    /// Mark a confirmed booking as a no-show
    pub async fn mark_no_show(&self, id: i32) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;
        let booking = Self::get_for_update(&mut tx, id).await?;

        if !booking.status.can_transition_to(BookingStatus::NoShow) {
            return Err(AppError::Conflict(format!(
                "Cannot mark booking in status {} as no-show",
                booking.status
            )));
        }

        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'NO_SHOW', updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        Self::release_equipment(&mut tx, booking.equipment_id, booking.id, true).await?;

        tx.commit().await?;
        Ok(booking)
    }

    /// Record discount/tax adjustments and recompute the final amount.
    /// The automatic calculation never applies these; they enter only here.
    pub async fn apply_adjustments(
        &self,
        id: i32,
        discount_amount: Decimal,
        tax_amount: Decimal,
    ) -> AppResult<Booking> {
        if discount_amount < Decimal::ZERO || tax_amount < Decimal::ZERO {
            return Err(AppError::Validation(
                "Adjustment amounts must not be negative".to_string(),
            ));
        }

        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET discount_amount = $2, tax_amount = $3,
                final_amount = total_amount - $2 + $3, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(discount_amount)
        .bind(tax_amount)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
    }

    /// Fetch a booking inside a transaction, locking the row for the
    /// duration of the transition
    async fn get_for_update(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        id: i32,
    ) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
    }

    /// Next booking number: sequence value plus a millisecond disambiguator,
    /// fixed-width. Uniqueness rests on the sequence alone.
    async fn next_booking_number(tx: &mut sqlx::Transaction<'_, Postgres>) -> AppResult<String> {
        let seq: i64 = sqlx::query_scalar("SELECT nextval('booking_number_seq')")
            .fetch_one(&mut **tx)
            .await?;
        let stamp = Utc::now().timestamp_millis() % 100_000;
        Ok(format!("BK{:05}{:05}", stamp, seq))
    }

    /// Single writer for booking-driven equipment status changes
    async fn set_equipment_status(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        equipment_id: i32,
        status: EquipmentStatus,
    ) -> AppResult<()> {
        let result = sqlx::query("UPDATE equipment SET status = $2, updated_at = now() WHERE id = $1")
            .bind(equipment_id)
            .bind(status)
            .execute(&mut **tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Equipment {} not found",
                equipment_id
            )));
        }
        Ok(())
    }

    /// Release equipment after a terminal transition. The item goes back to
    /// AVAILABLE only when no other active booking still holds it; when
    /// `only_if_held` is set (cancel/no-show), statuses outside
    /// RESERVED/RENTED (e.g. MAINTENANCE) are left alone.
    async fn release_equipment(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        equipment_id: i32,
        booking_id: i32,
        only_if_held: bool,
    ) -> AppResult<()> {
        let current: Option<EquipmentStatus> =
            sqlx::query_scalar("SELECT status FROM equipment WHERE id = $1")
                .bind(equipment_id)
                .fetch_optional(&mut **tx)
                .await?;
        let current = current.ok_or_else(|| {
            AppError::NotFound(format!("Equipment {} not found", equipment_id))
        })?;

        if only_if_held && !current.is_held_by_booking() {
            return Ok(());
        }

        let still_held: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE equipment_id = $1 AND id <> $2
                  AND status NOT IN ('CANCELLED', 'COMPLETED')
            )
            "#,
        )
        .bind(equipment_id)
        .bind(booking_id)
        .fetch_one(&mut **tx)
        .await?;

        if !still_held {
            Self::set_equipment_status(tx, equipment_id, EquipmentStatus::Available).await?;
        }
        Ok(())
    }
}
