//! Notification service
//!
//! Creates in-app notifications and sends the matching emails. All booking
//! helpers are best-effort: failures are logged, never propagated, so a
//! notification hiccup cannot fail a booking operation.

use tracing::{error, warn};

use crate::{
    error::AppResult,
    models::{booking::Booking, enums::NotificationType, notification::Notification},
    repository::Repository,
    services::email::EmailService,
};

#[derive(Clone)]
pub struct NotificationsService {
    repository: Repository,
    email: EmailService,
}

impl NotificationsService {
    pub fn new(repository: Repository, email: EmailService) -> Self {
        Self { repository, email }
    }

    /// Recent notifications for a user, newest first
    pub async fn get_user_notifications(&self, user_id: i32) -> AppResult<Vec<Notification>> {
        self.repository.notifications.find_by_user(user_id).await
    }

    /// Number of unread notifications for a user
    pub async fn unread_count(&self, user_id: i32) -> AppResult<i64> {
        self.repository.notifications.count_unread(user_id).await
    }

    pub async fn mark_read(&self, id: i32, user_id: i32) -> AppResult<()> {
        self.repository.notifications.mark_read(id, user_id).await
    }

    pub async fn mark_all_read(&self, user_id: i32) -> AppResult<u64> {
        self.repository.notifications.mark_all_read(user_id).await
    }

    pub async fn delete(&self, id: i32, user_id: i32) -> AppResult<()> {
        self.repository.notifications.delete(id, user_id).await
    }

    /// Notify the customer that their booking was created
    pub async fn booking_created(&self, booking: &Booking) {
        self.notify_customer(
            booking,
            NotificationType::BookingConfirmed,
            "Booking Confirmed",
            &format!(
                "Your booking #{} has been created successfully.",
                booking.booking_number
            ),
        )
        .await;
    }

    /// Notify the customer that their booking changed status
    pub async fn booking_status_updated(&self, booking: &Booking) {
        self.notify_customer(
            booking,
            NotificationType::BookingConfirmed,
            "Booking Status Updated",
            &format!(
                "Your booking #{} status has been updated to {}",
                booking.booking_number, booking.status
            ),
        )
        .await;
    }

    /// Notify the customer that their booking was cancelled
    pub async fn booking_cancelled(&self, booking: &Booking) {
        self.notify_customer(
            booking,
            NotificationType::BookingCancelled,
            "Booking Cancelled",
            &format!("Your booking #{} has been cancelled.", booking.booking_number),
        )
        .await;
    }

    /// Notify the customer that their booking was completed
    pub async fn booking_completed(&self, booking: &Booking) {
        self.notify_customer(
            booking,
            NotificationType::BookingConfirmed,
            "Booking Completed",
            &format!(
                "Your booking #{} has been completed. Thank you!",
                booking.booking_number
            ),
        )
        .await;
    }

    /// Create the in-app notification and email the customer. Best-effort.
    async fn notify_customer(
        &self,
        booking: &Booking,
        kind: NotificationType,
        title: &str,
        message: &str,
    ) {
        let customer = match self.repository.users.get_by_id(booking.customer_id).await {
            Ok(user) => user,
            Err(e) => {
                warn!(
                    booking_id = booking.id,
                    "Cannot send notification, customer lookup failed: {}", e
                );
                return;
            }
        };

        let link = format!("/my-bookings/{}", booking.id);
        if let Err(e) = self
            .repository
            .notifications
            .create(customer.id, kind, title, message, Some(&link))
            .await
        {
            error!(booking_id = booking.id, "Failed to create notification: {}", e);
        }

        if self.email.is_enabled() {
            if let Err(e) = self
                .email
                .send_booking_email(&customer.email, title, message)
                .await
            {
                error!(booking_id = booking.id, "Failed to send email: {}", e);
            }
        }
    }
}
