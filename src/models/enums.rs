//! Shared domain enums, stored as Postgres enum types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// BookingStatus
// ---------------------------------------------------------------------------

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "booking_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    /// Terminal states are retained for audit and accept no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::NoShow
        )
    }

    /// An active booking occupies its equipment for conflict checking.
    pub fn is_active(self) -> bool {
        !matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }

    /// Legal state-machine transitions. Anything else is a conflict, which
    /// also makes repeated `complete`/`cancel` calls illegal rather than
    /// silently re-firing their side effects.
    pub fn can_transition_to(self, to: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, to),
            (Pending, Confirmed)
                | (Confirmed, Confirmed)
                | (Pending, InProgress)
                | (Confirmed, InProgress)
                | (InProgress, Completed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (InProgress, Cancelled)
                | (Confirmed, NoShow)
        )
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::InProgress => "IN_PROGRESS",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::NoShow => "NO_SHOW",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// PaymentStatus
// ---------------------------------------------------------------------------

/// Payment status, tracked independently of the booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unpaid,
    PartiallyPaid,
    Paid,
    Refunded,
    RefundPending,
}

// ---------------------------------------------------------------------------
// EquipmentStatus
// ---------------------------------------------------------------------------

/// Equipment status. Written only by the booking transitions and the
/// maintenance-completion sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "equipment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentStatus {
    Available,
    Rented,
    Maintenance,
    Reserved,
    OutOfService,
    Retired,
}

impl EquipmentStatus {
    /// Whether a cancelled or completed booking may release this equipment
    /// back to AVAILABLE. MAINTENANCE/OUT_OF_SERVICE/RETIRED are owned by
    /// other workflows and are left alone.
    pub fn is_held_by_booking(self) -> bool {
        matches!(self, EquipmentStatus::Reserved | EquipmentStatus::Rented)
    }
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EquipmentStatus::Available => "AVAILABLE",
            EquipmentStatus::Rented => "RENTED",
            EquipmentStatus::Maintenance => "MAINTENANCE",
            EquipmentStatus::Reserved => "RESERVED",
            EquipmentStatus::OutOfService => "OUT_OF_SERVICE",
            EquipmentStatus::Retired => "RETIRED",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// EquipmentCondition
// ---------------------------------------------------------------------------

/// Physical condition of an equipment item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "equipment_condition", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentCondition {
    Excellent,
    Good,
    Fair,
    Poor,
    NeedsRepair,
}

// ---------------------------------------------------------------------------
// UserRole
// ---------------------------------------------------------------------------

/// User roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Customer,
    Admin,
    Manager,
    Staff,
}

impl UserRole {
    /// Staff-level roles may approve and track rentals
    pub fn is_staff(self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Manager | UserRole::Staff)
    }
}

// ---------------------------------------------------------------------------
// AccountStatus
// ---------------------------------------------------------------------------

/// User account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "account_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Inactive,
    Suspended,
    PendingVerification,
}

// ---------------------------------------------------------------------------
// NotificationType
// ---------------------------------------------------------------------------

/// Notification type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notification_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    BookingConfirmed,
    BookingCancelled,
    PaymentReceived,
    PaymentFailed,
    EquipmentAvailable,
    Reminder,
    MaintenanceScheduled,
    SystemAlert,
    Promotion,
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_booking_can_be_confirmed_started_or_cancelled() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::InProgress));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Completed));
    }

    #[test]
    fn approve_may_reconfirm_a_confirmed_booking() {
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Confirmed));
    }

    #[test]
    fn only_in_progress_bookings_complete() {
        assert!(BookingStatus::InProgress.can_transition_to(BookingStatus::Completed));
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Completed));
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Completed));
    }

    #[test]
    fn terminal_states_accept_no_transition() {
        for terminal in [
            BookingStatus::Completed,
            BookingStatus::Cancelled,
            BookingStatus::NoShow,
        ] {
            assert!(terminal.is_terminal());
            for to in [
                BookingStatus::Pending,
                BookingStatus::Confirmed,
                BookingStatus::InProgress,
                BookingStatus::Completed,
                BookingStatus::Cancelled,
                BookingStatus::NoShow,
            ] {
                assert!(!terminal.can_transition_to(to));
            }
        }
    }

    #[test]
    fn active_means_not_cancelled_and_not_completed() {
        assert!(BookingStatus::Pending.is_active());
        assert!(BookingStatus::Confirmed.is_active());
        assert!(BookingStatus::InProgress.is_active());
        assert!(BookingStatus::NoShow.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
        assert!(!BookingStatus::Completed.is_active());
    }

    #[test]
    fn booking_releases_only_reserved_or_rented_equipment() {
        assert!(EquipmentStatus::Reserved.is_held_by_booking());
        assert!(EquipmentStatus::Rented.is_held_by_booking());
        assert!(!EquipmentStatus::Available.is_held_by_booking());
        assert!(!EquipmentStatus::Maintenance.is_held_by_booking());
        assert!(!EquipmentStatus::OutOfService.is_held_by_booking());
    }
}
