//! Business logic services

pub mod bookings;
pub mod email;
pub mod equipment;
pub mod maintenance;
pub mod notifications;
pub mod users;

use crate::{
    config::{AuthConfig, EmailConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub equipment: equipment::EquipmentService,
    pub bookings: bookings::BookingsService,
    pub notifications: notifications::NotificationsService,
    pub maintenance: maintenance::MaintenanceService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, email_config: EmailConfig) -> Self {
        let email = email::EmailService::new(email_config);
        let notifications =
            notifications::NotificationsService::new(repository.clone(), email);
        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            equipment: equipment::EquipmentService::new(repository.clone()),
            bookings: bookings::BookingsService::new(repository.clone(), notifications.clone()),
            notifications,
            maintenance: maintenance::MaintenanceService::new(repository),
        }
    }
}
