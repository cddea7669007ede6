//! Repository layer for database operations

pub mod bookings;
pub mod categories;
pub mod equipment;
pub mod locations;
pub mod notifications;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub equipment: equipment::EquipmentRepository,
    pub bookings: bookings::BookingsRepository,
    pub notifications: notifications::NotificationsRepository,
    pub categories: categories::CategoriesRepository,
    pub locations: locations::LocationsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            bookings: bookings::BookingsRepository::new(pool.clone()),
            notifications: notifications::NotificationsRepository::new(pool.clone()),
            categories: categories::CategoriesRepository::new(pool.clone()),
            locations: locations::LocationsRepository::new(pool.clone()),
            pool,
        }
    }
}
