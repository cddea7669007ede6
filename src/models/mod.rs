//! Domain models

pub mod booking;
pub mod category;
pub mod enums;
pub mod equipment;
pub mod location;
pub mod notification;
pub mod user;
