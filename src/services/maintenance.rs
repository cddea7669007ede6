//! Scheduled maintenance sweep
//!
//! Periodically returns equipment whose maintenance window has elapsed to
//! AVAILABLE. Driven from a background task in main; the interval comes from
//! configuration.

use tracing::{error, info};

use crate::repository::Repository;

#[derive(Clone)]
pub struct MaintenanceService {
    repository: Repository,
}

impl MaintenanceService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// One sweep pass. Errors are logged so a failed pass never kills the
    /// background task.
    pub async fn run_sweep(&self) {
        match self.repository.equipment.complete_due_maintenance().await {
            Ok(codes) if codes.is_empty() => {}
            Ok(codes) => {
                info!(
                    "Maintenance sweep returned {} item(s) to service: {}",
                    codes.len(),
                    codes.join(", ")
                );
            }
            Err(e) => error!("Maintenance sweep failed: {}", e),
        }
    }
}
