//! Equipment catalog service

use crate::{
    error::AppResult,
    models::{
        category::{Category, CreateCategory, UpdateCategory},
        enums::EquipmentStatus,
        equipment::{CreateEquipment, Equipment, EquipmentQuery, UpdateEquipment},
        location::{CreateLocation, Location, UpdateLocation},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list(query).await
    }

    pub async fn get(&self, id: i32) -> AppResult<Equipment> {
        self.repository.equipment.get_by_id(id).await
    }

    pub async fn get_by_code(&self, code: &str) -> AppResult<Equipment> {
        self.repository.equipment.get_by_code(code).await
    }

    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        if let Some(category_id) = data.category_id {
            self.repository.categories.get_by_id(category_id).await?;
        }
        if let Some(location_id) = data.location_id {
            self.repository.locations.get_by_id(location_id).await?;
        }
        self.repository.equipment.create(data).await
    }

    pub async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        if let Some(category_id) = data.category_id {
            self.repository.categories.get_by_id(category_id).await?;
        }
        if let Some(location_id) = data.location_id {
            self.repository.locations.get_by_id(location_id).await?;
        }
        self.repository.equipment.update(id, data).await
    }

    /// Manual status change (maintenance, out-of-service, reserved)
    pub async fn update_status(&self, id: i32, status: EquipmentStatus) -> AppResult<Equipment> {
        self.repository.equipment.update_status(id, status).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.equipment.delete(id).await
    }

    // Categories

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.repository.categories.list().await
    }

    pub async fn get_category(&self, id: i32) -> AppResult<Category> {
        self.repository.categories.get_by_id(id).await
    }

    pub async fn create_category(&self, data: &CreateCategory) -> AppResult<Category> {
        self.repository.categories.create(data).await
    }

    pub async fn update_category(&self, id: i32, data: &UpdateCategory) -> AppResult<Category> {
        self.repository.categories.update(id, data).await
    }

    pub async fn delete_category(&self, id: i32) -> AppResult<()> {
        self.repository.categories.delete(id).await
    }

    // Locations

    pub async fn list_locations(&self) -> AppResult<Vec<Location>> {
        self.repository.locations.list().await
    }

    pub async fn get_location(&self, id: i32) -> AppResult<Location> {
        self.repository.locations.get_by_id(id).await
    }

    pub async fn create_location(&self, data: &CreateLocation) -> AppResult<Location> {
        self.repository.locations.create(data).await
    }

    pub async fn update_location(&self, id: i32, data: &UpdateLocation) -> AppResult<Location> {
        self.repository.locations.update(id, data).await
    }

    pub async fn delete_location(&self, id: i32) -> AppResult<()> {
        self.repository.locations.delete(id).await
    }
}
