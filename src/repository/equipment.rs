//! Equipment repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::EquipmentStatus,
        equipment::{CreateEquipment, Equipment, EquipmentQuery, UpdateEquipment},
    },
};

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Get equipment by its human-readable code
    pub async fn get_by_code(&self, code: &str) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE equipment_code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", code)))
    }

    /// List equipment with optional search/category/price/status filters
    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
        let search = query.search.as_ref().map(|s| format!("%{}%", s));
        let rows = sqlx::query_as::<_, Equipment>(
            r#"
            SELECT * FROM equipment
            WHERE ($1::text IS NULL OR name ILIKE $1 OR description ILIKE $1
                   OR manufacturer ILIKE $1 OR model ILIKE $1)
              AND ($2::int4 IS NULL OR category_id = $2)
              AND ($3::int4 IS NULL OR location_id = $3)
              AND ($4::equipment_status IS NULL OR status = $4)
              AND ($5::numeric IS NULL OR daily_rate >= $5)
              AND ($6::numeric IS NULL OR daily_rate <= $6)
              AND ($7::bool IS NULL OR is_featured = $7)
              AND (NOT $8 OR (status = 'AVAILABLE' AND is_active))
              AND is_active
            ORDER BY name
            "#,
        )
        .bind(search)
        .bind(query.category_id)
        .bind(query.location_id)
        .bind(query.status)
        .bind(query.min_price)
        .bind(query.max_price)
        .bind(query.featured)
        .bind(query.available.unwrap_or(false))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create equipment, assigning a code from the sequence
    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        let seq: i64 = sqlx::query_scalar("SELECT nextval('equipment_code_seq')")
            .fetch_one(&self.pool)
            .await?;
        let code = format!("EQ{:06}", seq);

        let equipment = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (
                equipment_code, name, description, category_id, location_id,
                daily_rate, weekly_rate, monthly_rate, condition,
                manufacturer, model, serial_number, image_url,
                is_featured, minimum_rental_days, maximum_rental_days, security_deposit
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
                    COALESCE($9, 'EXCELLENT'), $10, $11, $12, $13,
                    COALESCE($14, FALSE), COALESCE($15, 1), COALESCE($16, 365), $17)
            RETURNING *
            "#,
        )
        .bind(&code)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.category_id)
        .bind(data.location_id)
        .bind(data.daily_rate)
        .bind(data.weekly_rate)
        .bind(data.monthly_rate)
        .bind(data.condition)
        .bind(&data.manufacturer)
        .bind(&data.model)
        .bind(&data.serial_number)
        .bind(&data.image_url)
        .bind(data.is_featured)
        .bind(data.minimum_rental_days)
        .bind(data.maximum_rental_days)
        .bind(data.security_deposit)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Equipment {} created: {}", equipment.equipment_code, equipment.name);
        Ok(equipment)
    }

    /// Update equipment details. Status is deliberately not updatable here;
    /// it belongs to the booking transitions and the maintenance workflow.
    pub async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>(
            r#"
            UPDATE equipment SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                category_id = COALESCE($4, category_id),
                location_id = COALESCE($5, location_id),
                daily_rate = COALESCE($6, daily_rate),
                weekly_rate = COALESCE($7, weekly_rate),
                monthly_rate = COALESCE($8, monthly_rate),
                condition = COALESCE($9, condition),
                manufacturer = COALESCE($10, manufacturer),
                model = COALESCE($11, model),
                serial_number = COALESCE($12, serial_number),
                image_url = COALESCE($13, image_url),
                is_featured = COALESCE($14, is_featured),
                minimum_rental_days = COALESCE($15, minimum_rental_days),
                maximum_rental_days = COALESCE($16, maximum_rental_days),
                security_deposit = COALESCE($17, security_deposit),
                next_maintenance_date = COALESCE($18, next_maintenance_date),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.category_id)
        .bind(data.location_id)
        .bind(data.daily_rate)
        .bind(data.weekly_rate)
        .bind(data.monthly_rate)
        .bind(data.condition)
        .bind(&data.manufacturer)
        .bind(&data.model)
        .bind(&data.serial_number)
        .bind(&data.image_url)
        .bind(data.is_featured)
        .bind(data.minimum_rental_days)
        .bind(data.maximum_rental_days)
        .bind(data.security_deposit)
        .bind(data.next_maintenance_date)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Manual status change from the inventory workflow (maintenance,
    /// out-of-service, reserved). Booking transitions never go through here.
    pub async fn update_status(&self, id: i32, status: EquipmentStatus) -> AppResult<Equipment> {
        let equipment = sqlx::query_as::<_, Equipment>(
            "UPDATE equipment SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))?;

        tracing::info!("Equipment {} status set to {}", equipment.equipment_code, status);
        Ok(equipment)
    }

    /// Soft-delete: retire the item and clear its active flag. Rented
    /// equipment cannot be deleted.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let equipment = self.get_by_id(id).await?;

        if equipment.status == EquipmentStatus::Rented {
            return Err(AppError::Conflict(
                "Cannot delete equipment that is currently rented".to_string(),
            ));
        }

        sqlx::query(
            "UPDATE equipment SET is_active = FALSE, status = 'RETIRED', updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        tracing::info!("Equipment {} marked as RETIRED and inactive", equipment.equipment_code);
        Ok(())
    }

    /// Return equipment whose maintenance window has elapsed to AVAILABLE.
    /// Items still held by an active booking are skipped so this sweep can
    /// never contradict the booking state machine. Returns the codes of the
    /// released items.
    pub async fn complete_due_maintenance(&self) -> AppResult<Vec<String>> {
        let codes: Vec<String> = sqlx::query_scalar(
            r#"
            UPDATE equipment SET status = 'AVAILABLE', last_maintenance_date = next_maintenance_date,
                   next_maintenance_date = NULL, updated_at = now()
            WHERE status = 'MAINTENANCE'
              AND next_maintenance_date IS NOT NULL
              AND next_maintenance_date < now()
              AND NOT EXISTS (
                  SELECT 1 FROM bookings b
                  WHERE b.equipment_id = equipment.id
                    AND b.status NOT IN ('CANCELLED', 'COMPLETED')
              )
            RETURNING equipment_code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(codes)
    }
}
