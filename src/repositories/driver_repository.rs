use crate::models::driver::{Driver, DriverWithCarrier};
use crate::utils::errors::AppResult;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

const SELECT_WITH_CARRIER: &str = r#"
    SELECT d.id, d.driver_id, d.name, d.cdl_number, d.carrier_id, c.name AS carrier_name,
           d.created_at, d.updated_at
    FROM drivers d
    JOIN carriers c ON c.id = d.carrier_id
"#;

pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        driver_id: &str,
        name: &str,
        cdl_number: &str,
        carrier_id: Uuid,
    ) -> AppResult<Driver> {
        let now = Utc::now();
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (id, driver_id, name, cdl_number, carrier_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *
            "#
        )
        .bind(Uuid::new_v4())
        .bind(driver_id)
        .bind(name)
        .bind(cdl_number)
        .bind(carrier_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DriverWithCarrier>> {
        let driver = sqlx::query_as::<_, DriverWithCarrier>(&format!("{} WHERE d.id = $1", SELECT_WITH_CARRIER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(driver)
    }

    pub async fn list(&self) -> AppResult<Vec<DriverWithCarrier>> {
        let drivers = sqlx::query_as::<_, DriverWithCarrier>(&format!("{} ORDER BY d.name", SELECT_WITH_CARRIER))
            .fetch_all(&self.pool)
            .await?;

        Ok(drivers)
    }

    /// `driver_id` es único entre todos los carriers
    pub async fn driver_id_exists(&self, driver_id: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM drivers WHERE driver_id = $1 AND ($2::uuid IS NULL OR id <> $2))"
        )
        .bind(driver_id)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn update(
        &self,
        current: DriverWithCarrier,
        driver_id: Option<String>,
        name: Option<String>,
        cdl_number: Option<String>,
        carrier_id: Option<Uuid>,
    ) -> AppResult<Driver> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers
            SET driver_id = $2, name = $3, cdl_number = $4, carrier_id = $5, updated_at = $6
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(current.id)
        .bind(driver_id.unwrap_or(current.driver_id))
        .bind(name.unwrap_or(current.name))
        .bind(cdl_number.unwrap_or(current.cdl_number))
        .bind(carrier_id.unwrap_or(current.carrier_id))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
