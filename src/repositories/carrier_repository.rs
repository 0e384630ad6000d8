use crate::models::carrier::Carrier;
use crate::utils::errors::AppResult;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub struct CarrierRepository {
    pool: PgPool,
}

impl CarrierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        dot_number: &str,
        main_office_address: &str,
        operates_every_day: bool,
    ) -> AppResult<Carrier> {
        let carrier = sqlx::query_as::<_, Carrier>(
            r#"
            INSERT INTO carriers (id, name, dot_number, main_office_address, operates_every_day, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(dot_number)
        .bind(main_office_address)
        .bind(operates_every_day)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(carrier)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Carrier>> {
        let carrier = sqlx::query_as::<_, Carrier>("SELECT * FROM carriers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(carrier)
    }

    pub async fn list(&self) -> AppResult<Vec<Carrier>> {
        let carriers = sqlx::query_as::<_, Carrier>("SELECT * FROM carriers ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(carriers)
    }

    pub async fn update(
        &self,
        current: Carrier,
        name: Option<String>,
        dot_number: Option<String>,
        main_office_address: Option<String>,
        operates_every_day: Option<bool>,
    ) -> AppResult<Carrier> {
        let carrier = sqlx::query_as::<_, Carrier>(
            r#"
            UPDATE carriers
            SET name = $2, dot_number = $3, main_office_address = $4, operates_every_day = $5
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(current.id)
        .bind(name.unwrap_or(current.name))
        .bind(dot_number.unwrap_or(current.dot_number))
        .bind(main_office_address.unwrap_or(current.main_office_address))
        .bind(operates_every_day.unwrap_or(current.operates_every_day))
        .fetch_one(&self.pool)
        .await?;

        Ok(carrier)
    }

    /// Elimina el carrier y en cascada sus drivers y trips
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM carriers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
