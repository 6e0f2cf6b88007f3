//! Repositorio PostgreSQL
//!
//! Consultas en tiempo de ejecución construidas a partir de `Record::COLUMNS`.
//! Cada llamada es una sentencia atómica; las actualizaciones concurrentes
//! se resuelven con "la última escritura gana".

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{FieldValue, Record, Repository};
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct PgRepository<E: Record> {
    pool: PgPool,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Record> PgRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    fn insert_sql() -> String {
        let placeholders: Vec<String> = (1..=E::COLUMNS.len()).map(|i| format!("${}", i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
            E::TABLE,
            E::COLUMNS.join(", "),
            placeholders.join(", ")
        )
    }

    fn update_sql() -> String {
        // `id` es la primera columna y queda como $1 en el WHERE
        let assignments: Vec<String> = E::COLUMNS
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, column)| format!("{} = ${}", column, i + 1))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE id = $1 RETURNING *",
            E::TABLE,
            assignments.join(", ")
        )
    }

    /// Traduce violaciones de unicidad a `Conflict`
    fn map_write_error(error: sqlx::Error, action: &str) -> AppError {
        if let Some(db_error) = error.as_database_error() {
            if db_error.is_unique_violation() {
                return AppError::Conflict(format!(
                    "{} already exists ({})",
                    E::RESOURCE,
                    db_error.constraint().unwrap_or("unique constraint")
                ));
            }
        }
        tracing::error!("❌ Error {} {}: {}", action, E::RESOURCE, error);
        AppError::Database(error)
    }
}

#[async_trait]
impl<E: Record> Repository<E> for PgRepository<E> {
    async fn get_all(&self) -> AppResult<Vec<E>> {
        let sql = format!("SELECT * FROM {} ORDER BY created_at ASC", E::TABLE);
        let rows = sqlx::query_as::<_, E>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<E> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", E::TABLE);
        sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found_error(E::RESOURCE, &id.to_string()))
    }

    async fn create(&self, new: E::New) -> AppResult<E> {
        let record = E::build(new, Uuid::new_v4(), Utc::now());
        let sql = Self::insert_sql();

        let created = record
            .bind_columns(sqlx::query_as::<_, E>(&sql))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::map_write_error(e, "creating"))?;

        Ok(created)
    }

    async fn update(&self, id: Uuid, patch: E::Patch) -> AppResult<E> {
        let mut record = self.get_by_id(id).await?;
        record.apply(patch, Utc::now());
        let sql = Self::update_sql();

        record
            .bind_columns(sqlx::query_as::<_, E>(&sql))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::map_write_error(e, "updating"))?
            .ok_or_else(|| not_found_error(E::RESOURCE, &id.to_string()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error(E::RESOURCE, &id.to_string()));
        }
        Ok(())
    }

    async fn find_by(&self, column: &'static str, value: FieldValue) -> AppResult<Vec<E>> {
        if !E::FILTERABLE.contains(&column) {
            return Err(AppError::Internal(format!(
                "Column '{}' is not filterable on {}",
                column,
                E::TABLE
            )));
        }

        let rows = match value {
            FieldValue::Null => {
                let sql = format!(
                    "SELECT * FROM {} WHERE {} IS NULL ORDER BY created_at ASC",
                    E::TABLE,
                    column
                );
                sqlx::query_as::<_, E>(&sql).fetch_all(&self.pool).await?
            }
            FieldValue::Uuid(id) => {
                let sql = format!(
                    "SELECT * FROM {} WHERE {} = $1 ORDER BY created_at ASC",
                    E::TABLE,
                    column
                );
                sqlx::query_as::<_, E>(&sql).bind(id).fetch_all(&self.pool).await?
            }
            FieldValue::Text(text) => {
                let sql = format!(
                    "SELECT * FROM {} WHERE {} = $1 ORDER BY created_at ASC",
                    E::TABLE,
                    column
                );
                sqlx::query_as::<_, E>(&sql).bind(text).fetch_all(&self.pool).await?
            }
        };

        Ok(rows)
    }
}
