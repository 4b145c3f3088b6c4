use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::models::drink::{Drink, DrinkRow, Ingredient};

/// Errors from the drink store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Invalid recipe data: {0}")]
    InvalidRecipe(#[source] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Open the connection pool described by the database configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, StoreError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect(&config.url)
        .await?;

    info!("Created database pool for: {}", config.url);
    Ok(pool)
}

/// Handle to the drinks table. Cheap to clone; shared via router state.
#[derive(Clone)]
pub struct DrinkStore {
    pool: SqlitePool,
}

impl DrinkStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Ensure the schema exists. With `recreate` the table is dropped first,
    /// wiping all rows.
    pub async fn bootstrap(&self, recreate: bool) -> Result<(), StoreError> {
        if recreate {
            tracing::warn!("DATABASE_RECREATE_ON_BOOT is set, dropping drinks table");
            sqlx::query("DROP TABLE IF EXISTS drinks")
                .execute(&self.pool)
                .await?;
        }

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS drinks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL UNIQUE,
                recipe TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Every drink, primary-key order not guaranteed stable.
    pub async fn list_all(&self) -> Result<Vec<Drink>, StoreError> {
        let rows = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Drink::try_from).collect()
    }

    /// Insert a new drink; the store assigns the id.
    pub async fn insert(&self, title: &str, recipe: &[Ingredient]) -> Result<Drink, StoreError> {
        let recipe_json = serde_json::to_string(recipe).map_err(StoreError::InvalidRecipe)?;

        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, DrinkRow>(
            "INSERT INTO drinks (title, recipe) VALUES (?1, ?2) RETURNING id, title, recipe",
        )
        .bind(title)
        .bind(&recipe_json)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_constraint)?;
        tx.commit().await?;

        row.try_into()
    }

    /// Overwrite title and recipe of an existing drink; the id is stable.
    pub async fn update(
        &self,
        id: i64,
        title: &str,
        recipe: &[Ingredient],
    ) -> Result<Drink, StoreError> {
        let recipe_json = serde_json::to_string(recipe).map_err(StoreError::InvalidRecipe)?;

        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, DrinkRow>(
            "UPDATE drinks SET title = ?1, recipe = ?2 WHERE id = ?3 RETURNING id, title, recipe",
        )
        .bind(title)
        .bind(&recipe_json)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_constraint)?
        .ok_or_else(|| StoreError::NotFound(format!("No drink with id {}", id)))?;
        tx.commit().await?;

        row.try_into()
    }

    /// Delete a drink, returning the deleted id.
    pub async fn delete(&self, id: i64) -> Result<i64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM drinks WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("No drink with id {}", id)));
        }

        tx.commit().await?;
        Ok(id)
    }
}

/// Translate unique-constraint failures so callers can distinguish them from
/// plain query errors.
fn map_constraint(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err)
            if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            StoreError::ConstraintViolation(db_err.message().to_string())
        }
        _ => StoreError::Sqlx(err),
    }
}
