//! Location service: shared system locations plus per-user favorites.
//!
//! Both lists are small and non-paginated by contract.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::location::{CreateLocation, Location};

/// Shared locations visible to every authenticated user.
pub async fn list_shared(pool: &PgPool) -> Result<Vec<Location>, AppError> {
    let rows = sqlx::query_as::<_, Location>(
        "SELECT * FROM locations WHERE owner_id IS NULL ORDER BY name ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// The caller's saved locations.
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Location>, AppError> {
    let rows = sqlx::query_as::<_, Location>(
        "SELECT * FROM locations WHERE owner_id = $1 ORDER BY name ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Create a shared location with no owner. Admin only, enforced at the route.
pub async fn create_shared(pool: &PgPool, input: &CreateLocation) -> Result<Location, AppError> {
    let location = sqlx::query_as::<_, Location>(
        r#"
        INSERT INTO locations (owner_id, name, address, latitude, longitude)
        VALUES (NULL, $1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(&input.address)
    .bind(input.latitude)
    .bind(input.longitude)
    .fetch_one(pool)
    .await?;
    Ok(location)
}

pub async fn create_for_user(
    pool: &PgPool,
    user: &CurrentUser,
    input: &CreateLocation,
) -> Result<Location, AppError> {
    let location = sqlx::query_as::<_, Location>(
        r#"
        INSERT INTO locations (owner_id, name, address, latitude, longitude)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(&input.name)
    .bind(&input.address)
    .bind(input.latitude)
    .bind(input.longitude)
    .fetch_one(pool)
    .await?;
    Ok(location)
}

/// Delete one of the caller's own locations. Shared locations (no owner) are
/// not deletable through this path.
pub async fn delete_for_user(pool: &PgPool, user: &CurrentUser, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM locations WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(user.id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Location {id} not found")));
    }
    Ok(())
}
