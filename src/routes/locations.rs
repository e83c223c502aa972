//! Location routes: shared system locations and per-user favorites.
//!
//! Both lists are small and returned unpaginated, without envelopes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireAdmin;
use crate::models::location::{CreateLocation, Location};
use crate::services::locations as locations_service;
use crate::AppState;

/// GET /api/v1/locations — shared locations visible to everyone.
pub async fn list_shared(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<Location>>, AppError> {
    let rows = locations_service::list_shared(&state.db).await?;
    Ok(Json(rows))
}

/// POST /api/v1/locations — create a shared location. Admin only.
pub async fn create_shared(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreateLocation>,
) -> Result<(StatusCode, Json<Location>), AppError> {
    body.validate()?;
    let location = locations_service::create_shared(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

/// GET /api/v1/users/locations — the caller's saved locations.
pub async fn list_mine(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Location>>, AppError> {
    let rows = locations_service::list_for_user(&state.db, user.id).await?;
    Ok(Json(rows))
}

/// POST /api/v1/users/locations
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<CreateLocation>,
) -> Result<(StatusCode, Json<Location>), AppError> {
    body.validate()?;
    let location = locations_service::create_for_user(&state.db, &user, &body).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

/// DELETE /api/v1/users/locations/:id
pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    locations_service::delete_for_user(&state.db, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
