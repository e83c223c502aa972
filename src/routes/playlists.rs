//! Playlist routes, nested under their category.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::catalog::{CreatePlaylist, Playlist, UpdatePlaylist};
use crate::models::links::{PageEnvelope, ResourceEnvelope};
use crate::models::pagination::PageParams;
use crate::routes::{pagination_headers, API_BASE};
use crate::services::catalog as catalog_service;
use crate::services::links::{self as links_service, LinkContext, ResourceKind};
use crate::services::policy;
use crate::AppState;

fn parent_path(category_id: i64) -> String {
    format!("{API_BASE}/categories/{category_id}")
}

fn envelope(
    user: &CurrentUser,
    playlist: Playlist,
) -> Result<ResourceEnvelope<Playlist>, AppError> {
    let ctx = LinkContext::new(
        parent_path(playlist.category_id),
        policy::can_write(user, playlist.owner_id),
    );
    let links = links_service::resource_links(ResourceKind::Playlist, playlist.id, &ctx)?;
    Ok(ResourceEnvelope::new(playlist, links))
}

/// GET /api/v1/categories/:category_id/playlists
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(category_id): Path<i64>,
    Query(params): Query<PageParams>,
) -> Result<(HeaderMap, Json<PageEnvelope<Playlist>>), AppError> {
    let (rows, meta) =
        catalog_service::list_playlists(&state.db, &user, category_id, &params).await?;

    let collection =
        links_service::collection_path(ResourceKind::Playlist, &parent_path(category_id))?;
    let resources = rows
        .into_iter()
        .map(|playlist| envelope(&user, playlist))
        .collect::<Result<Vec<_>, _>>()?;
    let headers = pagination_headers(&collection, &meta);
    let links = links_service::page_links(&collection, &meta);
    Ok((headers, Json(PageEnvelope::new(resources, links))))
}

/// POST /api/v1/categories/:category_id/playlists
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(category_id): Path<i64>,
    Json(body): Json<CreatePlaylist>,
) -> Result<(StatusCode, Json<ResourceEnvelope<Playlist>>), AppError> {
    body.validate()?;
    let playlist = catalog_service::create_playlist(&state.db, &user, category_id, &body).await?;
    Ok((StatusCode::CREATED, Json(envelope(&user, playlist)?)))
}

/// GET /api/v1/categories/:category_id/playlists/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((category_id, id)): Path<(i64, i64)>,
) -> Result<Json<ResourceEnvelope<Playlist>>, AppError> {
    let playlist = catalog_service::get_playlist(&state.db, &user, category_id, id).await?;
    Ok(Json(envelope(&user, playlist)?))
}

/// PUT /api/v1/categories/:category_id/playlists/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((category_id, id)): Path<(i64, i64)>,
    Json(body): Json<UpdatePlaylist>,
) -> Result<Json<ResourceEnvelope<Playlist>>, AppError> {
    body.validate()?;
    let playlist =
        catalog_service::update_playlist(&state.db, &user, category_id, id, &body).await?;
    Ok(Json(envelope(&user, playlist)?))
}

/// DELETE /api/v1/categories/:category_id/playlists/:id
pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((category_id, id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    catalog_service::delete_playlist(&state.db, &user, category_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
