//! Song routes: the ordered collection inside a playlist.
//!
//! A `PUT` carrying `position` moves the song; the whole sibling sequence is
//! rewritten to dense order keys server-side.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::catalog::{CreateSong, Playlist, Song, UpdateSong};
use crate::models::links::{PageEnvelope, ResourceEnvelope};
use crate::models::pagination::PageParams;
use crate::routes::{pagination_headers, API_BASE};
use crate::services::catalog as catalog_service;
use crate::services::links::{self as links_service, LinkContext, ResourceKind};
use crate::services::policy;
use crate::AppState;

fn parent_path(category_id: i64, playlist_id: i64) -> String {
    format!("{API_BASE}/categories/{category_id}/playlists/{playlist_id}")
}

fn envelope(
    user: &CurrentUser,
    playlist: &Playlist,
    category_id: i64,
    song: Song,
) -> Result<ResourceEnvelope<Song>, AppError> {
    let ctx = LinkContext::new(
        parent_path(category_id, playlist.id),
        policy::can_write(user, playlist.owner_id),
    );
    let links = links_service::resource_links(ResourceKind::Song, song.id, &ctx)?;
    Ok(ResourceEnvelope::new(song, links))
}

/// GET /api/v1/categories/:category_id/playlists/:playlist_id/songs
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((category_id, playlist_id)): Path<(i64, i64)>,
    Query(params): Query<PageParams>,
) -> Result<(HeaderMap, Json<PageEnvelope<Song>>), AppError> {
    let playlist = catalog_service::get_playlist(&state.db, &user, category_id, playlist_id).await?;
    let (rows, meta) =
        catalog_service::list_songs(&state.db, &user, category_id, playlist_id, &params).await?;

    let collection = links_service::collection_path(
        ResourceKind::Song,
        &parent_path(category_id, playlist_id),
    )?;
    let resources = rows
        .into_iter()
        .map(|song| envelope(&user, &playlist, category_id, song))
        .collect::<Result<Vec<_>, _>>()?;
    let headers = pagination_headers(&collection, &meta);
    let links = links_service::page_links(&collection, &meta);
    Ok((headers, Json(PageEnvelope::new(resources, links))))
}

/// POST /api/v1/categories/:category_id/playlists/:playlist_id/songs
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((category_id, playlist_id)): Path<(i64, i64)>,
    Json(body): Json<CreateSong>,
) -> Result<(StatusCode, Json<ResourceEnvelope<Song>>), AppError> {
    body.validate()?;
    let playlist = catalog_service::get_playlist(&state.db, &user, category_id, playlist_id).await?;
    let song =
        catalog_service::create_song(&state.db, &user, category_id, playlist_id, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(envelope(&user, &playlist, category_id, song)?),
    ))
}

/// GET /api/v1/categories/:category_id/playlists/:playlist_id/songs/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((category_id, playlist_id, id)): Path<(i64, i64, i64)>,
) -> Result<Json<ResourceEnvelope<Song>>, AppError> {
    let playlist = catalog_service::get_playlist(&state.db, &user, category_id, playlist_id).await?;
    let song = catalog_service::get_song(&state.db, &user, category_id, playlist_id, id).await?;
    Ok(Json(envelope(&user, &playlist, category_id, song)?))
}

/// PUT /api/v1/categories/:category_id/playlists/:playlist_id/songs/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((category_id, playlist_id, id)): Path<(i64, i64, i64)>,
    Json(body): Json<UpdateSong>,
) -> Result<Json<ResourceEnvelope<Song>>, AppError> {
    body.validate()?;
    let playlist = catalog_service::get_playlist(&state.db, &user, category_id, playlist_id).await?;
    let song =
        catalog_service::update_song(&state.db, &user, category_id, playlist_id, id, &body).await?;
    Ok(Json(envelope(&user, &playlist, category_id, song)?))
}

/// DELETE /api/v1/categories/:category_id/playlists/:playlist_id/songs/:id
pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((category_id, playlist_id, id)): Path<(i64, i64, i64)>,
) -> Result<StatusCode, AppError> {
    catalog_service::delete_song(&state.db, &user, category_id, playlist_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
