//! Music-catalog service: category, playlist, and song CRUD plus song
//! reordering.
//!
//! Every detail/mutation path checks existence first (404), then the access
//! policy (403). Songs carry no owner of their own; their authorization is
//! the owning playlist's. Order keys are rewritten inside a transaction with
//! the sibling rows locked, which serializes concurrent reorders per
//! playlist.

use sqlx::{PgPool, Postgres, Transaction};

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::catalog::{
    Category, CreateCategory, CreatePlaylist, CreateSong, Playlist, Song, UpdateCategory,
    UpdatePlaylist, UpdateSong,
};
use crate::models::pagination::{PageMetadata, PageParams};
use crate::services::{ordering, policy};

// Shared scope filter: admin passes everything, parents with a family see
// family rows, everyone sees their own.
const SCOPE_FILTER: &str = "($1 OR owner_id = $2 OR (family_id IS NOT NULL AND family_id = $3))";

/// List categories visible to the caller, newest-last for a stable window.
pub async fn list_categories(
    pool: &PgPool,
    user: &CurrentUser,
    params: &PageParams,
) -> Result<(Vec<Category>, PageMetadata), AppError> {
    let (all, owner, family) = policy::list_scope(user).binds();

    let total: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM categories WHERE {SCOPE_FILTER}"
    ))
    .bind(all)
    .bind(owner)
    .bind(family)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query_as::<_, Category>(&format!(
        "SELECT * FROM categories WHERE {SCOPE_FILTER}
         ORDER BY created_at ASC, id ASC LIMIT $4 OFFSET $5"
    ))
    .bind(all)
    .bind(owner)
    .bind(family)
    .bind(params.limit())
    .bind(params.offset())
    .fetch_all(pool)
    .await?;

    Ok((rows, PageMetadata::compute(total, params)))
}

pub async fn create_category(
    pool: &PgPool,
    user: &CurrentUser,
    input: &CreateCategory,
) -> Result<Category, AppError> {
    let category = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (owner_id, family_id, name, description)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(user.family_id)
    .bind(&input.name)
    .bind(&input.description)
    .fetch_one(pool)
    .await?;
    Ok(category)
}

/// Fetch a category, enforcing existence then read access.
pub async fn get_category(
    pool: &PgPool,
    user: &CurrentUser,
    id: i64,
) -> Result<Category, AppError> {
    let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {id} not found")))?;
    policy::ensure_read(user, category.owner_id, category.family_id)?;
    Ok(category)
}

pub async fn update_category(
    pool: &PgPool,
    user: &CurrentUser,
    id: i64,
    input: &UpdateCategory,
) -> Result<Category, AppError> {
    let existing = get_category(pool, user, id).await?;
    policy::ensure_write(user, existing.owner_id)?;

    let category = sqlx::query_as::<_, Category>(
        r#"
        UPDATE categories
        SET name = COALESCE($1, name),
            description = COALESCE($2, description),
            updated_at = NOW()
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(category)
}

pub async fn delete_category(pool: &PgPool, user: &CurrentUser, id: i64) -> Result<(), AppError> {
    let existing = get_category(pool, user, id).await?;
    policy::ensure_write(user, existing.owner_id)?;

    sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// List playlists in a category the caller may read.
pub async fn list_playlists(
    pool: &PgPool,
    user: &CurrentUser,
    category_id: i64,
    params: &PageParams,
) -> Result<(Vec<Playlist>, PageMetadata), AppError> {
    get_category(pool, user, category_id).await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM playlists WHERE category_id = $1")
        .bind(category_id)
        .fetch_one(pool)
        .await?;

    let rows = sqlx::query_as::<_, Playlist>(
        "SELECT * FROM playlists WHERE category_id = $1
         ORDER BY created_at ASC, id ASC LIMIT $2 OFFSET $3",
    )
    .bind(category_id)
    .bind(params.limit())
    .bind(params.offset())
    .fetch_all(pool)
    .await?;

    Ok((rows, PageMetadata::compute(total, params)))
}

pub async fn create_playlist(
    pool: &PgPool,
    user: &CurrentUser,
    category_id: i64,
    input: &CreatePlaylist,
) -> Result<Playlist, AppError> {
    let category = get_category(pool, user, category_id).await?;
    policy::ensure_write(user, category.owner_id)?;

    let playlist = sqlx::query_as::<_, Playlist>(
        r#"
        INSERT INTO playlists (category_id, owner_id, family_id, name, description)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(category_id)
    .bind(user.id)
    .bind(category.family_id)
    .bind(&input.name)
    .bind(&input.description)
    .fetch_one(pool)
    .await?;
    Ok(playlist)
}

/// Fetch a playlist within its category, enforcing existence then read access.
pub async fn get_playlist(
    pool: &PgPool,
    user: &CurrentUser,
    category_id: i64,
    id: i64,
) -> Result<Playlist, AppError> {
    let playlist =
        sqlx::query_as::<_, Playlist>("SELECT * FROM playlists WHERE id = $1 AND category_id = $2")
            .bind(id)
            .bind(category_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Playlist {id} not found")))?;
    policy::ensure_read(user, playlist.owner_id, playlist.family_id)?;
    Ok(playlist)
}

pub async fn update_playlist(
    pool: &PgPool,
    user: &CurrentUser,
    category_id: i64,
    id: i64,
    input: &UpdatePlaylist,
) -> Result<Playlist, AppError> {
    let existing = get_playlist(pool, user, category_id, id).await?;
    policy::ensure_write(user, existing.owner_id)?;

    let playlist = sqlx::query_as::<_, Playlist>(
        r#"
        UPDATE playlists
        SET name = COALESCE($1, name),
            description = COALESCE($2, description),
            updated_at = NOW()
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(playlist)
}

pub async fn delete_playlist(
    pool: &PgPool,
    user: &CurrentUser,
    category_id: i64,
    id: i64,
) -> Result<(), AppError> {
    let existing = get_playlist(pool, user, category_id, id).await?;
    policy::ensure_write(user, existing.owner_id)?;

    sqlx::query("DELETE FROM playlists WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// List songs of a playlist in play order.
pub async fn list_songs(
    pool: &PgPool,
    user: &CurrentUser,
    category_id: i64,
    playlist_id: i64,
    params: &PageParams,
) -> Result<(Vec<Song>, PageMetadata), AppError> {
    get_playlist(pool, user, category_id, playlist_id).await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs WHERE playlist_id = $1")
        .bind(playlist_id)
        .fetch_one(pool)
        .await?;

    let rows = sqlx::query_as::<_, Song>(
        "SELECT * FROM songs WHERE playlist_id = $1
         ORDER BY order_key ASC LIMIT $2 OFFSET $3",
    )
    .bind(playlist_id)
    .bind(params.limit())
    .bind(params.offset())
    .fetch_all(pool)
    .await?;

    Ok((rows, PageMetadata::compute(total, params)))
}

/// Append a song at the end of the playlist (`order_key = max + 1`).
pub async fn create_song(
    pool: &PgPool,
    user: &CurrentUser,
    category_id: i64,
    playlist_id: i64,
    input: &CreateSong,
) -> Result<Song, AppError> {
    let playlist = get_playlist(pool, user, category_id, playlist_id).await?;
    policy::ensure_write(user, playlist.owner_id)?;

    let mut tx = pool.begin().await?;
    let siblings = lock_songs(&mut tx, playlist_id).await?;
    let order_key = ordering::next_order_key(&siblings);

    let song = sqlx::query_as::<_, Song>(
        r#"
        INSERT INTO songs (playlist_id, title, artist, duration_secs, order_key)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(playlist_id)
    .bind(&input.title)
    .bind(&input.artist)
    .bind(input.duration_secs)
    .bind(order_key)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(song)
}

/// Fetch a song within its playlist, enforcing existence then read access.
pub async fn get_song(
    pool: &PgPool,
    user: &CurrentUser,
    category_id: i64,
    playlist_id: i64,
    id: i64,
) -> Result<Song, AppError> {
    get_playlist(pool, user, category_id, playlist_id).await?;
    fetch_song(pool, playlist_id, id).await
}

async fn fetch_song(pool: &PgPool, playlist_id: i64, id: i64) -> Result<Song, AppError> {
    sqlx::query_as::<_, Song>("SELECT * FROM songs WHERE id = $1 AND playlist_id = $2")
        .bind(id)
        .bind(playlist_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Song {id} not found")))
}

/// Update a song; a `position` in the input moves it within the playlist and
/// rewrites the whole sibling sequence to dense keys in one transaction.
pub async fn update_song(
    pool: &PgPool,
    user: &CurrentUser,
    category_id: i64,
    playlist_id: i64,
    id: i64,
    input: &UpdateSong,
) -> Result<Song, AppError> {
    let playlist = get_playlist(pool, user, category_id, playlist_id).await?;
    policy::ensure_write(user, playlist.owner_id)?;
    fetch_song(pool, playlist_id, id).await?;

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE songs
        SET title = COALESCE($1, title),
            artist = COALESCE($2, artist),
            duration_secs = COALESCE($3, duration_secs),
            updated_at = NOW()
        WHERE id = $4
        "#,
    )
    .bind(&input.title)
    .bind(&input.artist)
    .bind(input.duration_secs)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(position) = input.position {
        let siblings = lock_songs(&mut tx, playlist_id).await?;
        let reordered = ordering::reorder(&siblings, id, position)?;
        persist_order(&mut tx, &reordered).await?;
    }

    let song = sqlx::query_as::<_, Song>("SELECT * FROM songs WHERE id = $1")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(song)
}

/// Delete a song and re-densify the remaining keys so the {1..N} invariant
/// survives deletion, not just reorder.
pub async fn delete_song(
    pool: &PgPool,
    user: &CurrentUser,
    category_id: i64,
    playlist_id: i64,
    id: i64,
) -> Result<(), AppError> {
    let playlist = get_playlist(pool, user, category_id, playlist_id).await?;
    policy::ensure_write(user, playlist.owner_id)?;
    fetch_song(pool, playlist_id, id).await?;

    let mut tx = pool.begin().await?;
    lock_songs(&mut tx, playlist_id).await?;

    sqlx::query("DELETE FROM songs WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let remaining = sqlx::query_as::<_, Song>(
        "SELECT * FROM songs WHERE playlist_id = $1 ORDER BY order_key ASC",
    )
    .bind(playlist_id)
    .fetch_all(&mut *tx)
    .await?;
    persist_order(&mut tx, &ordering::densify(&remaining)).await?;

    tx.commit().await?;
    Ok(())
}

/// Lock and load the sibling rows of a playlist for an order rewrite.
async fn lock_songs(
    tx: &mut Transaction<'_, Postgres>,
    playlist_id: i64,
) -> Result<Vec<Song>, AppError> {
    let rows = sqlx::query_as::<_, Song>(
        "SELECT * FROM songs WHERE playlist_id = $1 ORDER BY order_key ASC FOR UPDATE",
    )
    .bind(playlist_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows)
}

async fn persist_order(
    tx: &mut Transaction<'_, Postgres>,
    songs: &[Song],
) -> Result<(), AppError> {
    for song in songs {
        sqlx::query("UPDATE songs SET order_key = $1, updated_at = NOW() WHERE id = $2")
            .bind(song.order_key)
            .bind(song.id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}
