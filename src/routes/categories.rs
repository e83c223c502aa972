//! Category routes: top level of the music-catalog hierarchy.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::catalog::{Category, CreateCategory, UpdateCategory};
use crate::models::links::{PageEnvelope, ResourceEnvelope};
use crate::models::pagination::PageParams;
use crate::routes::{pagination_headers, API_BASE};
use crate::services::catalog as catalog_service;
use crate::services::links::{self as links_service, LinkContext, ResourceKind};
use crate::services::policy;
use crate::AppState;

fn envelope(
    user: &CurrentUser,
    category: Category,
) -> Result<ResourceEnvelope<Category>, AppError> {
    let ctx = LinkContext::new(API_BASE, policy::can_write(user, category.owner_id));
    let links = links_service::resource_links(ResourceKind::Category, category.id, &ctx)?;
    Ok(ResourceEnvelope::new(category, links))
}

/// GET /api/v1/categories — paginated categories visible to the caller.
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<(HeaderMap, Json<PageEnvelope<Category>>), AppError> {
    let (rows, meta) = catalog_service::list_categories(&state.db, &user, &params).await?;

    let collection = links_service::collection_path(ResourceKind::Category, API_BASE)?;
    let resources = rows
        .into_iter()
        .map(|category| envelope(&user, category))
        .collect::<Result<Vec<_>, _>>()?;
    let headers = pagination_headers(&collection, &meta);
    let links = links_service::page_links(&collection, &meta);
    Ok((headers, Json(PageEnvelope::new(resources, links))))
}

/// POST /api/v1/categories
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<CreateCategory>,
) -> Result<(StatusCode, Json<ResourceEnvelope<Category>>), AppError> {
    body.validate()?;
    let category = catalog_service::create_category(&state.db, &user, &body).await?;
    Ok((StatusCode::CREATED, Json(envelope(&user, category)?)))
}

/// GET /api/v1/categories/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ResourceEnvelope<Category>>, AppError> {
    let category = catalog_service::get_category(&state.db, &user, id).await?;
    Ok(Json(envelope(&user, category)?))
}

/// PUT /api/v1/categories/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCategory>,
) -> Result<Json<ResourceEnvelope<Category>>, AppError> {
    body.validate()?;
    let category = catalog_service::update_category(&state.db, &user, id, &body).await?;
    Ok(Json(envelope(&user, category)?))
}

/// DELETE /api/v1/categories/:id
pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    catalog_service::delete_category(&state.db, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
