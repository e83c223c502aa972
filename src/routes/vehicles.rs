//! Vehicle routes: fleet CRUD plus the analytics dashboard endpoint.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::fleet::{CreateVehicle, UpdateVehicle, Vehicle};
use crate::models::links::{PageEnvelope, ResourceEnvelope};
use crate::models::pagination::PageParams;
use crate::routes::{pagination_headers, API_BASE};
use crate::services::analytics::AnalyticsSummary;
use crate::services::fleet as fleet_service;
use crate::services::links::{self as links_service, LinkContext, ResourceKind};
use crate::services::policy;
use crate::AppState;

fn envelope(user: &CurrentUser, vehicle: Vehicle) -> Result<ResourceEnvelope<Vehicle>, AppError> {
    let ctx = LinkContext::new(API_BASE, policy::can_write(user, vehicle.owner_id));
    let links = links_service::resource_links(ResourceKind::Vehicle, vehicle.id, &ctx)?;
    Ok(ResourceEnvelope::new(vehicle, links))
}

/// GET /api/v1/vehicles — paginated vehicles visible to the caller.
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<(HeaderMap, Json<PageEnvelope<Vehicle>>), AppError> {
    let (rows, meta) = fleet_service::list_vehicles(&state.db, &user, &params).await?;

    let collection = links_service::collection_path(ResourceKind::Vehicle, API_BASE)?;
    let resources = rows
        .into_iter()
        .map(|vehicle| envelope(&user, vehicle))
        .collect::<Result<Vec<_>, _>>()?;
    let headers = pagination_headers(&collection, &meta);
    let links = links_service::page_links(&collection, &meta);
    Ok((headers, Json(PageEnvelope::new(resources, links))))
}

/// POST /api/v1/vehicles
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<CreateVehicle>,
) -> Result<(StatusCode, Json<ResourceEnvelope<Vehicle>>), AppError> {
    body.validate()?;
    let vehicle = fleet_service::create_vehicle(&state.db, &user, &body).await?;
    Ok((StatusCode::CREATED, Json(envelope(&user, vehicle)?)))
}

/// GET /api/v1/vehicles/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ResourceEnvelope<Vehicle>>, AppError> {
    let vehicle = fleet_service::get_vehicle(&state.db, &user, id).await?;
    Ok(Json(envelope(&user, vehicle)?))
}

/// PUT /api/v1/vehicles/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdateVehicle>,
) -> Result<Json<ResourceEnvelope<Vehicle>>, AppError> {
    body.validate()?;
    let vehicle = fleet_service::update_vehicle(&state.db, &user, id, &body).await?;
    Ok(Json(envelope(&user, vehicle)?))
}

/// DELETE /api/v1/vehicles/:id
pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    fleet_service::delete_vehicle(&state.db, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/vehicles/:id/analytics — aggregate summary for the dashboard.
pub async fn analytics(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<AnalyticsSummary>, AppError> {
    let summary = fleet_service::vehicle_analytics(&state.db, &user, id).await?;
    Ok(Json(summary))
}
