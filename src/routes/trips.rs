//! Trip routes, nested under their vehicle.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::fleet::{CreateTrip, Trip, UpdateTrip, Vehicle};
use crate::models::links::{PageEnvelope, ResourceEnvelope};
use crate::models::pagination::PageParams;
use crate::routes::{pagination_headers, API_BASE};
use crate::services::fleet as fleet_service;
use crate::services::links::{self as links_service, LinkContext, ResourceKind};
use crate::services::policy;
use crate::AppState;

fn parent_path(vehicle_id: i64) -> String {
    format!("{API_BASE}/vehicles/{vehicle_id}")
}

fn envelope(
    user: &CurrentUser,
    vehicle: &Vehicle,
    trip: Trip,
) -> Result<ResourceEnvelope<Trip>, AppError> {
    let ctx = LinkContext::new(
        parent_path(vehicle.id),
        policy::can_write(user, vehicle.owner_id),
    );
    let links = links_service::resource_links(ResourceKind::Trip, trip.id, &ctx)?;
    Ok(ResourceEnvelope::new(trip, links))
}

/// GET /api/v1/vehicles/:vehicle_id/trips
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(vehicle_id): Path<i64>,
    Query(params): Query<PageParams>,
) -> Result<(HeaderMap, Json<PageEnvelope<Trip>>), AppError> {
    let vehicle = fleet_service::get_vehicle(&state.db, &user, vehicle_id).await?;
    let (rows, meta) = fleet_service::list_trips(&state.db, &user, vehicle_id, &params).await?;

    let collection = links_service::collection_path(ResourceKind::Trip, &parent_path(vehicle_id))?;
    let resources = rows
        .into_iter()
        .map(|trip| envelope(&user, &vehicle, trip))
        .collect::<Result<Vec<_>, _>>()?;
    let headers = pagination_headers(&collection, &meta);
    let links = links_service::page_links(&collection, &meta);
    Ok((headers, Json(PageEnvelope::new(resources, links))))
}

/// POST /api/v1/vehicles/:vehicle_id/trips
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(vehicle_id): Path<i64>,
    Json(body): Json<CreateTrip>,
) -> Result<(StatusCode, Json<ResourceEnvelope<Trip>>), AppError> {
    body.validate()?;
    let vehicle = fleet_service::get_vehicle(&state.db, &user, vehicle_id).await?;
    let trip = fleet_service::create_trip(&state.db, &user, vehicle_id, &body).await?;
    Ok((StatusCode::CREATED, Json(envelope(&user, &vehicle, trip)?)))
}

/// GET /api/v1/vehicles/:vehicle_id/trips/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((vehicle_id, id)): Path<(i64, i64)>,
) -> Result<Json<ResourceEnvelope<Trip>>, AppError> {
    let vehicle = fleet_service::get_vehicle(&state.db, &user, vehicle_id).await?;
    let trip = fleet_service::get_trip(&state.db, &user, vehicle_id, id).await?;
    Ok(Json(envelope(&user, &vehicle, trip)?))
}

/// PUT /api/v1/vehicles/:vehicle_id/trips/:id
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((vehicle_id, id)): Path<(i64, i64)>,
    Json(body): Json<UpdateTrip>,
) -> Result<Json<ResourceEnvelope<Trip>>, AppError> {
    body.validate()?;
    let vehicle = fleet_service::get_vehicle(&state.db, &user, vehicle_id).await?;
    let trip = fleet_service::update_trip(&state.db, &user, vehicle_id, id, &body).await?;
    Ok(Json(envelope(&user, &vehicle, trip)?))
}

/// DELETE /api/v1/vehicles/:vehicle_id/trips/:id
pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((vehicle_id, id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    fleet_service::delete_trip(&state.db, &user, vehicle_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
