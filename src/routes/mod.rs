//! Route definitions for the Homeport API.

pub mod auth;
pub mod categories;
pub mod fuel_records;
pub mod health;
pub mod locations;
pub mod maintenance_records;
pub mod playlists;
pub mod songs;
pub mod trips;
pub mod vehicles;

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::routing::{delete, get, post};
use axum::Router;

use crate::models::pagination::{PageMetadata, PaginationHeader};
use crate::services::links as links_service;
use crate::AppState;

/// Prefix for all resource routes.
pub const API_BASE: &str = "/api/v1";

/// Full application router.
pub fn api_router() -> Router<AppState> {
    let api = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/accessToken", post(auth::access_token))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categories/{id}",
            get(categories::get_by_id)
                .put(categories::update)
                .delete(categories::remove),
        )
        .route(
            "/categories/{category_id}/playlists",
            get(playlists::list).post(playlists::create),
        )
        .route(
            "/categories/{category_id}/playlists/{id}",
            get(playlists::get_by_id)
                .put(playlists::update)
                .delete(playlists::remove),
        )
        .route(
            "/categories/{category_id}/playlists/{playlist_id}/songs",
            get(songs::list).post(songs::create),
        )
        .route(
            "/categories/{category_id}/playlists/{playlist_id}/songs/{id}",
            get(songs::get_by_id).put(songs::update).delete(songs::remove),
        )
        .route("/vehicles", get(vehicles::list).post(vehicles::create))
        .route(
            "/vehicles/{id}",
            get(vehicles::get_by_id)
                .put(vehicles::update)
                .delete(vehicles::remove),
        )
        .route("/vehicles/{id}/analytics", get(vehicles::analytics))
        .route(
            "/vehicles/{vehicle_id}/trips",
            get(trips::list).post(trips::create),
        )
        .route(
            "/vehicles/{vehicle_id}/trips/{id}",
            get(trips::get_by_id).put(trips::update).delete(trips::remove),
        )
        .route(
            "/vehicles/{vehicle_id}/fuelRecords",
            get(fuel_records::list).post(fuel_records::create),
        )
        .route(
            "/vehicles/{vehicle_id}/fuelRecords/{id}",
            get(fuel_records::get_by_id)
                .put(fuel_records::update)
                .delete(fuel_records::remove),
        )
        .route(
            "/vehicles/{vehicle_id}/maintenanceRecords",
            get(maintenance_records::list).post(maintenance_records::create),
        )
        .route(
            "/vehicles/{vehicle_id}/maintenanceRecords/{id}",
            get(maintenance_records::get_by_id)
                .put(maintenance_records::update)
                .delete(maintenance_records::remove),
        )
        .route(
            "/locations",
            get(locations::list_shared).post(locations::create_shared),
        )
        .route(
            "/users/locations",
            get(locations::list_mine).post(locations::create),
        )
        .route("/users/locations/{id}", delete(locations::remove));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest(API_BASE, api)
}

/// `Pagination` response header carrying the page metadata and nav links.
pub(crate) fn pagination_headers(collection: &str, meta: &PageMetadata) -> HeaderMap {
    let (previous, next) = links_service::page_nav_hrefs(collection, meta);
    let header = PaginationHeader::new(meta, previous.as_deref(), next.as_deref());
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&header.to_header_value()) {
        headers.insert(HeaderName::from_static("pagination"), value);
    }
    headers
}
