//! Fleet service: vehicle CRUD, nested trip/fuel/maintenance records, and the
//! analytics fetch feeding the aggregate reporter.
//!
//! Records carry no owner of their own; authorization is the owning
//! vehicle's. Existence is checked before access on every detail path.

use chrono::Utc;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::fleet::{
    CreateFuelRecord, CreateMaintenanceRecord, CreateTrip, CreateVehicle, FuelRecord,
    MaintenanceRecord, Trip, UpdateFuelRecord, UpdateMaintenanceRecord, UpdateTrip, UpdateVehicle,
    Vehicle,
};
use crate::models::pagination::{PageMetadata, PageParams};
use crate::services::analytics::{self, AnalyticsSummary};
use crate::services::policy;

const SCOPE_FILTER: &str = "($1 OR owner_id = $2 OR (family_id IS NOT NULL AND family_id = $3))";

pub async fn list_vehicles(
    pool: &PgPool,
    user: &CurrentUser,
    params: &PageParams,
) -> Result<(Vec<Vehicle>, PageMetadata), AppError> {
    let (all, owner, family) = policy::list_scope(user).binds();

    let total: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM vehicles WHERE {SCOPE_FILTER}"
    ))
    .bind(all)
    .bind(owner)
    .bind(family)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query_as::<_, Vehicle>(&format!(
        "SELECT * FROM vehicles WHERE {SCOPE_FILTER}
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

pub async fn create_vehicle(
    pool: &PgPool,
    user: &CurrentUser,
    input: &CreateVehicle,
) -> Result<Vehicle, AppError> {
    let vehicle = sqlx::query_as::<_, Vehicle>(
        r#"
        INSERT INTO vehicles (owner_id, family_id, name, make, model, year, license_plate)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(user.family_id)
    .bind(&input.name)
    .bind(&input.make)
    .bind(&input.model)
    .bind(input.year)
    .bind(&input.license_plate)
    .fetch_one(pool)
    .await?;
    Ok(vehicle)
}

/// Fetch a vehicle, enforcing existence then read access.
pub async fn get_vehicle(pool: &PgPool, user: &CurrentUser, id: i64) -> Result<Vehicle, AppError> {
    let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vehicle {id} not found")))?;
    policy::ensure_read(user, vehicle.owner_id, vehicle.family_id)?;
    Ok(vehicle)
}

pub async fn update_vehicle(
    pool: &PgPool,
    user: &CurrentUser,
    id: i64,
    input: &UpdateVehicle,
) -> Result<Vehicle, AppError> {
    let existing = get_vehicle(pool, user, id).await?;
    policy::ensure_write(user, existing.owner_id)?;

    let vehicle = sqlx::query_as::<_, Vehicle>(
        r#"
        UPDATE vehicles
        SET name = COALESCE($1, name),
            make = COALESCE($2, make),
            model = COALESCE($3, model),
            year = COALESCE($4, year),
            license_plate = COALESCE($5, license_plate),
            updated_at = NOW()
        WHERE id = $6
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(&input.make)
    .bind(&input.model)
    .bind(input.year)
    .bind(&input.license_plate)
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(vehicle)
}

pub async fn delete_vehicle(pool: &PgPool, user: &CurrentUser, id: i64) -> Result<(), AppError> {
    let existing = get_vehicle(pool, user, id).await?;
    policy::ensure_write(user, existing.owner_id)?;

    sqlx::query("DELETE FROM vehicles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Analytics summary over all of a vehicle's records, computed in process.
pub async fn vehicle_analytics(
    pool: &PgPool,
    user: &CurrentUser,
    id: i64,
) -> Result<AnalyticsSummary, AppError> {
    let vehicle = get_vehicle(pool, user, id).await?;

    let (trips, fuel_records, maintenance_records) = tokio::try_join!(
        fetch_all_trips(pool, id),
        fetch_all_fuel_records(pool, id),
        fetch_all_maintenance(pool, id),
    )?;

    Ok(analytics::report(
        &vehicle,
        &trips,
        &fuel_records,
        &maintenance_records,
        Utc::now(),
    ))
}

async fn fetch_all_trips(pool: &PgPool, vehicle_id: i64) -> Result<Vec<Trip>, AppError> {
    let rows = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE vehicle_id = $1")
        .bind(vehicle_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

async fn fetch_all_fuel_records(
    pool: &PgPool,
    vehicle_id: i64,
) -> Result<Vec<FuelRecord>, AppError> {
    let rows = sqlx::query_as::<_, FuelRecord>("SELECT * FROM fuel_records WHERE vehicle_id = $1")
        .bind(vehicle_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

async fn fetch_all_maintenance(
    pool: &PgPool,
    vehicle_id: i64,
) -> Result<Vec<MaintenanceRecord>, AppError> {
    let rows = sqlx::query_as::<_, MaintenanceRecord>(
        "SELECT * FROM maintenance_records WHERE vehicle_id = $1",
    )
    .bind(vehicle_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_trips(
    pool: &PgPool,
    user: &CurrentUser,
    vehicle_id: i64,
    params: &PageParams,
) -> Result<(Vec<Trip>, PageMetadata), AppError> {
    get_vehicle(pool, user, vehicle_id).await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trips WHERE vehicle_id = $1")
        .bind(vehicle_id)
        .fetch_one(pool)
        .await?;

    let rows = sqlx::query_as::<_, Trip>(
        "SELECT * FROM trips WHERE vehicle_id = $1
         ORDER BY date ASC, id ASC LIMIT $2 OFFSET $3",
    )
    .bind(vehicle_id)
    .bind(params.limit())
    .bind(params.offset())
    .fetch_all(pool)
    .await?;

    Ok((rows, PageMetadata::compute(total, params)))
}

pub async fn create_trip(
    pool: &PgPool,
    user: &CurrentUser,
    vehicle_id: i64,
    input: &CreateTrip,
) -> Result<Trip, AppError> {
    let vehicle = get_vehicle(pool, user, vehicle_id).await?;
    policy::ensure_write(user, vehicle.owner_id)?;

    let trip = sqlx::query_as::<_, Trip>(
        r#"
        INSERT INTO trips (vehicle_id, date, distance_km, start_location, end_location, purpose)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(vehicle_id)
    .bind(input.date)
    .bind(input.distance_km)
    .bind(&input.start_location)
    .bind(&input.end_location)
    .bind(&input.purpose)
    .fetch_one(pool)
    .await?;
    Ok(trip)
}

pub async fn get_trip(
    pool: &PgPool,
    user: &CurrentUser,
    vehicle_id: i64,
    id: i64,
) -> Result<Trip, AppError> {
    get_vehicle(pool, user, vehicle_id).await?;
    sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1 AND vehicle_id = $2")
        .bind(id)
        .bind(vehicle_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Trip {id} not found")))
}

pub async fn update_trip(
    pool: &PgPool,
    user: &CurrentUser,
    vehicle_id: i64,
    id: i64,
    input: &UpdateTrip,
) -> Result<Trip, AppError> {
    let vehicle = get_vehicle(pool, user, vehicle_id).await?;
    policy::ensure_write(user, vehicle.owner_id)?;
    get_trip(pool, user, vehicle_id, id).await?;

    let trip = sqlx::query_as::<_, Trip>(
        r#"
        UPDATE trips
        SET date = COALESCE($1, date),
            distance_km = COALESCE($2, distance_km),
            start_location = COALESCE($3, start_location),
            end_location = COALESCE($4, end_location),
            purpose = COALESCE($5, purpose),
            updated_at = NOW()
        WHERE id = $6
        RETURNING *
        "#,
    )
    .bind(input.date)
    .bind(input.distance_km)
    .bind(&input.start_location)
    .bind(&input.end_location)
    .bind(&input.purpose)
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(trip)
}

pub async fn delete_trip(
    pool: &PgPool,
    user: &CurrentUser,
    vehicle_id: i64,
    id: i64,
) -> Result<(), AppError> {
    let vehicle = get_vehicle(pool, user, vehicle_id).await?;
    policy::ensure_write(user, vehicle.owner_id)?;
    get_trip(pool, user, vehicle_id, id).await?;

    sqlx::query("DELETE FROM trips WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_fuel_records(
    pool: &PgPool,
    user: &CurrentUser,
    vehicle_id: i64,
    params: &PageParams,
) -> Result<(Vec<FuelRecord>, PageMetadata), AppError> {
    get_vehicle(pool, user, vehicle_id).await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM fuel_records WHERE vehicle_id = $1")
        .bind(vehicle_id)
        .fetch_one(pool)
        .await?;

    let rows = sqlx::query_as::<_, FuelRecord>(
        "SELECT * FROM fuel_records WHERE vehicle_id = $1
         ORDER BY date ASC, id ASC LIMIT $2 OFFSET $3",
    )
    .bind(vehicle_id)
    .bind(params.limit())
    .bind(params.offset())
    .fetch_all(pool)
    .await?;

    Ok((rows, PageMetadata::compute(total, params)))
}

pub async fn create_fuel_record(
    pool: &PgPool,
    user: &CurrentUser,
    vehicle_id: i64,
    input: &CreateFuelRecord,
) -> Result<FuelRecord, AppError> {
    let vehicle = get_vehicle(pool, user, vehicle_id).await?;
    policy::ensure_write(user, vehicle.owner_id)?;

    let record = sqlx::query_as::<_, FuelRecord>(
        r#"
        INSERT INTO fuel_records (vehicle_id, date, mileage, liters, price_per_liter, total_cost, full_tank)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(vehicle_id)
    .bind(input.date)
    .bind(input.mileage)
    .bind(input.liters)
    .bind(input.price_per_liter)
    .bind(input.total_cost)
    .bind(input.full_tank)
    .fetch_one(pool)
    .await?;
    Ok(record)
}

pub async fn get_fuel_record(
    pool: &PgPool,
    user: &CurrentUser,
    vehicle_id: i64,
    id: i64,
) -> Result<FuelRecord, AppError> {
    get_vehicle(pool, user, vehicle_id).await?;
    sqlx::query_as::<_, FuelRecord>("SELECT * FROM fuel_records WHERE id = $1 AND vehicle_id = $2")
        .bind(id)
        .bind(vehicle_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Fuel record {id} not found")))
}

pub async fn update_fuel_record(
    pool: &PgPool,
    user: &CurrentUser,
    vehicle_id: i64,
    id: i64,
    input: &UpdateFuelRecord,
) -> Result<FuelRecord, AppError> {
    let vehicle = get_vehicle(pool, user, vehicle_id).await?;
    policy::ensure_write(user, vehicle.owner_id)?;
    get_fuel_record(pool, user, vehicle_id, id).await?;

    let record = sqlx::query_as::<_, FuelRecord>(
        r#"
        UPDATE fuel_records
        SET date = COALESCE($1, date),
            mileage = COALESCE($2, mileage),
            liters = COALESCE($3, liters),
            price_per_liter = COALESCE($4, price_per_liter),
            total_cost = COALESCE($5, total_cost),
            full_tank = COALESCE($6, full_tank),
            updated_at = NOW()
        WHERE id = $7
        RETURNING *
        "#,
    )
    .bind(input.date)
    .bind(input.mileage)
    .bind(input.liters)
    .bind(input.price_per_liter)
    .bind(input.total_cost)
    .bind(input.full_tank)
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(record)
}

pub async fn delete_fuel_record(
    pool: &PgPool,
    user: &CurrentUser,
    vehicle_id: i64,
    id: i64,
) -> Result<(), AppError> {
    let vehicle = get_vehicle(pool, user, vehicle_id).await?;
    policy::ensure_write(user, vehicle.owner_id)?;
    get_fuel_record(pool, user, vehicle_id, id).await?;

    sqlx::query("DELETE FROM fuel_records WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_maintenance_records(
    pool: &PgPool,
    user: &CurrentUser,
    vehicle_id: i64,
    params: &PageParams,
) -> Result<(Vec<MaintenanceRecord>, PageMetadata), AppError> {
    get_vehicle(pool, user, vehicle_id).await?;

    let total: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM maintenance_records WHERE vehicle_id = $1")
            .bind(vehicle_id)
            .fetch_one(pool)
            .await?;

    let rows = sqlx::query_as::<_, MaintenanceRecord>(
        "SELECT * FROM maintenance_records WHERE vehicle_id = $1
         ORDER BY date ASC, id ASC LIMIT $2 OFFSET $3",
    )
    .bind(vehicle_id)
    .bind(params.limit())
    .bind(params.offset())
    .fetch_all(pool)
    .await?;

    Ok((rows, PageMetadata::compute(total, params)))
}

pub async fn create_maintenance_record(
    pool: &PgPool,
    user: &CurrentUser,
    vehicle_id: i64,
    input: &CreateMaintenanceRecord,
) -> Result<MaintenanceRecord, AppError> {
    let vehicle = get_vehicle(pool, user, vehicle_id).await?;
    policy::ensure_write(user, vehicle.owner_id)?;

    let record = sqlx::query_as::<_, MaintenanceRecord>(
        r#"
        INSERT INTO maintenance_records
            (vehicle_id, date, mileage, service_type, cost, notes, next_service_due)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(vehicle_id)
    .bind(input.date)
    .bind(input.mileage)
    .bind(&input.service_type)
    .bind(input.cost)
    .bind(&input.notes)
    .bind(input.next_service_due)
    .fetch_one(pool)
    .await?;
    Ok(record)
}

pub async fn get_maintenance_record(
    pool: &PgPool,
    user: &CurrentUser,
    vehicle_id: i64,
    id: i64,
) -> Result<MaintenanceRecord, AppError> {
    get_vehicle(pool, user, vehicle_id).await?;
    sqlx::query_as::<_, MaintenanceRecord>(
        "SELECT * FROM maintenance_records WHERE id = $1 AND vehicle_id = $2",
    )
    .bind(id)
    .bind(vehicle_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Maintenance record {id} not found")))
}

pub async fn update_maintenance_record(
    pool: &PgPool,
    user: &CurrentUser,
    vehicle_id: i64,
    id: i64,
    input: &UpdateMaintenanceRecord,
) -> Result<MaintenanceRecord, AppError> {
    let vehicle = get_vehicle(pool, user, vehicle_id).await?;
    policy::ensure_write(user, vehicle.owner_id)?;
    get_maintenance_record(pool, user, vehicle_id, id).await?;

    let record = sqlx::query_as::<_, MaintenanceRecord>(
        r#"
        UPDATE maintenance_records
        SET date = COALESCE($1, date),
            mileage = COALESCE($2, mileage),
            service_type = COALESCE($3, service_type),
            cost = COALESCE($4, cost),
            notes = COALESCE($5, notes),
            next_service_due = COALESCE($6, next_service_due),
            updated_at = NOW()
        WHERE id = $7
        RETURNING *
        "#,
    )
    .bind(input.date)
    .bind(input.mileage)
    .bind(&input.service_type)
    .bind(input.cost)
    .bind(&input.notes)
    .bind(input.next_service_due)
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(record)
}

pub async fn delete_maintenance_record(
    pool: &PgPool,
    user: &CurrentUser,
    vehicle_id: i64,
    id: i64,
) -> Result<(), AppError> {
    let vehicle = get_vehicle(pool, user, vehicle_id).await?;
    policy::ensure_write(user, vehicle.owner_id)?;
    get_maintenance_record(pool, user, vehicle_id, id).await?;

    sqlx::query("DELETE FROM maintenance_records WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
