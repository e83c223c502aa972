//! Fleet models: vehicles and their trip, fuel, and maintenance records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: i64,
    pub owner_id: Uuid,
    pub family_id: Option<Uuid>,
    pub name: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub license_plate: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicle {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: String,
    #[validate(length(max = 64, message = "make is too long"))]
    pub make: Option<String>,
    #[validate(length(max = 64, message = "model is too long"))]
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100, message = "year is out of range"))]
    pub year: Option<i32>,
    #[validate(length(max = 16, message = "license plate is too long"))]
    pub license_plate: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicle {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 64, message = "make is too long"))]
    pub make: Option<String>,
    #[validate(length(max = 64, message = "model is too long"))]
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100, message = "year is out of range"))]
    pub year: Option<i32>,
    #[validate(length(max = 16, message = "license plate is too long"))]
    pub license_plate: Option<String>,
}

/// A single journey with its distance; feeds total-distance analytics.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: i64,
    pub vehicle_id: i64,
    pub date: NaiveDate,
    pub distance_km: f64,
    pub start_location: Option<String>,
    pub end_location: Option<String>,
    pub purpose: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrip {
    pub date: NaiveDate,
    #[validate(range(min = 0.0, message = "distance must not be negative"))]
    pub distance_km: f64,
    #[validate(length(max = 256, message = "start location is too long"))]
    pub start_location: Option<String>,
    #[validate(length(max = 256, message = "end location is too long"))]
    pub end_location: Option<String>,
    #[validate(length(max = 256, message = "purpose is too long"))]
    pub purpose: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrip {
    pub date: Option<NaiveDate>,
    #[validate(range(min = 0.0, message = "distance must not be negative"))]
    pub distance_km: Option<f64>,
    #[validate(length(max = 256, message = "start location is too long"))]
    pub start_location: Option<String>,
    #[validate(length(max = 256, message = "end location is too long"))]
    pub end_location: Option<String>,
    #[validate(length(max = 256, message = "purpose is too long"))]
    pub purpose: Option<String>,
}

/// A refuelling event. `full_tank` marks a complete fill; consumption is only
/// well defined between two consecutive full fills.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FuelRecord {
    pub id: i64,
    pub vehicle_id: i64,
    pub date: NaiveDate,
    pub mileage: f64,
    pub liters: f64,
    pub price_per_liter: Option<f64>,
    pub total_cost: f64,
    pub full_tank: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFuelRecord {
    pub date: NaiveDate,
    #[validate(range(min = 0.0, message = "mileage must not be negative"))]
    pub mileage: f64,
    #[validate(range(min = 0.0, message = "liters must not be negative"))]
    pub liters: f64,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price_per_liter: Option<f64>,
    #[validate(range(min = 0.0, message = "cost must not be negative"))]
    pub total_cost: f64,
    #[serde(default)]
    pub full_tank: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFuelRecord {
    pub date: Option<NaiveDate>,
    #[validate(range(min = 0.0, message = "mileage must not be negative"))]
    pub mileage: Option<f64>,
    #[validate(range(min = 0.0, message = "liters must not be negative"))]
    pub liters: Option<f64>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price_per_liter: Option<f64>,
    #[validate(range(min = 0.0, message = "cost must not be negative"))]
    pub total_cost: Option<f64>,
    pub full_tank: Option<bool>,
}

/// A service event; `next_service_due` overrides the interval-based estimate
/// in upcoming-maintenance reporting.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    pub id: i64,
    pub vehicle_id: i64,
    pub date: NaiveDate,
    pub mileage: f64,
    pub service_type: String,
    pub cost: f64,
    pub notes: Option<String>,
    pub next_service_due: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceRecord {
    pub date: NaiveDate,
    #[validate(range(min = 0.0, message = "mileage must not be negative"))]
    pub mileage: f64,
    #[validate(length(min = 1, max = 128, message = "service type must be 1-128 characters"))]
    pub service_type: String,
    #[validate(range(min = 0.0, message = "cost must not be negative"))]
    pub cost: f64,
    #[validate(length(max = 1024, message = "notes are too long"))]
    pub notes: Option<String>,
    pub next_service_due: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaintenanceRecord {
    pub date: Option<NaiveDate>,
    #[validate(range(min = 0.0, message = "mileage must not be negative"))]
    pub mileage: Option<f64>,
    #[validate(length(min = 1, max = 128, message = "service type must be 1-128 characters"))]
    pub service_type: Option<String>,
    #[validate(range(min = 0.0, message = "cost must not be negative"))]
    pub cost: Option<f64>,
    #[validate(length(max = 1024, message = "notes are too long"))]
    pub notes: Option<String>,
    pub next_service_due: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn fuel_record_serializes_camel_case() {
        let record = FuelRecord {
            id: 1,
            vehicle_id: 2,
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            mileage: 10500.0,
            liters: 40.0,
            price_per_liter: Some(1.85),
            total_cost: 74.0,
            full_tank: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["fullTank"], true);
        assert_eq!(json["totalCost"], 74.0);
    }

    #[test]
    fn create_trip_rejects_negative_distance() {
        let trip = CreateTrip {
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            distance_km: -5.0,
            start_location: None,
            end_location: None,
            purpose: None,
        };
        assert!(trip.validate().is_err());
    }

    #[test]
    fn create_maintenance_requires_service_type() {
        let record = CreateMaintenanceRecord {
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            mileage: 10000.0,
            service_type: String::new(),
            cost: 50.0,
            notes: None,
            next_service_due: None,
        };
        assert!(record.validate().is_err());
    }
}
