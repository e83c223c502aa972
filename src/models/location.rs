//! Saved locations: shared system entries plus per-user favorites.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A named place usable as a trip endpoint. `owner_id = NULL` marks a shared
/// location visible to everyone.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: i64,
    pub owner_id: Option<Uuid>,
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocation {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: String,
    #[validate(length(max = 256, message = "address is too long"))]
    pub address: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "latitude is out of range"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude is out of range"))]
    pub longitude: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn create_location_bounds_coordinates() {
        let bad = CreateLocation {
            name: "Home".to_string(),
            address: None,
            latitude: Some(123.0),
            longitude: None,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn shared_location_has_no_owner() {
        let location = Location {
            id: 1,
            owner_id: None,
            name: "School".to_string(),
            address: None,
            latitude: None,
            longitude: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&location).unwrap();
        assert!(json["ownerId"].is_null());
    }
}
