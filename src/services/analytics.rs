//! Aggregate reporter for vehicle dashboards.
//!
//! Pure computations over fetched record sets; `now` is passed in so every
//! window is deterministic under test. Fuel efficiency is computed over
//! full-tank-to-full-tank segments, the only intervals where consumed liters
//! since the last fill are well defined. When a vehicle has no such pair but
//! at least two records, every consecutive pair is used instead; the summary
//! flags that degraded-accuracy fallback to callers.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::models::fleet::{FuelRecord, MaintenanceRecord, Trip, Vehicle};

/// Window for the monthly cost buckets.
const MONTHLY_WINDOW: u32 = 6;

/// Upcoming-maintenance horizon in days.
const UPCOMING_HORIZON_DAYS: i64 = 100;

/// A fuel segment with implausible distance is discarded (data error or
/// odometer reset).
const MAX_SEGMENT_KM: f64 = 2000.0;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub vehicle_id: i64,
    pub trip_count: usize,
    pub total_distance_km: f64,
    pub total_fuel_cost: f64,
    pub total_maintenance_cost: f64,
    /// Liters per 100 km; null when no valid segment exists (never NaN).
    pub fuel_efficiency: Option<f64>,
    /// True when efficiency fell back to non-full-tank pairs.
    pub fuel_efficiency_estimated: bool,
    pub monthly_costs: Vec<MonthlyCost>,
    pub upcoming_maintenance: Vec<UpcomingMaintenance>,
}

/// Fuel and maintenance spend for one calendar month in the trailing window.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCost {
    /// `YYYY-MM`.
    pub month: String,
    pub fuel: f64,
    pub maintenance: f64,
}

/// A service predicted or scheduled within the upcoming horizon.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingMaintenance {
    pub service_type: String,
    pub due_date: NaiveDate,
    pub days_until_due: i64,
    /// True when the due date was estimated from a service interval rather
    /// than taken from an explicit `next_service_due`.
    pub estimated: bool,
}

/// Efficiency result with its fallback flag.
#[derive(Debug, PartialEq)]
pub struct FuelEfficiency {
    pub liters_per_100km: Option<f64>,
    pub estimated: bool,
}

/// Build the full analytics summary for one vehicle.
pub fn report(
    vehicle: &Vehicle,
    trips: &[Trip],
    fuel_records: &[FuelRecord],
    maintenance_records: &[MaintenanceRecord],
    now: DateTime<Utc>,
) -> AnalyticsSummary {
    let efficiency = fuel_efficiency(fuel_records);
    AnalyticsSummary {
        vehicle_id: vehicle.id,
        trip_count: trips.len(),
        total_distance_km: trips.iter().map(|t| t.distance_km).sum(),
        total_fuel_cost: fuel_records.iter().map(|r| r.total_cost).sum(),
        total_maintenance_cost: maintenance_records.iter().map(|r| r.cost).sum(),
        fuel_efficiency: efficiency.liters_per_100km,
        fuel_efficiency_estimated: efficiency.estimated,
        monthly_costs: monthly_costs(fuel_records, maintenance_records, now),
        upcoming_maintenance: upcoming_maintenance(maintenance_records, now),
    }
}

/// Overall consumption in liters per 100 km.
///
/// Records are sorted by odometer reading; segments are consecutive pairs
/// with both endpoints marked `full_tank`, falling back to all consecutive
/// pairs when no full-tank pair exists. A segment is discarded when its
/// distance is non-positive or implausibly long, or its liters are
/// non-positive.
pub fn fuel_efficiency(records: &[FuelRecord]) -> FuelEfficiency {
    if records.len() < 2 {
        return FuelEfficiency {
            liters_per_100km: None,
            estimated: false,
        };
    }

    let mut sorted: Vec<&FuelRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.mileage.total_cmp(&b.mileage));

    let full_pairs_exist = sorted
        .windows(2)
        .any(|pair| pair[0].full_tank && pair[1].full_tank);

    let mut total_distance = 0.0;
    let mut total_liters = 0.0;
    for pair in sorted.windows(2) {
        if full_pairs_exist && !(pair[0].full_tank && pair[1].full_tank) {
            continue;
        }
        let distance = pair[1].mileage - pair[0].mileage;
        let liters = pair[1].liters;
        if distance <= 0.0 || distance >= MAX_SEGMENT_KM || liters <= 0.0 {
            continue;
        }
        total_distance += distance;
        total_liters += liters;
    }

    let liters_per_100km = if total_distance > 0.0 {
        Some(total_liters / total_distance * 100.0)
    } else {
        None
    };
    FuelEfficiency {
        liters_per_100km,
        estimated: !full_pairs_exist,
    }
}

/// `(year, month)` shifted back by `offset` whole months.
fn shift_month(year: i32, month: u32, offset: u32) -> (i32, u32) {
    let absolute = year * 12 + month as i32 - 1 - offset as i32;
    (absolute.div_euclid(12), absolute.rem_euclid(12) as u32 + 1)
}

/// Fuel and maintenance costs bucketed per calendar month for the trailing
/// window ending at `now`, oldest first, with zero entries kept.
pub fn monthly_costs(
    fuel_records: &[FuelRecord],
    maintenance_records: &[MaintenanceRecord],
    now: DateTime<Utc>,
) -> Vec<MonthlyCost> {
    let today = now.date_naive();
    (0..MONTHLY_WINDOW)
        .rev()
        .map(|offset| {
            let (year, month) = shift_month(today.year(), today.month(), offset);
            let fuel = fuel_records
                .iter()
                .filter(|r| r.date.year() == year && r.date.month() == month)
                .map(|r| r.total_cost)
                .sum();
            let maintenance = maintenance_records
                .iter()
                .filter(|r| r.date.year() == year && r.date.month() == month)
                .map(|r| r.cost)
                .sum();
            MonthlyCost {
                month: format!("{year:04}-{month:02}"),
                fuel,
                maintenance,
            }
        })
        .collect()
}

/// Default service interval in days for a service type without an explicit
/// `next_service_due`.
fn service_interval_days(service_type: &str) -> i64 {
    let lowered = service_type.to_lowercase();
    if lowered.contains("oil") {
        90
    } else if lowered.contains("tire") {
        180
    } else if lowered.contains("brake") || lowered.contains("inspection") {
        365
    } else {
        180
    }
}

/// Predicted upcoming services: the latest record per distinct service type,
/// due on its explicit `next_service_due` or the interval-based estimate,
/// kept only when due within the horizon, sorted soonest first.
pub fn upcoming_maintenance(
    records: &[MaintenanceRecord],
    now: DateTime<Utc>,
) -> Vec<UpcomingMaintenance> {
    let today = now.date_naive();

    let mut latest: Vec<&MaintenanceRecord> = Vec::new();
    for record in records {
        match latest
            .iter_mut()
            .find(|r| r.service_type == record.service_type)
        {
            Some(existing) if record.date > existing.date => *existing = record,
            Some(_) => {}
            None => latest.push(record),
        }
    }

    let mut upcoming: Vec<UpcomingMaintenance> = latest
        .into_iter()
        .filter_map(|record| {
            let (due_date, estimated) = match record.next_service_due {
                Some(due) => (due, false),
                None => (
                    record.date + chrono::Duration::days(service_interval_days(&record.service_type)),
                    true,
                ),
            };
            let days_until_due = (due_date - today).num_days();
            if !(0..=UPCOMING_HORIZON_DAYS).contains(&days_until_due) {
                return None;
            }
            Some(UpcomingMaintenance {
                service_type: record.service_type.clone(),
                due_date,
                days_until_due,
                estimated,
            })
        })
        .collect();
    upcoming.sort_by_key(|entry| entry.days_until_due);
    upcoming
}
