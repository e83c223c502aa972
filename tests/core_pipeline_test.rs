//! Integration test for the request-independent core: ordering, pagination,
//! link assembly, access policy, and analytics working together the way the
//! handlers drive them. Needs no database.

use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

use homeport::middleware::auth::CurrentUser;
use homeport::models::catalog::Song;
use homeport::models::fleet::{FuelRecord, MaintenanceRecord, Trip, Vehicle};
use homeport::models::links::{PageEnvelope, ResourceEnvelope};
use homeport::models::pagination::{PageMetadata, PageParams, PaginationHeader};
use homeport::models::user::UserRole;
use homeport::services::links::{self, LinkContext, ResourceKind};
use homeport::services::ordering;
use homeport::services::policy;
use homeport::services::{analytics, analytics::AnalyticsSummary};

fn song(id: i64, order_key: i32) -> Song {
    Song {
        id,
        playlist_id: 7,
        title: format!("Track {id}"),
        artist: None,
        duration_secs: Some(200),
        order_key,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn caller(role: UserRole, family_id: Option<Uuid>) -> CurrentUser {
    CurrentUser {
        id: Uuid::new_v4(),
        username: "caller".to_string(),
        role,
        family_id,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Append, move, and delete songs the way the song handlers do, checking the
/// dense {1..N} key invariant after every step.
#[test]
fn playlist_reorder_lifecycle() {
    let mut songs: Vec<Song> = Vec::new();
    for id in 1..=5 {
        let key = ordering::next_order_key(&songs);
        assert_eq!(key, id as i32);
        songs.push(song(id, key));
    }

    // Move song 5 to the front.
    let songs = ordering::reorder(&songs, 5, 1).unwrap();
    let ids: Vec<i64> = songs.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![5, 1, 2, 3, 4]);

    // A position far past the end appends.
    let songs = ordering::reorder(&songs, 5, 9999).unwrap();
    let ids: Vec<i64> = songs.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);

    // Delete song 3, then densify the survivors.
    let remaining: Vec<Song> = songs.into_iter().filter(|s| s.id != 3).collect();
    let remaining = ordering::densify(&remaining);
    let keys: Vec<i32> = remaining.iter().map(|s| s.order_key).collect();
    assert_eq!(keys, vec![1, 2, 3, 4]);
    assert_eq!(ordering::next_order_key(&remaining), 5);
}

/// A list handler's output for a middle page: metadata, header payload, and
/// page links must all agree.
#[test]
fn paginated_page_with_header_and_links() {
    let params = PageParams {
        page_number: Some(2),
        page_size: Some(10),
    };
    let meta = PageMetadata::compute(23, &params);
    assert_eq!(meta.total_pages, 3);

    let collection = links::collection_path(ResourceKind::Song, "/api/v1/categories/5/playlists/7")
        .unwrap();
    let (previous, next) = links::page_nav_hrefs(&collection, &meta);
    let header = PaginationHeader::new(&meta, previous.as_deref(), next.as_deref());
    let payload: Value = serde_json::from_str(&header.to_header_value()).unwrap();

    assert_eq!(payload["totalCount"], 23);
    assert_eq!(payload["pageSize"], 10);
    assert_eq!(payload["currentPage"], 2);
    assert_eq!(payload["totalPages"], 3);
    assert_eq!(
        payload["previousPageLink"],
        "/api/v1/categories/5/playlists/7/songs?pageNumber=1&pageSize=10"
    );
    assert_eq!(
        payload["nextPageLink"],
        "/api/v1/categories/5/playlists/7/songs?pageNumber=3&pageSize=10"
    );

    let page_links = links::page_links(&collection, &meta);
    let rels: Vec<&str> = page_links.iter().map(|l| l.rel.as_str()).collect();
    assert_eq!(rels, vec!["self", "previousPage", "nextPage"]);
}

/// Envelope JSON for a single resource: `resource` plus `links`, with the
/// mutation links present only for a caller who may write.
#[test]
fn resource_envelope_shape_follows_policy() {
    let owner = caller(UserRole::Member, None);
    let reader = caller(UserRole::Member, None);
    let item = song(3, 1);

    for (user, expected_rels) in [
        (&owner, vec!["self", "edit", "remove"]),
        (&reader, vec!["self"]),
    ] {
        let ctx = LinkContext::new(
            "/api/v1/categories/5/playlists/7",
            policy::can_write(user, owner.id),
        );
        let resource_links = links::resource_links(ResourceKind::Song, item.id, &ctx).unwrap();
        let envelope = ResourceEnvelope::new(item.clone(), resource_links);
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["resource"]["id"], 3);
        assert_eq!(json["resource"]["orderKey"], 1);
        let rels: Vec<&str> = json["links"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["rel"].as_str().unwrap())
            .collect();
        assert_eq!(rels, expected_rels);
        assert_eq!(
            json["links"][0]["href"],
            "/api/v1/categories/5/playlists/7/songs/3"
        );
    }
}

/// Page envelope JSON: `resources` array of envelopes plus page `links`.
#[test]
fn page_envelope_shape() {
    let user = caller(UserRole::Admin, None);
    let meta = PageMetadata::compute(2, &PageParams::default());
    let ctx = LinkContext::new("/api/v1/categories/5/playlists/7", policy::can_write(&user, Uuid::new_v4()));

    let resources: Vec<ResourceEnvelope<Song>> = [song(1, 1), song(2, 2)]
        .into_iter()
        .map(|s| {
            let l = links::resource_links(ResourceKind::Song, s.id, &ctx).unwrap();
            ResourceEnvelope::new(s, l)
        })
        .collect();
    let collection = links::collection_path(ResourceKind::Song, &ctx.parent_path).unwrap();
    let envelope = PageEnvelope::new(resources, links::page_links(&collection, &meta));

    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["resources"].as_array().unwrap().len(), 2);
    assert_eq!(json["resources"][1]["resource"]["orderKey"], 2);
    assert_eq!(json["links"][0]["rel"], "self");
}

/// The scoping rules the handlers combine: admins see everything, parents
/// read family resources but never write them, members stay within their own.
#[test]
fn role_scoping_across_roles() {
    let family = Uuid::new_v4();
    let admin = caller(UserRole::Admin, None);
    let parent = caller(UserRole::Parent, Some(family));
    let member = caller(UserRole::Member, Some(family));
    let other_owner = Uuid::new_v4();

    assert!(policy::can_read(&admin, other_owner, None));
    assert!(policy::can_write(&admin, other_owner));

    assert!(policy::can_read(&parent, other_owner, Some(family)));
    assert!(!policy::can_write(&parent, other_owner));
    assert!(!policy::can_read(&parent, other_owner, None));

    assert!(!policy::can_read(&member, other_owner, Some(family)));
    assert!(policy::can_write(&member, member.id));
}

fn fuel(id: i64, d: NaiveDate, mileage: f64, liters: f64, cost: f64, full: bool) -> FuelRecord {
    FuelRecord {
        id,
        vehicle_id: 1,
        date: d,
        mileage,
        liters,
        price_per_liter: None,
        total_cost: cost,
        full_tank: full,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Analytics summary over a realistic record set, as the analytics endpoint
/// would serialize it.
#[test]
fn analytics_summary_over_vehicle_history() {
    let now = Utc.with_ymd_and_hms(2026, 8, 27, 12, 0, 0).unwrap();
    let vehicle = Vehicle {
        id: 1,
        owner_id: Uuid::new_v4(),
        family_id: None,
        name: "Family Wagon".to_string(),
        make: None,
        model: None,
        year: Some(2021),
        license_plate: None,
        created_at: now,
        updated_at: now,
    };
    let trips = vec![
        Trip {
            id: 1,
            vehicle_id: 1,
            date: date(2026, 7, 2),
            distance_km: 42.5,
            start_location: None,
            end_location: None,
            purpose: None,
            created_at: now,
            updated_at: now,
        },
        Trip {
            id: 2,
            vehicle_id: 1,
            date: date(2026, 7, 15),
            distance_km: 310.0,
            start_location: None,
            end_location: None,
            purpose: None,
            created_at: now,
            updated_at: now,
        },
    ];
    let fuel_records = vec![
        fuel(1, date(2026, 7, 1), 41000.0, 43.0, 78.26, true),
        fuel(2, date(2026, 7, 20), 41500.0, 40.0, 74.29, true),
        // Partial fill after the full pair: excluded from efficiency.
        fuel(3, date(2026, 8, 5), 41900.0, 20.0, 37.00, false),
    ];
    let maintenance = vec![MaintenanceRecord {
        id: 1,
        vehicle_id: 1,
        date: date(2026, 8, 10),
        mileage: 41800.0,
        service_type: "Oil Change".to_string(),
        cost: 85.0,
        notes: None,
        next_service_due: None,
        created_at: now,
        updated_at: now,
    }];

    let summary: AnalyticsSummary =
        analytics::report(&vehicle, &trips, &fuel_records, &maintenance, now);

    assert_eq!(summary.vehicle_id, 1);
    assert_eq!(summary.trip_count, 2);
    assert!((summary.total_distance_km - 352.5).abs() < 1e-9);
    assert!((summary.total_fuel_cost - 189.55).abs() < 1e-9);
    assert!((summary.total_maintenance_cost - 85.0).abs() < 1e-9);

    // One full-tank segment: 40 liters over 500 km = 8.0 l/100km, not estimated.
    assert_eq!(summary.fuel_efficiency, Some(8.0));
    assert!(!summary.fuel_efficiency_estimated);

    // Oil change on 2026-08-10 with a 90-day interval falls inside the window.
    assert_eq!(summary.upcoming_maintenance.len(), 1);
    let upcoming = &summary.upcoming_maintenance[0];
    assert_eq!(upcoming.service_type, "Oil Change");
    assert_eq!(upcoming.due_date, date(2026, 11, 8));
    assert!(upcoming.estimated);

    // Six monthly buckets ending at the current month.
    assert_eq!(summary.monthly_costs.len(), 6);
    assert_eq!(summary.monthly_costs.last().unwrap().month, "2026-08");
    let july = summary
        .monthly_costs
        .iter()
        .find(|m| m.month == "2026-07")
        .unwrap();
    assert!((july.fuel - 152.55).abs() < 1e-9);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["fuelEfficiency"], 8.0);
    assert_eq!(json["upcomingMaintenance"][0]["daysUntilDue"], 73);
}

/// Unknown kinds cannot happen through the enum, but a kind missing from the
/// route table must surface as an internal error, never a partial link set.
#[test]
fn location_kind_resolves_in_route_table() {
    let ctx = LinkContext::new("/api/v1", false);
    let resource_links = links::resource_links(ResourceKind::Location, 4, &ctx).unwrap();
    assert_eq!(resource_links[0].href, "/api/v1/locations/4");
}
