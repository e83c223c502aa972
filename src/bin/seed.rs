//! Seed script for development — populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` environment variable (reads .env).

use sqlx::PgPool;
use uuid::Uuid;

const ADMIN_PASSWORD: &str = "Test123!";
const PARENT_PASSWORD: &str = "parent123";
const MEMBER_PASSWORD: &str = "member123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Run migrations first
    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== Homeport Seed Script ===");

    let family_id = Uuid::new_v4();
    let parent_id = seed_users(&pool, family_id).await?;
    seed_catalog(&pool, parent_id, family_id).await?;
    seed_fleet(&pool, parent_id, family_id).await?;
    seed_locations(&pool, parent_id).await?;

    println!("\n=== Seed complete! ===");
    println!("Admin login:  admin / {ADMIN_PASSWORD}");
    println!("Parent login: parent / {PARENT_PASSWORD}");
    println!("Member login: member / {MEMBER_PASSWORD}");

    Ok(())
}

/// Create the admin, parent, and member accounts. Returns the parent's id,
/// which owns the demo resources.
async fn seed_users(pool: &PgPool, family_id: Uuid) -> anyhow::Result<Uuid> {
    let existing: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM users WHERE username = 'parent'")
            .fetch_optional(pool)
            .await?;

    if let Some(id) = existing {
        println!("[skip] Users already exist");
        return Ok(id);
    }

    let admin_hash = homeport::services::auth::hash_password(ADMIN_PASSWORD)?;
    sqlx::query(
        "INSERT INTO users (username, email, password_hash, display_name, role)
         VALUES ('admin', 'admin@homeport.local', $1, 'Administrator', 'Admin')",
    )
    .bind(&admin_hash)
    .execute(pool)
    .await?;

    let parent_hash = homeport::services::auth::hash_password(PARENT_PASSWORD)?;
    let parent_id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (username, email, password_hash, display_name, role, family_id)
         VALUES ('parent', 'parent@homeport.local', $1, 'Pat Parent', 'Parent', $2)
         RETURNING id",
    )
    .bind(&parent_hash)
    .bind(family_id)
    .fetch_one(pool)
    .await?;

    let member_hash = homeport::services::auth::hash_password(MEMBER_PASSWORD)?;
    sqlx::query(
        "INSERT INTO users (username, email, password_hash, display_name, role, family_id)
         VALUES ('member', 'member@homeport.local', $1, 'Morgan Member', 'Member', $2)",
    )
    .bind(&member_hash)
    .bind(family_id)
    .execute(pool)
    .await?;

    println!("[done] Created admin, parent, and member users");
    Ok(parent_id)
}

async fn seed_catalog(pool: &PgPool, owner_id: Uuid, family_id: Uuid) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Categories already exist ({count})");
        return Ok(());
    }

    let categories = vec![
        ("Rock", "Guitar-driven classics"),
        ("Kids", "Road-trip singalongs"),
    ];

    for (name, description) in categories {
        let category_id: i64 = sqlx::query_scalar(
            "INSERT INTO categories (owner_id, family_id, name, description)
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(owner_id)
        .bind(family_id)
        .bind(name)
        .bind(description)
        .fetch_one(pool)
        .await?;

        let playlist_id: i64 = sqlx::query_scalar(
            "INSERT INTO playlists (category_id, owner_id, family_id, name, description)
             VALUES ($1, $2, $3, $4, NULL) RETURNING id",
        )
        .bind(category_id)
        .bind(owner_id)
        .bind(family_id)
        .bind(format!("{name} favorites"))
        .fetch_one(pool)
        .await?;

        // Dense 1-based order keys
        let songs = ["Opening Track", "Second Wind", "Closing Time"];
        for (index, title) in songs.iter().enumerate() {
            sqlx::query(
                "INSERT INTO songs (playlist_id, title, artist, duration_secs, order_key)
                 VALUES ($1, $2, 'Various Artists', 210, $3)",
            )
            .bind(playlist_id)
            .bind(title)
            .bind((index + 1) as i32)
            .execute(pool)
            .await?;
        }
    }

    println!("[done] Created 2 categories with playlists and songs");
    Ok(())
}

async fn seed_fleet(pool: &PgPool, owner_id: Uuid, family_id: Uuid) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vehicles")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Vehicles already exist ({count})");
        return Ok(());
    }

    let vehicle_id: i64 = sqlx::query_scalar(
        "INSERT INTO vehicles (owner_id, family_id, name, make, model, year, license_plate)
         VALUES ($1, $2, 'Family Wagon', 'Toyota', 'Corolla', 2021, 'AB-123-CD')
         RETURNING id",
    )
    .bind(owner_id)
    .bind(family_id)
    .fetch_one(pool)
    .await?;

    sqlx::query(
        "INSERT INTO trips (vehicle_id, date, distance_km, start_location, end_location, purpose)
         VALUES
           ($1, '2026-07-02', 42.5, 'Home', 'Office', 'Commute'),
           ($1, '2026-07-15', 310.0, 'Home', 'Coast', 'Holiday'),
           ($1, '2026-08-03', 18.2, 'Home', 'School', 'Drop-off')",
    )
    .bind(vehicle_id)
    .execute(pool)
    .await?;

    // Two full-tank fills so consumption analytics has a valid pair.
    sqlx::query(
        "INSERT INTO fuel_records (vehicle_id, date, mileage, liters, price_per_liter, total_cost, full_tank)
         VALUES
           ($1, '2026-07-01', 41000, 43.0, 1.82, 78.26, true),
           ($1, '2026-07-20', 41620, 41.5, 1.79, 74.29, true),
           ($1, '2026-08-05', 41900, 20.0, 1.85, 37.00, false)",
    )
    .bind(vehicle_id)
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT INTO maintenance_records (vehicle_id, date, mileage, service_type, cost, notes, next_service_due)
         VALUES
           ($1, '2026-06-10', 40500, 'Oil Change', 85.00, 'Synthetic 5W-30', NULL),
           ($1, '2026-05-02', 39800, 'Tire Rotation', 40.00, NULL, NULL)",
    )
    .bind(vehicle_id)
    .execute(pool)
    .await?;

    println!("[done] Created 1 vehicle with trips, fuel, and maintenance records");
    Ok(())
}

async fn seed_locations(pool: &PgPool, owner_id: Uuid) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Locations already exist ({count})");
        return Ok(());
    }

    // Shared locations have no owner.
    sqlx::query(
        "INSERT INTO locations (owner_id, name, address, latitude, longitude)
         VALUES
           (NULL, 'School', '1 School Lane', 52.370, 4.895),
           (NULL, 'Supermarket', '12 Market Street', 52.372, 4.901)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT INTO locations (owner_id, name, address, latitude, longitude)
         VALUES ($1, 'Grandma', '7 Elm Road', 52.401, 4.850)",
    )
    .bind(owner_id)
    .execute(pool)
    .await?;

    println!("[done] Created shared and personal locations");
    Ok(())
}
