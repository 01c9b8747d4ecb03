//! Database seeders for the built-in catalog
//!
//! The planet/character/vehicle tables are reference data with no write
//! endpoints, so they are populated here at startup instead.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Seed the catalog tables (runs on every startup; existing rows are kept)
pub async fn seed_catalog(pool: &SqlitePool) -> Result<()> {
    info!("Seeding catalog data...");

    let planets: Vec<(&str, i64)> = vec![
        ("Tatooine", 200_000),
        ("Alderaan", 2_000_000_000),
        ("Hoth", 0),
        ("Dagobah", 1),
        ("Bespin", 6_000_000),
        ("Endor", 30_000_000),
        ("Naboo", 4_500_000_000),
        ("Coruscant", 1_000_000_000_000),
    ];
    for (name, population) in planets {
        sqlx::query("INSERT OR IGNORE INTO planets (name, population) VALUES (?, ?)")
            .bind(name)
            .bind(population)
            .execute(pool)
            .await?;
    }

    let characters: Vec<(&str, i64)> = vec![
        ("Luke Skywalker", 77),
        ("Leia Organa", 49),
        ("Han Solo", 80),
        ("Chewbacca", 112),
        ("Darth Vader", 136),
        ("Obi-Wan Kenobi", 77),
        ("Yoda", 17),
        ("R2-D2", 32),
    ];
    for (name, mass) in characters {
        sqlx::query("INSERT OR IGNORE INTO characters (name, mass) VALUES (?, ?)")
            .bind(name)
            .bind(mass)
            .execute(pool)
            .await?;
    }

    let vehicles: Vec<(&str, &str)> = vec![
        ("X-wing", "T-65B"),
        ("TIE Advanced x1", "Twin Ion Engine"),
        ("Millennium Falcon", "YT-1300"),
        ("Imperial Speeder Bike", "74-Z"),
        ("Snowspeeder", "t-47"),
        ("AT-AT", "All Terrain Armored Transport"),
    ];
    for (name, model) in vehicles {
        sqlx::query("INSERT OR IGNORE INTO vehicles (name, model) VALUES (?, ?)")
            .bind(name)
            .bind(model)
            .execute(pool)
            .await?;
    }

    info!("Catalog seeding completed");
    Ok(())
}
