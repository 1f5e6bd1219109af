//! Demo data seeding
//!
//! When `SEED_DEMO_DATA=true` and the catalog is empty, inserts a small
//! demo catalog and a default admin account. Never touches a non-empty
//! database.

use sqlx::SqlitePool;

use crate::auth::password::hash_password;
use crate::core::Config;
use crate::db::repository::{product, user};
use crate::utils::AppError;
use shared::models::{ProductCreate, UserRole};

pub async fn seed_if_empty(pool: &SqlitePool, config: &Config) -> Result<(), AppError> {
    if !config.seed_demo_data {
        return Ok(());
    }

    let count = product::count(pool).await?;
    if count > 0 {
        tracing::debug!("Seed skipped: catalog already has {count} products");
        return Ok(());
    }

    let password_hash = hash_password(&config.seed_admin_password)?;
    user::create(
        pool,
        "admin@store.local",
        &password_hash,
        "Administrador",
        None,
        UserRole::Admin,
    )
    .await?;

    for data in demo_products() {
        let images = data.images.clone();
        product::create(pool, data, images).await?;
    }

    tracing::info!("Seeded demo catalog and admin user (admin@store.local)");
    Ok(())
}

fn demo_products() -> Vec<ProductCreate> {
    let entries = [
        (
            "Camisa Brasil I 2024",
            "Brasil",
            349.9,
            "Camisa oficial da Seleção Brasileira, temporada 2024.",
            true,
            "Seleções",
            "P,M,G,GG",
            120,
        ),
        (
            "Camisa Flamengo I 2024",
            "Flamengo",
            299.9,
            "Manto rubro-negro oficial, temporada 2024.",
            true,
            "Clubes",
            "P,M,G",
            80,
        ),
        (
            "Camisa Argentina II 2023",
            "Argentina",
            279.9,
            "Camisa visitante da seleção argentina.",
            false,
            "Seleções",
            "M,G,GG",
            45,
        ),
        (
            "Camisa Retrô Santos 1962",
            "Santos",
            199.9,
            "Reedição clássica do bicampeonato mundial.",
            false,
            "Retrô",
            "P,M,G",
            30,
        ),
    ];

    entries
        .into_iter()
        .map(
            |(name, team, price, description, is_new, category, sizes, stock)| ProductCreate {
                name: name.to_string(),
                team: team.to_string(),
                price,
                images: vec![format!(
                    "https://cdn.store.local/products/{}.jpg",
                    name.to_lowercase().replace(' ', "-")
                )],
                description: description.to_string(),
                is_new: Some(is_new),
                category: category.to_string(),
                sizes: sizes.split(',').map(str::to_string).collect(),
                rating: None,
                stock: Some(stock),
            },
        )
        .collect()
}
