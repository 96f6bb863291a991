use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use catalog_admin_api::{
    config::database_url,
    db::{create_orm_conn, run_migrations},
    entity::{
        enums::{Category, ProductStatus, Role},
        products::{self, ProductImage, ProductImages},
        users,
    },
    services::auth_service::hash_password,
};

const DEMO_PASSWORD: &str = "admin123";
const PRODUCT_COUNT: u32 = 25;

const CATEGORIES: [Category; 5] = [
    Category::Electronics,
    Category::Clothing,
    Category::HomeAndGarden,
    Category::Sports,
    Category::Books,
];

const STATUSES: [ProductStatus; 3] = [
    ProductStatus::Active,
    ProductStatus::Inactive,
    ProductStatus::Draft,
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let orm = create_orm_conn(&database_url()?).await?;
    run_migrations(&orm).await?;

    products::Entity::delete_many().exec(&orm).await?;
    users::Entity::delete_many().exec(&orm).await?;
    println!("Cleared existing users and products");

    create_user(&orm, "Super Admin", "admin@demo.com", Role::Superadmin).await?;
    create_user(&orm, "Demo Admin", "demo@demo.com", Role::Admin).await?;
    println!("Created 2 admin users");

    for i in 1..=PRODUCT_COUNT {
        seed_product(&orm, i).await?;
    }
    println!("Created {PRODUCT_COUNT} sample products");

    println!("Seed completed.");
    println!("  Super Admin: admin@demo.com / {DEMO_PASSWORD}");
    println!("  Admin:       demo@demo.com / {DEMO_PASSWORD}");
    Ok(())
}

async fn create_user(
    orm: &DatabaseConnection,
    name: &str,
    email: &str,
    role: Role,
) -> anyhow::Result<()> {
    let now = Utc::now();
    users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(hash_password(DEMO_PASSWORD)?),
        role: Set(role),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(orm)
    .await?;
    Ok(())
}

/// Values are derived from the index so repeated seeding produces the same catalog.
async fn seed_product(orm: &DatabaseConnection, i: u32) -> anyhow::Result<()> {
    let idx = i as usize;
    let spread = i64::from(i) * 37;
    // Spread creation dates over the past year so the monthly chart has data.
    let created_at = Utc::now() - Duration::days(i64::from(i) * 13);

    products::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(format!("Product {i}")),
        description: Set(format!(
            "This is a detailed description for Product {i}. It includes all the features and specifications that customers need to know."
        )),
        price: Set((10 + spread % 500) as f64),
        category: Set(CATEGORIES[idx % CATEGORIES.len()]),
        stock: Set(((spread * 7) % 100) as i32),
        sku: Set(format!("PROD-{i:04}")),
        images: Set(ProductImages(vec![placeholder(i), placeholder(i + 100)])),
        status: Set(STATUSES[idx % STATUSES.len()]),
        sales: Set(((spread * 3) % 200) as i32),
        created_at: Set(created_at.into()),
        updated_at: Set(created_at.into()),
    }
    .insert(orm)
    .await?;
    Ok(())
}

fn placeholder(seed: u32) -> ProductImage {
    ProductImage {
        url: format!("https://picsum.photos/seed/{seed}/400/400"),
        public_id: format!("seed-{seed}"),
    }
}
