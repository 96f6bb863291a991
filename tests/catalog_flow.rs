use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

use catalog_admin_api::{
    db::{create_orm_conn, run_migrations},
    dto::{
        auth::{LoginRequest, RegisterAdminRequest},
        products::ProductRequest,
    },
    entity::{
        enums::{ProductStatus, Role},
        products, users,
    },
    error::{AppError, unique_conflict},
    media::MockMediaHost,
    routes::params::ProductQuery,
    services::{admin_service, auth_service, product_service},
    state::AppState,
    token::TokenKeys,
};

// Integration flow: superadmin logs in -> registers an admin -> manages a product -> cleans up.
#[tokio::test]
async fn login_manage_catalog_and_admins_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;
    let state = AppState {
        orm: Arc::new(orm),
        tokens: Arc::new(TokenKeys::new("flow-secret")),
        media: Arc::new(MockMediaHost::new()),
        cookie_secure: false,
    };

    let tag = Uuid::new_v4().simple().to_string()[..8].to_string();
    let super_email = format!("flow-super-{tag}@demo.com");
    let super_id = create_superadmin(&state, &super_email).await?;

    // Wrong password and right password
    let err = auth_service::login(
        &state,
        LoginRequest {
            email: Some(super_email.clone()),
            password: Some("admin124".into()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Invalid email or password"));

    let session = auth_service::login(
        &state,
        LoginRequest {
            email: Some(super_email.to_uppercase()),
            password: Some("admin123".into()),
        },
    )
    .await?;
    assert_eq!(session.user.id, super_id);
    let me = state.tokens.verify(&session.token).expect("session token");
    assert_eq!(me.role, Role::Superadmin);

    // Register an admin, then the same email again
    let admin_email = format!("flow-admin-{tag}@demo.com");
    let register = || RegisterAdminRequest {
        name: Some("Flow Admin".into()),
        email: Some(admin_email.clone()),
        password: Some("secret1".into()),
        confirm_password: Some("secret1".into()),
        role: Some("admin".into()),
    };
    let created = admin_service::register_admin(&state, &me, register())
        .await?
        .data
        .expect("created admin");
    assert_eq!(created.role, Role::Admin);
    let err = admin_service::register_admin(&state, &me, register())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let admins = admin_service::list_admins(&state, &me).await?.data.expect("admins");
    assert!(admins.admins.iter().any(|a| a.id == created.id));

    // Product lifecycle
    let sku = format!("flow-{tag}");
    let request = |price: f64| ProductRequest {
        name: Some(format!("Flow Widget {tag}")),
        description: Some("A widget created by the integration flow".into()),
        category: Some("Home & Garden".into()),
        price: Some(price),
        stock: Some(7.0),
        sku: Some(sku.clone()),
        status: Some("draft".into()),
        images: None,
    };

    let err = product_service::create_product(&state, &me, request(0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let product = product_service::create_product(&state, &me, request(19.99))
        .await?
        .data
        .expect("product")
        .product;
    assert_eq!(product.sku, sku.to_uppercase());
    assert_eq!(product.sales, 0);

    let err = product_service::create_product(&state, &me, request(5.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // A racing insert that slips past the lookup still lands on the unique index.
    let mut racing: products::ActiveModel = products::Entity::find_by_id(product.id)
        .one(state.db())
        .await?
        .expect("stored product")
        .into();
    racing.id = Set(Uuid::new_v4());
    let raced = racing.insert(state.db()).await.unwrap_err();
    let err = unique_conflict(raced, "Product with this SKU already exists");
    assert!(matches!(err, AppError::Conflict(_)));

    let updated = product_service::update_product(
        &state,
        &me,
        product.id,
        ProductRequest {
            stock: Some(0.0),
            status: Some("active".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("updated")
    .product;
    assert_eq!(updated.stock, 0);
    assert!(updated.updated_at >= product.updated_at);

    let listed = product_service::list_products(
        &state,
        ProductQuery {
            search: Some(tag.clone()),
            ..Default::default()
        },
    )
    .await?;
    let meta = listed.meta.expect("meta");
    assert_eq!(meta.total, Some(1));
    assert_eq!(meta.total_pages, Some(1));

    let filtered = product_service::list_products(
        &state,
        ProductQuery {
            search: Some(format!("widget {tag}")),
            category: Some("Home & Garden".into()),
            status: Some("active".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(filtered.meta.expect("meta").total, Some(1));

    let other_category = product_service::list_products(
        &state,
        ProductQuery {
            search: Some(tag.clone()),
            category: Some("Books".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(other_category.meta.expect("meta").total, Some(0));

    let fetched = product_service::get_product(&state, product.id)
        .await?
        .data
        .expect("product")
        .product;
    assert_eq!(fetched.status, ProductStatus::Active);

    product_service::delete_product(&state, &me, product.id).await?;
    let err = product_service::get_product(&state, product.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Admin removal
    let err = admin_service::delete_admin(&state, &me, me.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    admin_service::delete_admin(&state, &me, created.id).await?;

    users::Entity::delete_by_id(super_id).exec(state.db()).await?;
    Ok(())
}

async fn create_superadmin(state: &AppState, email: &str) -> anyhow::Result<Uuid> {
    let now = Utc::now();
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Flow Superadmin".into()),
        email: Set(email.to_string()),
        password_hash: Set(auth_service::hash_password("admin123")?),
        role: Set(Role::Superadmin),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(state.db())
    .await?;
    Ok(user.id)
}
