use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use sea_orm::sea_query::Expr;
use uuid::Uuid;

use crate::{
    dto::products::{ProductEnvelope, ProductList, ProductRequest},
    entity::{
        enums::{Category, ProductStatus, parse_enum},
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel, ProductImages},
    },
    error::{AppError, AppResult, unique_conflict},
    middleware::auth::AuthUser,
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    state::AppState,
    validation::{PartialProduct, ValidationErrors, validate},
};

const DUPLICATE_SKU: &str = "Product with this SKU already exists";
const NOT_FOUND: &str = "Product not found";

/// Matches the expression behind the full-text GIN index on `products`.
const SEARCH_MATCH: &str =
    "to_tsvector('english', name || ' ' || description) @@ websearch_to_tsquery('english', $1)";

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let condition = list_condition(&query)?;

    let sort_col = match query.sort_by.unwrap_or_default() {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::UpdatedAt => Column::UpdatedAt,
        ProductSortBy::Name => Column::Name,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Stock => Column::Stock,
        ProductSortBy::Sales => Column::Sales,
        ProductSortBy::Sku => Column::Sku,
    };

    let mut finder = Products::find().filter(condition);
    finder = match query.sort_order.unwrap_or_default() {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };
    // Tie-break so pages never overlap when the sort column has duplicates.
    finder = finder.order_by_asc(Column::Id);

    let (total, items) = tokio::try_join!(
        finder.clone().count(state.db()),
        finder.limit(limit).offset(offset).all(state.db()),
    )?;

    let products = items.into_iter().map(Product::from).collect();
    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Products",
        ProductList { products },
        Some(meta),
    ))
}

fn list_condition(query: &ProductQuery) -> AppResult<Condition> {
    let mut condition = Condition::all();
    let mut errors = ValidationErrors::default();

    if let Some(search) = non_empty(query.search.as_deref()) {
        condition = condition.add(Expr::cust_with_values(SEARCH_MATCH, [search.to_string()]));
    }

    if let Some(raw) = non_empty(query.category.as_deref()) {
        match parse_enum::<Category>(raw) {
            Some(category) => condition = condition.add(Column::Category.eq(category)),
            None => errors.add("category", "Unknown category"),
        }
    }

    if let Some(raw) = non_empty(query.status.as_deref()) {
        match parse_enum::<ProductStatus>(raw) {
            Some(status) => condition = condition.add(Column::Status.eq(status)),
            None => errors.add("status", "Unknown status"),
        }
    }

    if errors.is_empty() {
        Ok(condition)
    } else {
        Err(errors.into())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<ProductEnvelope>> {
    let product = find_product(state, id).await?;
    Ok(ApiResponse::success(
        "Product",
        ProductEnvelope {
            product: product.into(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: ProductRequest,
) -> AppResult<ApiResponse<ProductEnvelope>> {
    let input = validate(payload)?;

    let duplicate = Products::find()
        .filter(Column::Sku.eq(input.sku.as_str()))
        .one(state.db())
        .await?;
    if duplicate.is_some() {
        return Err(AppError::Conflict(DUPLICATE_SKU.into()));
    }

    let now = Utc::now();
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        description: Set(input.description),
        price: Set(input.price),
        category: Set(input.category),
        stock: Set(input.stock),
        sku: Set(input.sku),
        images: Set(ProductImages(input.images)),
        status: Set(input.status),
        sales: Set(0),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    let product = active
        .insert(state.db())
        .await
        .map_err(|err| unique_conflict(err, DUPLICATE_SKU))?;

    tracing::info!(user_id = %user.user_id, product_id = %product.id, sku = %product.sku, "product created");

    Ok(ApiResponse::success(
        "Product created",
        ProductEnvelope {
            product: product.into(),
        },
        Some(Meta::empty()),
    ))
}

/// The SKU uniqueness query only runs when the normalized SKU actually changes.
pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: ProductRequest,
) -> AppResult<ApiResponse<ProductEnvelope>> {
    let patch = validate(PartialProduct(payload))?;
    let existing = find_product(state, id).await?;

    if let Some(sku) = patch.sku.as_deref()
        && sku != existing.sku
    {
        let duplicate = Products::find()
            .filter(Column::Sku.eq(sku))
            .filter(Column::Id.ne(id))
            .one(state.db())
            .await?;
        if duplicate.is_some() {
            return Err(AppError::Conflict(DUPLICATE_SKU.into()));
        }
    }

    let mut active: ActiveModel = existing.into();
    if let Some(name) = patch.name {
        active.name = Set(name);
    }
    if let Some(description) = patch.description {
        active.description = Set(description);
    }
    if let Some(category) = patch.category {
        active.category = Set(category);
    }
    if let Some(price) = patch.price {
        active.price = Set(price);
    }
    if let Some(stock) = patch.stock {
        active.stock = Set(stock);
    }
    if let Some(sku) = patch.sku {
        active.sku = Set(sku);
    }
    if let Some(status) = patch.status {
        active.status = Set(status);
    }
    if let Some(images) = patch.images {
        active.images = Set(ProductImages(images));
    }
    active.updated_at = Set(Utc::now().into());

    let product = active
        .update(state.db())
        .await
        .map_err(|err| unique_conflict(err, DUPLICATE_SKU))?;

    tracing::info!(user_id = %user.user_id, product_id = %product.id, "product updated");

    Ok(ApiResponse::success(
        "Updated",
        ProductEnvelope {
            product: product.into(),
        },
        Some(Meta::empty()),
    ))
}

/// Images are removed from the media host first; a failed removal is logged and skipped.
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let product = find_product(state, id).await?;

    for image in &product.images.0 {
        if let Err(err) = state.media.destroy(&image.public_id).await {
            tracing::warn!(
                error = %err,
                product_id = %id,
                public_id = %image.public_id,
                "image deletion failed"
            );
        }
    }

    Products::delete_by_id(id).exec(state.db()).await?;

    tracing::info!(user_id = %user.user_id, product_id = %id, "product deleted");

    Ok(ApiResponse::success(
        "Product deleted successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn find_product(state: &AppState, id: Uuid) -> AppResult<ProductModel> {
    match Products::find_by_id(id).one(state.db()).await? {
        Some(p) => Ok(p),
        None => Err(AppError::NotFound(NOT_FOUND.into())),
    }
}
