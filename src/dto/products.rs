use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    entity::{
        enums::{Category, ProductStatus},
        products::ProductImage,
    },
    models::Product,
};

/// Body of both create and update; update treats every field as optional.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<f64>,
    pub sku: Option<String>,
    pub status: Option<String>,
    pub images: Option<Vec<ProductImage>>,
}

/// Full product shape after validation; `sku` is already normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub price: f64,
    pub stock: i32,
    pub sku: String,
    pub status: ProductStatus,
    pub images: Vec<ProductImage>,
}

/// Validated partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub sku: Option<String>,
    pub status: Option<ProductStatus>,
    pub images: Option<Vec<ProductImage>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductEnvelope {
    pub product: Product,
}
