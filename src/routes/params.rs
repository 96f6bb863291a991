use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl Pagination {
    /// Returns `(page, limit, offset)` with page at least 1 and limit clamped to `1..=MAX_LIMIT`.
    pub fn normalize(&self) -> (u64, u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = (page - 1).saturating_mul(limit);
        (page, limit, offset)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ProductSortBy {
    #[default]
    CreatedAt,
    UpdatedAt,
    Name,
    Price,
    Stock,
    Sales,
    Sku,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Page number, default 1
    pub page: Option<u64>,
    /// Items per page, default 10, at most 100
    pub limit: Option<u64>,
    /// Full-text search over name and description
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    #[param(value_type = Option<String>)]
    pub sort_by: Option<ProductSortBy>,
    #[param(value_type = Option<String>)]
    pub sort_order: Option<SortOrder>,
}

impl ProductQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
        }
    }
}
