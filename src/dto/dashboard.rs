use sea_orm::FromQueryResult;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{entity::enums::Category, models::Product};

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_products: u64,
    pub active_products: u64,
    pub low_stock_products: u64,
    pub out_of_stock_products: u64,
    pub total_stock_value: f64,
    pub total_sales_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    #[serde(rename = "_id")]
    pub category: Category,
    pub count: i64,
    pub total_stock: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategorySales {
    #[serde(rename = "_id")]
    pub category: Category,
    pub total_sales: i64,
    pub total_revenue: f64,
}

/// One calendar-month bucket as read from the store, `month` in `1..=12`.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct MonthBucket {
    pub month: i32,
    pub sales: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlySales {
    pub month: String,
    pub sales: i64,
    pub revenue: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub overview: Overview,
    pub category_stats: Vec<CategoryStat>,
    pub sales_stats: Vec<CategorySales>,
    pub monthly_sales: Vec<MonthlySales>,
    pub recent_products: Vec<Product>,
    pub top_selling_products: Vec<Product>,
}
