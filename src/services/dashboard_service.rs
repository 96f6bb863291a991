use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Alias, Expr, Order, SimpleExpr},
};

use crate::{
    dto::dashboard::{CategorySales, CategoryStat, DashboardStats, MonthBucket, MonthlySales, Overview},
    entity::{
        enums::ProductStatus,
        products::{Column, Entity as Products},
    },
    error::AppResult,
    models::Product,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const LOW_STOCK_THRESHOLD: i32 = 10;
const LIST_SIZE: u64 = 5;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Maps a 1-indexed calendar month to its three-letter English name.
pub fn month_name(month: i32) -> Option<&'static str> {
    let idx = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(idx).copied()
}

/// Buckets arrive grouped by month of creation across all years, so e.g. March 2024 and
/// March 2025 share one bucket.
pub fn label_months(buckets: Vec<MonthBucket>) -> Vec<MonthlySales> {
    buckets
        .into_iter()
        .filter_map(|b| {
            month_name(b.month).map(|month| MonthlySales {
                month: month.to_string(),
                sales: b.sales,
                revenue: b.revenue,
            })
        })
        .collect()
}

fn alias(name: &str) -> SimpleExpr {
    Expr::col(Alias::new(name)).into()
}

pub async fn dashboard_stats(state: &AppState) -> AppResult<ApiResponse<DashboardStats>> {
    let db = state.db();

    let category_stats = Products::find()
        .select_only()
        .column(Column::Category)
        .column_as(Expr::col(Column::Id).count(), "count")
        .column_as(Expr::col(Column::Stock).sum(), "total_stock")
        .group_by(Column::Category)
        .order_by(alias("count"), Order::Desc)
        .into_model::<CategoryStat>()
        .all(db);

    let sales_stats = Products::find()
        .select_only()
        .column(Column::Category)
        .column_as(Expr::col(Column::Sales).sum(), "total_sales")
        .column_as(Expr::cust("COALESCE(SUM(sales * price), 0)"), "total_revenue")
        .group_by(Column::Category)
        .order_by(alias("total_sales"), Order::Desc)
        .into_model::<CategorySales>()
        .all(db);

    let stock_value = Products::find()
        .select_only()
        .column_as(Expr::cust("COALESCE(SUM(stock * price), 0)"), "total")
        .into_tuple::<f64>()
        .one(db);

    let sales_value = Products::find()
        .select_only()
        .column_as(Expr::cust("COALESCE(SUM(sales * price), 0)"), "total")
        .into_tuple::<f64>()
        .one(db);

    let monthly = Products::find()
        .select_only()
        .column_as(
            Expr::cust("CAST(EXTRACT(MONTH FROM created_at) AS INTEGER)"),
            "month",
        )
        .column_as(Expr::col(Column::Sales).sum(), "sales")
        .column_as(Expr::cust("COALESCE(SUM(sales * price), 0)"), "revenue")
        .group_by(alias("month"))
        .order_by(alias("month"), Order::Asc)
        .into_model::<MonthBucket>()
        .all(db);

    let (
        total_products,
        active_products,
        low_stock_products,
        out_of_stock_products,
        category_stats,
        sales_stats,
        recent_products,
        top_selling_products,
        stock_value,
        sales_value,
        monthly,
    ) = tokio::try_join!(
        Products::find().count(db),
        Products::find()
            .filter(Column::Status.eq(ProductStatus::Active))
            .count(db),
        Products::find()
            .filter(Column::Stock.gt(0))
            .filter(Column::Stock.lte(LOW_STOCK_THRESHOLD))
            .count(db),
        Products::find().filter(Column::Stock.eq(0)).count(db),
        category_stats,
        sales_stats,
        Products::find()
            .order_by_desc(Column::CreatedAt)
            .limit(LIST_SIZE)
            .all(db),
        Products::find()
            .filter(Column::Sales.gt(0))
            .order_by_desc(Column::Sales)
            .limit(LIST_SIZE)
            .all(db),
        stock_value,
        sales_value,
        monthly,
    )?;

    let stats = DashboardStats {
        overview: Overview {
            total_products,
            active_products,
            low_stock_products,
            out_of_stock_products,
            total_stock_value: stock_value.unwrap_or_default(),
            total_sales_value: sales_value.unwrap_or_default(),
        },
        category_stats,
        sales_stats,
        monthly_sales: label_months(monthly),
        recent_products: recent_products.into_iter().map(Product::from).collect(),
        top_selling_products: top_selling_products.into_iter().map(Product::from).collect(),
    };

    Ok(ApiResponse::success("Dashboard", stats, Some(Meta::empty())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn months_are_one_indexed() {
        assert_eq!(month_name(1), Some("Jan"));
        assert_eq!(month_name(12), Some("Dec"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
        assert_eq!(month_name(-3), None);
    }

    #[test]
    fn labels_buckets_in_order() {
        let labelled = label_months(vec![
            MonthBucket {
                month: 2,
                sales: 4,
                revenue: 40.0,
            },
            MonthBucket {
                month: 11,
                sales: 1,
                revenue: 9.5,
            },
        ]);
        assert_eq!(
            labelled,
            vec![
                MonthlySales {
                    month: "Feb".into(),
                    sales: 4,
                    revenue: 40.0,
                },
                MonthlySales {
                    month: "Nov".into(),
                    sales: 1,
                    revenue: 9.5,
                },
            ]
        );
    }
}
