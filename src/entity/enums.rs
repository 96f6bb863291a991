use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "superadmin")]
    Superadmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Category {
    #[sea_orm(string_value = "Electronics")]
    Electronics,
    #[sea_orm(string_value = "Clothing")]
    Clothing,
    #[sea_orm(string_value = "Books")]
    Books,
    #[sea_orm(string_value = "Home & Garden")]
    #[serde(rename = "Home & Garden")]
    HomeAndGarden,
    #[sea_orm(string_value = "Sports")]
    Sports,
    #[sea_orm(string_value = "Toys")]
    Toys,
    #[sea_orm(string_value = "Other")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[default]
    #[sea_orm(string_value = "draft")]
    Draft,
}

/// Parses the stored string form of an enum column, e.g. `"Home & Garden"`.
pub fn parse_enum<E: ActiveEnum<Value = String>>(raw: &str) -> Option<E> {
    E::try_from_value(&raw.to_owned()).ok()
}

/// Every accepted stored value, comma separated, for error messages.
pub fn allowed_values<E: ActiveEnum<Value = String>>() -> String {
    E::values().join(", ")
}
