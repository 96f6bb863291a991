use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{AdminList, LoginRequest, LoginResponse, MeResponse, RegisterAdminRequest, SessionUser},
        dashboard::{CategorySales, CategoryStat, DashboardStats, MonthlySales, Overview},
        products::{ProductEnvelope, ProductList, ProductRequest},
        upload::{UploadForm, UploadedImage},
    },
    entity::{
        enums::{Category, ProductStatus, Role},
        products::ProductImage,
    },
    middleware::auth::AuthUser,
    models::{Product, User},
    response::Meta,
    routes::{auth, dashboard, health, products as product_routes, upload},
    token::AUTH_COOKIE,
    validation::FieldError,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "cookie_auth",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(AUTH_COOKIE))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::logout,
        auth::me,
        auth::register,
        auth::list_admins,
        auth::delete_admin,
        product_routes::list_products,
        product_routes::get_product,
        product_routes::create_product,
        product_routes::update_product,
        product_routes::delete_product,
        upload::upload_image,
        dashboard::dashboard_stats
    ),
    components(
        schemas(
            User,
            Product,
            ProductImage,
            Role,
            Category,
            ProductStatus,
            AuthUser,
            SessionUser,
            LoginRequest,
            LoginResponse,
            MeResponse,
            RegisterAdminRequest,
            AdminList,
            ProductRequest,
            ProductList,
            ProductEnvelope,
            UploadForm,
            UploadedImage,
            Overview,
            CategoryStat,
            CategorySales,
            MonthlySales,
            DashboardStats,
            FieldError,
            Meta
        )
    ),
    security(
        ("cookie_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Session endpoints"),
        (name = "Admins", description = "Admin account management, superadmin only"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Upload", description = "Product image upload"),
        (name = "Dashboard", description = "Catalog statistics"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
