//! Request payload schemas.
//!
//! Every schema walks all of its fields and reports each failure.

use serde::Serialize;
use utoipa::ToSchema;
use validator::{ValidateEmail, ValidateUrl};

use crate::{
    dto::{
        auth::{LoginInput, LoginRequest, NewAdmin, RegisterAdminRequest},
        products::{NewProduct, ProductPatch, ProductRequest},
    },
    entity::{
        enums::{Category, ProductStatus, Role, allowed_values, parse_enum},
        products::ProductImage,
    },
};

const REQUIRED: &str = "Required";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

/// A payload shape that can be checked and turned into its validated form.
pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, ValidationErrors>;
}

pub fn validate<V: Validate>(payload: V) -> Result<V::Output, ValidationErrors> {
    payload.validate()
}

impl Validate for LoginRequest {
    type Output = LoginInput;

    fn validate(self) -> Result<LoginInput, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let email = required(&mut errors, "email", self.email).map(|e| normalize_email(&e));
        let password = required(&mut errors, "password", self.password);

        if let Some(email) = &email {
            check_email(&mut errors, "email", email);
        }
        if let Some(password) = &password {
            check_len(&mut errors, "password", password, 6, None, "Password must be at least 6 characters");
        }

        errors.finish(|| LoginInput {
            email: email.unwrap_or_default(),
            password: password.unwrap_or_default(),
        })
    }
}

impl Validate for RegisterAdminRequest {
    type Output = NewAdmin;

    fn validate(self) -> Result<NewAdmin, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let name = required(&mut errors, "name", self.name).map(|n| n.trim().to_string());
        let email = required(&mut errors, "email", self.email).map(|e| normalize_email(&e));
        let password = required(&mut errors, "password", self.password);
        let confirm = required(&mut errors, "confirmPassword", self.confirm_password);
        let role = required(&mut errors, "role", self.role);

        if let Some(name) = &name {
            check_len(&mut errors, "name", name, 2, None, "Name must be at least 2 characters");
        }
        if let Some(email) = &email {
            check_email(&mut errors, "email", email);
        }
        if let Some(password) = &password {
            check_len(&mut errors, "password", password, 6, None, "Password must be at least 6 characters");
        }
        let role = role.and_then(|raw| check_enum::<Role>(&mut errors, "role", &raw));
        if let (Some(password), Some(confirm)) = (&password, &confirm)
            && password != confirm
        {
            errors.add("confirmPassword", "Passwords do not match");
        }

        errors.finish(|| NewAdmin {
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            password: password.unwrap_or_default(),
            role: role.unwrap_or(Role::Admin),
        })
    }
}

/// Full product shape, used on create.
impl Validate for ProductRequest {
    type Output = NewProduct;

    fn validate(self) -> Result<NewProduct, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let name = required(&mut errors, "name", self.name);
        let description = required(&mut errors, "description", self.description);
        let category = required(&mut errors, "category", self.category);
        let price = required(&mut errors, "price", self.price);
        let stock = required(&mut errors, "stock", self.stock);
        let sku = required(&mut errors, "sku", self.sku);
        let status = required(&mut errors, "status", self.status);

        let present = ProductRequest {
            name,
            description,
            category,
            price,
            stock,
            sku,
            status,
            images: self.images,
        };
        let patch = check_product_fields(&mut errors, present);

        errors.finish(|| NewProduct {
            name: patch.name.unwrap_or_default(),
            description: patch.description.unwrap_or_default(),
            category: patch.category.unwrap_or(Category::Other),
            price: patch.price.unwrap_or_default(),
            stock: patch.stock.unwrap_or_default(),
            sku: patch.sku.unwrap_or_default(),
            status: patch.status.unwrap_or_default(),
            images: patch.images.unwrap_or_default(),
        })
    }
}

/// Partial product shape, used on update: only present fields are checked.
pub struct PartialProduct(pub ProductRequest);

impl Validate for PartialProduct {
    type Output = ProductPatch;

    fn validate(self) -> Result<ProductPatch, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let patch = check_product_fields(&mut errors, self.0);
        errors.finish(|| patch)
    }
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Uppercases and trims a SKU; this is the only form ever stored or compared.
pub fn normalize_sku(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Lengths are checked on the trimmed name and normalized SKU, the forms that get stored.
fn check_product_fields(errors: &mut ValidationErrors, req: ProductRequest) -> ProductPatch {
    let name = req.name.map(|n| n.trim().to_string());
    let sku = req.sku.as_deref().map(normalize_sku);

    if let Some(name) = &name {
        check_len(errors, "name", name, 3, Some(200), "Name must be between 3 and 200 characters");
    }
    if let Some(description) = &req.description {
        check_len(
            errors,
            "description",
            description,
            10,
            Some(2000),
            "Description must be between 10 and 2000 characters",
        );
    }
    let category = req
        .category
        .and_then(|raw| check_enum::<Category>(errors, "category", &raw));
    if let Some(price) = req.price
        && !(price.is_finite() && price >= 0.01)
    {
        errors.add("price", "Price must be greater than 0");
    }
    let stock = req.stock.and_then(|stock| {
        if stock.fract() != 0.0 || !stock.is_finite() {
            errors.add("stock", "Stock must be an integer");
            None
        } else if stock < 0.0 {
            errors.add("stock", "Stock cannot be negative");
            None
        } else if stock > f64::from(i32::MAX) {
            errors.add("stock", "Stock is too large");
            None
        } else {
            Some(stock as i32)
        }
    });
    if let Some(sku) = &sku {
        check_len(errors, "sku", sku, 3, Some(50), "SKU must be between 3 and 50 characters");
    }
    let status = req
        .status
        .and_then(|raw| check_enum::<ProductStatus>(errors, "status", &raw));
    if let Some(images) = &req.images {
        for (idx, image) in images.iter().enumerate() {
            check_image(errors, idx, image);
        }
    }

    ProductPatch {
        name,
        description: req.description,
        category,
        price: req.price,
        stock,
        sku,
        status,
        images: req.images,
    }
}

fn required<T>(errors: &mut ValidationErrors, field: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        errors.add(field, REQUIRED);
    }
    value
}

fn check_len(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    min: usize,
    max: Option<usize>,
    message: &str,
) {
    let len = value.chars().count();
    if len < min || max.is_some_and(|max| len > max) {
        errors.add(field, message);
    }
}

fn check_email(errors: &mut ValidationErrors, field: &str, value: &str) {
    if !value.validate_email() {
        errors.add(field, "Invalid email address");
    }
}

fn check_enum<E>(errors: &mut ValidationErrors, field: &str, raw: &str) -> Option<E>
where
    E: sea_orm::ActiveEnum<Value = String>,
{
    let parsed = parse_enum::<E>(raw);
    if parsed.is_none() {
        errors.add(
            field,
            format!("Invalid value, expected one of: {}", allowed_values::<E>()),
        );
    }
    parsed
}

fn check_image(errors: &mut ValidationErrors, idx: usize, image: &ProductImage) {
    if !image.url.validate_url() {
        errors.add(&format!("images.{idx}.url"), "Invalid url");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_request() -> ProductRequest {
        ProductRequest {
            name: Some("Wireless Mouse".into()),
            description: Some("Ergonomic mouse with silent clicks".into()),
            category: Some("Electronics".into()),
            price: Some(19.99),
            stock: Some(25.0),
            sku: Some(" wm-001 ".into()),
            status: Some("active".into()),
            images: None,
        }
    }

    #[test]
    fn login_reports_every_failing_field() {
        let errors = validate(LoginRequest {
            email: Some("not-an-email".into()),
            password: Some("123".into()),
        })
        .unwrap_err();
        assert_eq!(errors.fields(), vec!["email", "password"]);
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = validate(LoginRequest::default()).unwrap_err();
        assert_eq!(errors.fields(), vec!["email", "password"]);
    }

    #[test]
    fn register_rejects_mismatched_confirmation() {
        let errors = validate(RegisterAdminRequest {
            name: Some("Jo".into()),
            email: Some("jo@demo.com".into()),
            password: Some("secret1".into()),
            confirm_password: Some("secret2".into()),
            role: Some("admin".into()),
        })
        .unwrap_err();
        assert_eq!(errors.fields(), vec!["confirmPassword"]);
    }

    #[test]
    fn register_rejects_unknown_role() {
        let errors = validate(RegisterAdminRequest {
            name: Some("Jo".into()),
            email: Some("jo@demo.com".into()),
            password: Some("secret1".into()),
            confirm_password: Some("secret1".into()),
            role: Some("owner".into()),
        })
        .unwrap_err();
        assert_eq!(errors.fields(), vec!["role"]);
    }

    #[test]
    fn register_accepts_valid_payload() {
        let admin = validate(RegisterAdminRequest {
            name: Some("Jo".into()),
            email: Some("jo@demo.com".into()),
            password: Some("secret1".into()),
            confirm_password: Some("secret1".into()),
            role: Some("superadmin".into()),
        })
        .unwrap();
        assert_eq!(admin.role, Role::Superadmin);
        assert_eq!(admin.email, "jo@demo.com");
    }

    #[test]
    fn product_with_zero_price_is_rejected() {
        let mut req = product_request();
        req.price = Some(0.0);
        let errors = validate(req).unwrap_err();
        assert_eq!(errors.fields(), vec!["price"]);
    }

    #[test]
    fn product_normalizes_sku_and_parses_enums() {
        let product = validate(product_request()).unwrap();
        assert_eq!(product.sku, "WM-001");
        assert_eq!(product.category, Category::Electronics);
        assert_eq!(product.status, ProductStatus::Active);
        assert_eq!(product.stock, 25);
        assert!(product.images.is_empty());
    }

    #[test]
    fn product_collects_all_errors() {
        let errors = validate(ProductRequest {
            name: Some("ab".into()),
            description: Some("short".into()),
            category: Some("Garden".into()),
            price: Some(-1.0),
            stock: Some(2.5),
            sku: Some("x".into()),
            status: Some("archived".into()),
            images: Some(vec![ProductImage {
                url: "not a url".into(),
                public_id: "p".into(),
            }]),
        })
        .unwrap_err();
        assert_eq!(
            errors.fields(),
            vec![
                "name",
                "description",
                "category",
                "price",
                "stock",
                "sku",
                "status",
                "images.0.url"
            ]
        );
    }

    #[test]
    fn product_missing_fields_are_required() {
        let errors = validate(ProductRequest::default()).unwrap_err();
        assert_eq!(
            errors.fields(),
            vec!["name", "description", "category", "price", "stock", "sku", "status"]
        );
    }

    #[test]
    fn home_and_garden_category_is_accepted() {
        let mut req = product_request();
        req.category = Some("Home & Garden".into());
        assert_eq!(validate(req).unwrap().category, Category::HomeAndGarden);
    }

    #[test]
    fn partial_product_only_checks_present_fields() {
        let patch = validate(PartialProduct(ProductRequest {
            stock: Some(0.0),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(patch.stock, Some(0));
        assert_eq!(patch.name, None);

        let errors = validate(PartialProduct(ProductRequest {
            price: Some(0.0),
            ..Default::default()
        }))
        .unwrap_err();
        assert_eq!(errors.fields(), vec!["price"]);
    }

    #[test]
    fn email_is_checked_after_trimming() {
        let login = validate(LoginRequest {
            email: Some("  Admin@Demo.com ".into()),
            password: Some("admin123".into()),
        })
        .unwrap();
        assert_eq!(login.email, "admin@demo.com");

        for bad in ["@demo.com", "a b@demo.com", "a@@demo.com", "admin"] {
            let errors = validate(LoginRequest {
                email: Some(bad.into()),
                password: Some("admin123".into()),
            })
            .unwrap_err();
            assert_eq!(errors.fields(), vec!["email"], "{bad}");
        }
    }

    #[test]
    fn blank_padding_does_not_satisfy_length_rules() {
        let mut req = product_request();
        req.name = Some("  ab  ".into());
        req.sku = Some("     ".into());
        let errors = validate(req).unwrap_err();
        assert_eq!(errors.fields(), vec!["name", "sku"]);

        let errors = validate(PartialProduct(ProductRequest {
            sku: Some("  x ".into()),
            ..Default::default()
        }))
        .unwrap_err();
        assert_eq!(errors.fields(), vec!["sku"]);
    }

    #[test]
    fn register_name_is_trimmed_before_length_check() {
        let errors = validate(RegisterAdminRequest {
            name: Some(" J ".into()),
            email: Some("jo@demo.com".into()),
            password: Some("secret1".into()),
            confirm_password: Some("secret1".into()),
            role: Some("admin".into()),
        })
        .unwrap_err();
        assert_eq!(errors.fields(), vec!["name"]);
    }

    #[test]
    fn image_urls_must_be_absolute() {
        let mut req = product_request();
        req.images = Some(vec![
            ProductImage {
                url: "https://res.cloudinary.com/demo/a.jpg".into(),
                public_id: "a".into(),
            },
            ProductImage {
                url: "/relative/b.jpg".into(),
                public_id: "b".into(),
            },
        ]);
        let errors = validate(req).unwrap_err();
        assert_eq!(errors.fields(), vec!["images.1.url"]);
    }
}
