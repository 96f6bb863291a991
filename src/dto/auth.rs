use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{entity::enums::Role, middleware::auth::AuthUser, models::User};

#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAdminRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub role: Option<String>,
}

/// Login payload after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Registration payload after validation; the password is still plain text here.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: SessionUser,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: AuthUser,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminList {
    pub admins: Vec<User>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}
