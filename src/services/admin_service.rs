use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use uuid::Uuid;

use crate::{
    dto::auth::{AdminList, RegisterAdminRequest, SessionUser},
    entity::users::{ActiveModel, Column, Entity as Users},
    error::{AppError, AppResult, unique_conflict},
    middleware::auth::{AuthUser, ensure_superadmin},
    models::User,
    response::{ApiResponse, Meta},
    services::auth_service::hash_password,
    state::AppState,
    validation::validate,
};

const DUPLICATE_EMAIL: &str = "User with this email already exists";

pub async fn register_admin(
    state: &AppState,
    user: &AuthUser,
    payload: RegisterAdminRequest,
) -> AppResult<ApiResponse<SessionUser>> {
    ensure_superadmin(user)?;
    let input = validate(payload)?;

    let exists = Users::find()
        .filter(Column::Email.eq(input.email.as_str()))
        .one(state.db())
        .await?;
    if exists.is_some() {
        return Err(AppError::Conflict(DUPLICATE_EMAIL.into()));
    }

    let password_hash = hash_password(&input.password)?;
    let now = Utc::now();
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        email: Set(input.email),
        password_hash: Set(password_hash),
        role: Set(input.role),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    let created = active
        .insert(state.db())
        .await
        .map_err(|err| unique_conflict(err, DUPLICATE_EMAIL))?;

    tracing::info!(
        created_by = %user.user_id,
        user_id = %created.id,
        role = ?created.role,
        "admin registered"
    );

    Ok(ApiResponse::success(
        "Admin created successfully",
        User::from(created).into(),
        Some(Meta::empty()),
    ))
}

/// Newest first; the password hash is never selected.
pub async fn list_admins(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<AdminList>> {
    ensure_superadmin(user)?;

    let admins = Users::find()
        .select_only()
        .columns([
            Column::Id,
            Column::Name,
            Column::Email,
            Column::Role,
            Column::CreatedAt,
            Column::UpdatedAt,
        ])
        .order_by_desc(Column::CreatedAt)
        .into_model::<User>()
        .all(state.db())
        .await?;

    Ok(ApiResponse::success(
        "Admins",
        AdminList { admins },
        Some(Meta::empty()),
    ))
}

pub async fn delete_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_superadmin(user)?;

    if id == user.user_id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account.".into(),
        ));
    }

    let target = Users::find_by_id(id).one(state.db()).await?;
    if target.is_none() {
        return Err(AppError::NotFound("Admin not found".into()));
    }

    Users::delete_by_id(id).exec(state.db()).await?;

    tracing::info!(deleted_by = %user.user_id, user_id = %id, "admin deleted");

    Ok(ApiResponse::success(
        "Admin deleted successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
