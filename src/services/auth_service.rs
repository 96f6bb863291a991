use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::{
    dto::auth::{LoginRequest, SessionUser},
    entity::users::{Column, Entity as Users},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    state::AppState,
    validation::validate,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// A freshly issued session: the token goes into the cookie, the user into the body.
#[derive(Debug)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Unknown email and wrong password fail identically so callers cannot probe for accounts.
pub async fn login(state: &AppState, payload: LoginRequest) -> AppResult<Session> {
    let input = validate(payload)?;

    let user = Users::find()
        .filter(Column::Email.eq(input.email.as_str()))
        .one(state.db())
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into())),
    };

    if !verify_password(&input.password, &user.password_hash)? {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let principal = AuthUser {
        user_id: user.id,
        email: user.email.clone(),
        role: user.role,
    };
    let token = state.tokens.issue(&principal)?;

    tracing::info!(user_id = %user.id, role = ?user.role, "admin logged in");

    Ok(Session {
        token,
        user: User::from(user).into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("admin123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("admin123", &hash).unwrap());
        assert!(!verify_password("admin124", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_internal_error() {
        let err = verify_password("admin123", "plain-text").unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
