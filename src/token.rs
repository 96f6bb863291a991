use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError, middleware::auth::AuthUser};

/// Name of the cookie carrying the session token.
pub const AUTH_COOKIE: &str = "auth-token";

pub const SESSION_DAYS: i64 = 7;

/// Signs and verifies session tokens with the server secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    pub fn issue(&self, user: &AuthUser) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(Duration::days(SESSION_DAYS))
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

        let claims = Claims {
            sub: user.user_id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: expiration.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    /// Bad signature, expiry, malformed input and a non-UUID subject all yield `None`.
    pub fn verify(&self, token: &str) -> Option<AuthUser> {
        let decoded = decode::<Claims>(token, &self.decoding, &self.validation).ok()?;
        let user_id = Uuid::parse_str(&decoded.claims.sub).ok()?;
        Some(AuthUser {
            user_id,
            email: decoded.claims.email,
            role: decoded.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::enums::Role;

    fn user() -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            email: "admin@demo.com".into(),
            role: Role::Superadmin,
        }
    }

    #[test]
    fn issued_token_verifies() {
        let keys = TokenKeys::new("test-secret");
        let user = user();
        let token = keys.issue(&user).unwrap();
        assert_eq!(keys.verify(&token), Some(user));
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let token = TokenKeys::new("one").issue(&user()).unwrap();
        assert_eq!(TokenKeys::new("two").verify(&token), None);
    }

    #[test]
    fn garbage_is_rejected() {
        let keys = TokenKeys::new("test-secret");
        assert_eq!(keys.verify(""), None);
        assert_eq!(keys.verify("not.a.jwt"), None);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = TokenKeys::new("test-secret");
        let past = Utc::now() - Duration::days(SESSION_DAYS + 1);
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "admin@demo.com".into(),
            role: Role::Admin,
            iat: past.timestamp() as usize,
            exp: (past + Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert_eq!(keys.verify(&token), None);
    }
}
