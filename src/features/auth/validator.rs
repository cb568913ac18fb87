use super::model::{AuthenticatedUser, Role};
use crate::core::error::AppError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: Uuid,
    username: String,
    role: Role,
    #[serde(rename = "exp")]
    _exp: u64,
}

impl JwtValidator {
    pub fn new(secret: &str, leeway: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway.as_secs();

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let claims = token_data.claims;

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            username: claims.username,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: Uuid,
        username: String,
        role: Role,
        exp: i64,
    }

    fn token(secret: &str, role: Role, exp_offset_secs: i64) -> String {
        let claims = TestClaims {
            sub: Uuid::new_v4(),
            username: "carol".to_string(),
            role,
            exp: Utc::now().timestamp() + exp_offset_secs,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn accepts_valid_token_and_decodes_role() {
        let validator = JwtValidator::new("secret", Duration::from_secs(0));
        let user = validator
            .validate_token(&token("secret", Role::Admin, 3600))
            .unwrap();
        assert_eq!(user.username, "carol");
        assert!(user.is_admin());
    }

    #[test]
    fn rejects_wrong_secret() {
        let validator = JwtValidator::new("secret", Duration::from_secs(0));
        let result = validator.validate_token(&token("other-secret", Role::User, 3600));
        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let validator = JwtValidator::new("secret", Duration::from_secs(0));
        let result = validator.validate_token(&token("secret", Role::User, -3600));
        assert!(matches!(result, Err(AppError::Auth(_))));
    }
}
