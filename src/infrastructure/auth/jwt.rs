use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation};
use std::fmt;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::entities::token::Claims;
use crate::entities::user::User;
use crate::errors::AuthError;
use crate::repositories::token::TokenServiceRepository;
use crate::settings::AppConfig;

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

/// Signing material derived from `jwt_secret`.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        let secret = Zeroizing::new(secret.as_bytes().to_vec());
        JwtKeys {
            encoding: EncodingKey::from_secret(&secret),
            decoding: DecodingKey::from_secret(&secret),
        }
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtKeys([REDACTED])")
    }
}

/// Issues and verifies the bearer tokens handed out at login.
#[derive(Clone, Debug)]
pub struct JwtService {
    keys: JwtKeys,
    lifetime: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from_secret(&config.jwt_secret),
            lifetime: Duration::minutes(config.jwt_expiration_minutes),
        }
    }

    pub fn create_jwt(&self, user: &User) -> Result<String, AuthError> {
        let issued_at = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: issued_at.timestamp().max(0) as usize,
            exp: (issued_at + self.lifetime).timestamp().max(0) as usize,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding)
            .map_err(|e| {
                tracing::error!("JWT encoding failed: {}", e);
                AuthError::TokenCreation
            })
    }

    /// Expiry is checked with no leeway, so a token is rejected the second it lapses.
    pub fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(decode::<Claims>(token, &self.keys.decoding, &validation)?)
    }
}

impl TokenServiceRepository for JwtService {
    fn create_jwt(&self, user: &User) -> Result<String, AuthError> {
        JwtService::create_jwt(self, user)
    }

    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        JwtService::decode_jwt(self, token)
    }
}

/// Identity of the caller behind a verified token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
}

impl TryFrom<Claims> for AuthenticatedUser {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthenticatedUser {
            id,
            username: claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{AppEnvironment, LogFormat, StorageBackend};

    fn config(secret: &str, minutes: i64) -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "Bloglist-API".into(),
            port: 0,
            host: "127.0.0.1".into(),
            worker_count: 1,
            storage: StorageBackend::Memory,
            database_url: String::new(),
            cors_allowed_origins: vec!["*".into()],
            jwt_secret: secret.into(),
            jwt_expiration_minutes: minutes,
            log_format: LogFormat::Pretty,
        }
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "mluukkai".into(),
            name: Some("Matti Luukkainen".into()),
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    const SECRET: &str = "unit_test_jwt_secret_long_enough_for_hs512";

    #[test]
    fn round_trips_the_caller_identity() {
        let service = JwtService::new(&config(SECRET, 60));
        let user = user();

        let token = service.create_jwt(&user).unwrap();
        let claims = service.decode_jwt(&token).unwrap().claims;
        let caller = AuthenticatedUser::try_from(claims).unwrap();

        assert_eq!(caller.id, user.id);
        assert_eq!(caller.username, "mluukkai");
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let service = JwtService::new(&config(SECRET, -5));
        let token = service.create_jwt(&user()).unwrap();

        assert_eq!(service.decode_jwt(&token).unwrap_err(), AuthError::TokenExpired);
    }

    #[test]
    fn token_signed_with_another_secret_is_invalid() {
        let issuer = JwtService::new(&config("another_secret_that_is_also_long_enough!!", 60));
        let verifier = JwtService::new(&config(SECRET, 60));
        let token = issuer.create_jwt(&user()).unwrap();

        assert_eq!(verifier.decode_jwt(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn garbage_is_invalid() {
        let service = JwtService::new(&config(SECRET, 60));
        assert_eq!(service.decode_jwt("not.a.jwt").unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let claims = Claims {
            sub: "5a422aa71b54a676234d17f8".into(),
            username: "root".into(),
            exp: 0,
            iat: 0,
        };
        assert_eq!(AuthenticatedUser::try_from(claims).unwrap_err(), AuthError::InvalidToken);
    }
}
