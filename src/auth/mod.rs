//! Token issuance, password hashing and role checks.
//!
//! Tokens are HS256 JWTs carrying the numeric user id, username and role.
//! Passwords are stored as Argon2id PHC strings; the plaintext is never
//! persisted or logged.

pub mod middleware;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use model::entities::user::{self, Role};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ApiError;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Signing secret (should be at least 32 bytes)
    pub secret: String,
    /// Access token lifetime in minutes
    pub expiration_minutes: i64,
    /// Refresh token lifetime in minutes
    pub refresh_expiration_minutes: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            #[cfg(debug_assertions)]
            {
                tracing::warn!("JWT_SECRET not set! Using insecure default key. DO NOT USE IN PRODUCTION!");
                "dev-secret-key-change-in-production-min-32-chars-long".to_string()
            }
            #[cfg(not(debug_assertions))]
            {
                panic!("FATAL: JWT_SECRET environment variable is not set!");
            }
        });

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 24 hours default
            refresh_expiration_minutes: std::env::var("JWT_REFRESH_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10_080), // 7 days default
        }
    }
}

pub const ACCESS_TOKEN: &str = "access";
pub const REFRESH_TOKEN: &str = "refresh";

fn default_token_type() -> String {
    ACCESS_TOKEN.to_string()
}

/// Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: i32,
    /// Username
    pub username: String,
    /// Role name
    pub role: String,
    /// "access" or "refresh"
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT token service
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiration_minutes", &self.config.expiration_minutes)
            .finish()
    }
}

impl JwtService {
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    pub fn with_config(config: JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            config,
        }
    }

    fn generate(&self, user: &user::Model, token_type: &str, minutes: i64) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(minutes);

        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role.as_str().to_string(),
            token_type: token_type.to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Generate an access token for an authenticated user
    pub fn generate_token(&self, user: &user::Model) -> Result<String, JwtError> {
        self.generate(user, ACCESS_TOKEN, self.config.expiration_minutes)
    }

    /// Generate the longer-lived refresh token
    pub fn generate_refresh_token(&self, user: &user::Model) -> Result<String, JwtError> {
        self.generate(user, REFRESH_TOKEN, self.config.refresh_expiration_minutes)
    }

    fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                _ => JwtError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }

    /// Validate an access token. Refresh tokens cannot authorize requests.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.decode(token)?;
        if claims.token_type != ACCESS_TOKEN {
            return Err(JwtError::InvalidToken(
                "refresh token used as access token".to_string(),
            ));
        }
        Ok(claims)
    }

    /// Validate a refresh token for the token-exchange endpoint.
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.decode(token)?;
        if claims.token_type != REFRESH_TOKEN {
            return Err(JwtError::InvalidToken("not a refresh token".to_string()));
        }
        Ok(claims)
    }

    /// Extract token from an Authorization header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// Authenticated caller, injected into request extensions by the auth
/// middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let role = claims
            .role
            .parse::<Role>()
            .map_err(JwtError::InvalidToken)?;
        Ok(Self {
            id: claims.sub,
            username: claims.username,
            role,
        })
    }
}

/// Reject callers whose role is not in the allow-list.
pub fn require_role(user: &CurrentUser, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Insufficient role for this operation".to_string(),
        ))
    }
}

/// Hash a password into an Argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// Verify a password against a stored PHC string. Malformed hashes verify
/// as false rather than erroring, so login failure stays uniform.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Minimum length plus one uppercase, lowercase, digit and special character.
pub fn validate_password_strength(password: &str) -> Result<(), ApiError> {
    if password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ApiError::Validation(
            "Password must contain an uppercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ApiError::Validation(
            "Password must contain a lowercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ApiError::Validation(
            "Password must contain a digit".to_string(),
        ));
    }
    if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ApiError::Validation(
            "Password must contain a special character".to_string(),
        ));
    }
    Ok(())
}

/// Lightweight email shape check; exhaustive RFC validation is not the goal.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user(role: Role) -> user::Model {
        user::Model {
            id: 7,
            username: "hr.officer".to_string(),
            email: "hr@agency.gov.ph".to_string(),
            password_hash: String::new(),
            role,
            status: user::UserStatus::Active,
            profile_picture: None,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn token_roundtrip_preserves_identity() {
        let service = JwtService::with_config(JwtConfig {
            secret: "test-secret-key-that-is-long-enough".to_string(),
            expiration_minutes: 60,
            refresh_expiration_minutes: 120,
        });
        let token = service.generate_token(&test_user(Role::Hr)).unwrap();
        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "hr.officer");
        assert_eq!(claims.role, "HR");

        let current = CurrentUser::try_from(claims).unwrap();
        assert_eq!(current.role, Role::Hr);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = JwtService::with_config(JwtConfig {
            secret: "test-secret-key-that-is-long-enough".to_string(),
            expiration_minutes: 60,
            refresh_expiration_minutes: 120,
        });
        let other = JwtService::with_config(JwtConfig {
            secret: "a-completely-different-secret-key-here".to_string(),
            expiration_minutes: 60,
            refresh_expiration_minutes: 120,
        });
        let token = service.generate_token(&test_user(Role::Admin)).unwrap();
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn refresh_token_cannot_authorize_requests() {
        let service = JwtService::with_config(JwtConfig {
            secret: "test-secret-key-that-is-long-enough".to_string(),
            expiration_minutes: 60,
            refresh_expiration_minutes: 120,
        });
        let access = service.generate_token(&test_user(Role::Employee)).unwrap();
        let refresh = service
            .generate_refresh_token(&test_user(Role::Employee))
            .unwrap();

        assert!(service.validate_token(&access).is_ok());
        assert!(service.validate_token(&refresh).is_err());
        assert!(service.validate_refresh_token(&refresh).is_ok());
        assert!(service.validate_refresh_token(&access).is_err());
    }

    #[test]
    fn password_hash_verifies_and_rejects() {
        let hash = hash_password("Str0ng!pass").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Str0ng!pass", &hash));
        assert!(!verify_password("wrong-password", &hash));
        assert!(!verify_password("Str0ng!pass", "not-a-phc-string"));
    }

    #[test]
    fn password_strength_rules() {
        assert!(validate_password_strength("Str0ng!pass").is_ok());
        assert!(validate_password_strength("short1!A").is_ok());
        assert!(validate_password_strength("weak").is_err());
        assert!(validate_password_strength("alllowercase1!").is_err());
        assert!(validate_password_strength("ALLUPPERCASE1!").is_err());
        assert!(validate_password_strength("NoDigits!!").is_err());
        assert!(validate_password_strength("NoSpecial123").is_err());
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("juan@agency.gov.ph"));
        assert!(!is_valid_email("juan"));
        assert!(!is_valid_email("@agency.gov.ph"));
        assert!(!is_valid_email("juan@nodot"));
    }

    #[test]
    fn role_allow_list() {
        let hr = CurrentUser {
            id: 1,
            username: "hr".to_string(),
            role: Role::Hr,
        };
        assert!(require_role(&hr, &[Role::Admin, Role::Hr]).is_ok());
        assert!(require_role(&hr, &[Role::Admin]).is_err());
    }
}
