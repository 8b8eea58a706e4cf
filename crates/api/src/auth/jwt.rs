//! Session-token generation and validation.
//!
//! Session tokens are HS256-signed JWTs containing a [`Claims`] payload. The
//! identity provider that signs users in issues them with the shared secret;
//! this server only validates them and turns the claims into an
//! [`Identity`].

use govtrust_core::identity::Identity;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's id at the identity provider.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp). Not every issuer sets it.
    #[serde(default)]
    pub iat: i64,
    /// Unique token identifier, empty when the issuer omits it.
    #[serde(default)]
    pub jti: String,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Identity {
            user_id: claims.sub,
            email: claims.email,
            display_name: claims.name,
        }
    }
}

/// Configuration for session-token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in minutes (default: 60).
    pub access_token_expiry_mins: i64,
}

/// Default token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `60`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
        }
    }
}

/// Generate an HS256 session token for `identity`.
pub fn generate_access_token(
    identity: &Identity,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.access_token_expiry_mins * 60;

    let claims = Claims {
        sub: identity.user_id.clone(),
        email: identity.email.clone(),
        name: identity.display_name.clone(),
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a session token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-secret".into(),
            access_token_expiry_mins: 5,
        }
    }

    #[test]
    fn token_round_trips_identity() {
        let identity = Identity::new("user-1")
            .with_email("u1@example.com")
            .with_display_name("User One");
        let token = generate_access_token(&identity, &config()).unwrap();

        let claims = validate_token(&token, &config()).unwrap();
        assert_eq!(Identity::from(claims), identity);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token(&Identity::new("user-1"), &config()).unwrap();
        let other = JwtConfig {
            secret: "different".into(),
            access_token_expiry_mins: 5,
        };
        assert!(validate_token(&token, &other).is_err());
    }

    #[test]
    fn token_without_iat_or_jti_is_accepted() {
        let exp = chrono::Utc::now().timestamp() + 300;
        let token = encode(
            &Header::default(),
            &serde_json::json!({ "sub": "idp-user", "email": "x@example.com", "exp": exp }),
            &EncodingKey::from_secret(config().secret.as_bytes()),
        )
        .unwrap();

        let claims = validate_token(&token, &config()).unwrap();
        assert_eq!(claims.iat, 0);
        assert!(claims.jti.is_empty());
        assert_eq!(Identity::from(claims).user_id, "idp-user");
    }

    #[test]
    fn expired_token_is_rejected() {
        let expired = JwtConfig {
            secret: "unit-test-secret".into(),
            // Past the default 60s leeway.
            access_token_expiry_mins: -5,
        };
        let token = generate_access_token(&Identity::new("user-1"), &expired).unwrap();
        assert!(validate_token(&token, &config()).is_err());
    }
}
