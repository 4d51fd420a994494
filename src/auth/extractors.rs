use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use tracing::warn;

use super::claims::Claims;
use crate::config::SessionConfig;
use crate::state::AppState;

/// Signed-in user as seen by the core: subject plus display-only profile.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
            avatar_url: claims.picture,
        }
    }
}

pub(crate) fn verify_session_token(
    token: &str,
    config: &SessionConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_audience(std::slice::from_ref(&config.audience));
    validation.set_issuer(std::slice::from_ref(&config.issuer));
    let decoding = DecodingKey::from_secret(config.secret.as_bytes());
    Ok(decode::<Claims>(token, &decoding, &validation)?.claims)
}

/// Extracts and validates the provider session token, yielding the user.
pub struct AuthUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Read Authorization header
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "missing Authorization header".into(),
            ))?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or((StatusCode::UNAUTHORIZED, "invalid auth scheme".into()))?;

        let claims = verify_session_token(token, &state.config.session).map_err(|_| {
            warn!("invalid or expired session token");
            (
                StatusCode::UNAUTHORIZED,
                "invalid or expired token".to_string(),
            )
        })?;

        Ok(AuthUser(claims.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::OffsetDateTime;

    fn session_config(secret: &str) -> SessionConfig {
        SessionConfig {
            secret: secret.into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
        }
    }

    // Plays the identity provider: signs a token with the shared secret.
    fn provider_token(config: &SessionConfig, name: Option<&str>) -> String {
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let claims = Claims {
            sub: "user_2x9yz".into(),
            iat: now,
            exp: now + 300,
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
            name: name.map(str::to_string),
            email: Some("jo@example.com".into()),
            picture: None,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("sign token")
    }

    #[test]
    fn verify_accepts_a_provider_signed_token() {
        let config = session_config("dev-secret");
        let token = provider_token(&config, Some("Jo"));
        let claims = verify_session_token(&token, &config).expect("verify");
        assert_eq!(claims.sub, "user_2x9yz");
        let user = SessionUser::from(claims);
        assert_eq!(user.name.as_deref(), Some("Jo"));
        assert_eq!(user.email.as_deref(), Some("jo@example.com"));
        assert!(user.avatar_url.is_none());
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let good = session_config("dev-secret");
        let bad = session_config("other-secret");
        let token = provider_token(&good, None);
        assert!(verify_session_token(&token, &bad).is_err());
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let config = session_config("dev-secret");
        let token = provider_token(&config, None);
        let mut other = session_config("dev-secret");
        other.issuer = "someone-else".into();
        assert!(verify_session_token(&token, &other).is_err());
    }

    #[test]
    fn profile_claims_are_optional() {
        let config = session_config("dev-secret");
        let token = provider_token(&config, None);
        let claims = verify_session_token(&token, &config).expect("verify");
        assert!(claims.name.is_none());
    }
}
