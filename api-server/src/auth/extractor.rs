//! JWT Extractor
//!
//! Custom extractor for automatically validating JWT tokens

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentActor, JwtError, JwtService};
use crate::core::ServerState;
use shared::error::AppError;

/// Use this extractor in protected handlers to validate the JWT and obtain
/// the acting user
impl FromRequestParts<ServerState> for CurrentActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Already extracted earlier in the request
        if let Some(actor) = parts.extensions.get::<CurrentActor>() {
            return Ok(actor.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        // Bearer header first, `accessToken` cookie as fallback
        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?
                .to_string(),
            None => match cookie_token(parts) {
                Some(token) => token,
                None => {
                    tracing::warn!(uri = %parts.uri, "Request without credentials");
                    return Err(AppError::unauthorized());
                }
            },
        };

        match state.jwt_service().validate_token(&token) {
            Ok(claims) => {
                let actor = CurrentActor::from(claims);
                parts.extensions.insert(actor.clone());
                Ok(actor)
            }
            Err(e) => {
                tracing::warn!(uri = %parts.uri, error = %e, "Token validation failed");
                match e {
                    JwtError::ExpiredToken => Err(AppError::token_expired()),
                    _ => Err(AppError::invalid_token("Invalid token")),
                }
            }
        }
    }
}

/// The `accessToken` cookie value, if any
fn cookie_token(parts: &Parts) -> Option<String> {
    let cookies = parts.headers.get(http::header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == "accessToken" && !value.is_empty()).then(|| value.to_string())
    })
}
