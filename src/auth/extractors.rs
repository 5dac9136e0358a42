use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::{claims::Principal, jwt::TokenError};
use crate::{error::AppError, state::AppState};

/// Extracts and validates the bearer token, yielding the request principal.
pub struct AuthUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .map(|h| h.to_str().map_err(|_| TokenError::Malformed))
            .transpose()?;

        let principal = state.auth.authorize(header).await?;
        Ok(AuthUser(principal))
    }
}

/// Expect "Bearer <token>"; the scheme is case-insensitive.
pub(crate) fn bearer_token(header: Option<&str>) -> Result<&str, TokenError> {
    let header = header.ok_or(TokenError::Missing)?;
    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(TokenError::Malformed),
    }
}
