//! Extractors for callers verified by the upstream identity service.

use atelier_core::domain::user::Identity;
use atelier_core::errors::ApplicationError;
use atelier_core::identity::IdentityError;
use axum::{extract::FromRequestParts, http::header, http::request::Parts};

use super::{ApiError, AppState};

pub const ADMIN_REQUIRED_MESSAGE: &str = "Admin access required";

/// Any caller with a valid identity assertion.
#[derive(Clone, Copy, Debug)]
pub struct CurrentUser(pub Identity);

/// A caller whose verified role is `admin`.
#[derive(Clone, Copy, Debug)]
pub struct AdminUser(pub Identity);

fn bearer_token(parts: &Parts) -> Result<&str, IdentityError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(IdentityError::Missing)?
        .to_str()
        .map_err(|_| IdentityError::Malformed)?;
    let (scheme, token) = value.trim().split_once(' ').ok_or(IdentityError::Malformed)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(IdentityError::Malformed);
    }
    Ok(token)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity = bearer_token(parts)
            .and_then(|token| state.verifier.verify_now(token))
            .map_err(ApplicationError::from)?;
        Ok(Self(identity))
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(identity) = CurrentUser::from_request_parts(parts, state).await?;
        if !identity.is_admin() {
            return Err(ApplicationError::Forbidden(ADMIN_REQUIRED_MESSAGE.to_string()).into());
        }
        Ok(Self(identity))
    }
}
