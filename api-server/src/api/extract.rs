//! Request extractors shared across the API modules

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::error::AppError;

use crate::core::ServerState;

/// The organization a request operates in, taken from the
/// `x-organization-id` header.
///
/// Extraction only parses the header; membership of the acting user is
/// checked by the handlers through [`MembershipService`], which is also
/// where the 403 originates.
///
/// [`MembershipService`]: crate::tenancy::MembershipService
#[derive(Debug, Clone)]
pub struct OrgScope(pub String);

impl FromRequestParts<ServerState> for OrgScope {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-organization-id")
            .and_then(|h| h.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::validation("Missing x-organization-id header"))?;
        Ok(OrgScope(header.to_string()))
    }
}
