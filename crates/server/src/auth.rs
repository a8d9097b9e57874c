use crate::error::ApiError;
use models::role::{Caller, Role};
use sea_orm::prelude::Uuid;
use serde::Deserialize;

/// JWT claims this service consumes. Signature and issuer are validated by
/// the resource-server layer before any handler runs.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    pub sub: Option<String>,
    pub role: Option<String>,
}

/// Resolves validated claims into a caller capability value. This is the
/// only place a raw role string is ever interpreted.
pub fn resolve_caller(claims: &Claims) -> Result<Caller, ApiError> {
    let sub = claims.sub.as_ref().ok_or(ApiError::Unauthorized)?;
    let id = Uuid::parse_str(sub).map_err(|_| ApiError::Unauthorized)?;
    let role = claims
        .role
        .as_ref()
        .and_then(|raw| raw.parse::<Role>().ok())
        .ok_or(ApiError::Unauthorized)?;

    Ok(Caller::new(id, role))
}
