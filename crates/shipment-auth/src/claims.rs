use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use shipment_models::{Role, UserIam};

use crate::error::AuthError;

/// What the bearer token itself carries — just enough to identify the
/// caller. Role, company scope, and the access gate are not trusted from
/// the token; they come from a database lookup keyed on `uid`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawClaims {
    pub sub: String,
    pub email: String,
    pub exp: u64,
}

/// Verifies `token` against the identity service's signing key, returning
/// the unaugmented claims on success.
pub fn verify_token(
    token: &str,
    key: &DecodingKey,
    validation: &Validation,
) -> Result<RawClaims, AuthError> {
    Ok(decode::<RawClaims>(token, key, validation)?.claims)
}

/// Fully resolved caller identity: the verified token plus the
/// database-sourced role, company scope, and access gate. Every handler
/// in `shipment-api` receives one of these, never a `RawClaims`.
#[derive(Debug, Clone)]
pub struct Claims {
    pub uid: String,
    pub email: String,
    pub role: Role,
    /// `None` for AFU staff; always `Some` for AFC users.
    pub company_id: Option<String>,
    pub access_granted: bool,
}

impl Claims {
    pub fn is_afu(&self) -> bool {
        self.role.is_afu()
    }

    pub fn is_afc(&self) -> bool {
        self.role.is_afc()
    }
}

/// Joins a verified token with its database-side `UserIam` row. A
/// missing row is treated the same as a revoked gate — the caller just
/// sees `AccessRevoked` either way, matching the legacy behavior of
/// folding "no IAM record" and "valid_access = false" into one 403.
pub fn augment(raw: RawClaims, user: Option<UserIam>) -> Result<Claims, AuthError> {
    let user = user.ok_or(AuthError::AccessRevoked)?;
    if !user.valid_access {
        return Err(AuthError::AccessRevoked);
    }
    let role: Role = user
        .role
        .parse()
        .map_err(|_| AuthError::AccessRevoked)?;
    Ok(Claims {
        uid: raw.sub,
        email: user.email,
        role,
        company_id: user.company_id,
        access_granted: user.valid_access,
    })
}
