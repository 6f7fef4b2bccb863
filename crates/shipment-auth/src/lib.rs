//! Token verification, role/scope model, and the per-endpoint permission
//! matrix. The database lookup that augments a verified token into full
//! `Claims` lives in `shipment-store`/`shipment-api`; this crate only
//! defines the shapes and the pure decisions.

pub mod claims;
pub mod error;
pub mod permissions;
pub mod scope;
pub mod super_admin;

pub use claims::{augment, verify_token, Claims, RawClaims};
pub use error::AuthError;
pub use permissions::{allowed, Action};
pub use scope::{can_access_company, effective_company_scope};
pub use super_admin::is_super_admin;

/// The access-revocation gate: `false` means the account's access has
/// been revoked regardless of an otherwise-valid token and role.
pub fn check_access_gate(claims: &Claims) -> Result<(), AuthError> {
    if claims.access_granted {
        Ok(())
    } else {
        Err(AuthError::AccessRevoked)
    }
}

pub fn require(claims: &Claims, action: Action) -> Result<(), AuthError> {
    check_access_gate(claims)?;
    if allowed(claims, action) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}
