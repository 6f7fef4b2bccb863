use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to verify authorization token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("access has been revoked for this account")]
    AccessRevoked,
    #[error("insufficient permissions for this action")]
    Forbidden,
}
