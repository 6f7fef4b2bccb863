use shipment_models::UserIam;
use sqlx::PgPool;

/// Backs the claims-augmentation step of authentication: the verified
/// token only proves `uid`/`email`, this supplies role, company scope,
/// and the access-revocation gate.
pub async fn get_user_iam(pool: &PgPool, uid: &str) -> Result<Option<UserIam>, sqlx::Error> {
    sqlx::query_as(
        "SELECT uid, email, role, company_id, valid_access, name FROM user_iam WHERE uid = $1",
    )
    .bind(uid)
    .fetch_optional(pool)
    .await
}
