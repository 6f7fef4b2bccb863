//! Bearer-token extraction and claims augmentation.
//! Every handler that needs a caller identity takes `AuthenticatedUser`
//! as an extractor argument; axum resolves it before the handler body
//! runs, expressed as a `FromRequestParts` impl so individual routes opt
//! in per-handler instead of via a blanket layer.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use shipment_auth::Claims;

use crate::error::ApiError;
use crate::state::SharedState;

pub struct AuthenticatedUser(pub Claims);

impl FromRequestParts<SharedState> for AuthenticatedUser {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let state = state.clone();
        let header = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, &state);
        async move {
            let TypedHeader(auth) = header
                .await
                .map_err(|_| ApiError::Forbidden("missing bearer token".to_string()))?;

            let raw =
                shipment_auth::verify_token(auth.token(), &state.jwt_key, &state.jwt_validation)?;
            let user = shipment_store::repo::users::get_user_iam(state.store.pool(), &raw.sub)
                .await
                .map_err(|e| ApiError::Internal(e.into()))?;
            let claims = shipment_auth::augment(raw, user)?;

            Ok(AuthenticatedUser(claims))
        }
    }
}
