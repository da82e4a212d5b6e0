use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use subtle::ConstantTimeEq;

use crate::incoming::http_axum::error_mapper::HttpError;
use crate::shared::app_state::AppState;
use banstore_application::error::AppError;

/// Admits requests whose `Authorization: Bearer` token equals the configured admin token.
///
/// A missing header, another scheme, or a wrong token all answer 401.
pub async fn require_admin_token(
    State(state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    request: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let Ok(TypedHeader(Authorization(bearer))) = bearer else {
        return Err(HttpError(AppError::Unauthorized));
    };

    let expected = state.config.admin.api_token().as_bytes();
    if bool::from(bearer.token().as_bytes().ct_eq(expected)) {
        Ok(next.run(request).await)
    } else {
        Err(HttpError(AppError::Unauthorized))
    }
}
