use axum::{Router, middleware};

use crate::incoming::http_axum::middleware::{
    admin_auth::require_admin_token, request_id::request_id_middleware,
};
use crate::shared::app_state::AppState;

pub trait RouterExt {
    fn with_request_id(self) -> Self;
    fn with_admin_token(self, state: &AppState) -> Self;
}

impl RouterExt for Router<AppState> {
    fn with_request_id(self) -> Self {
        self.layer(middleware::from_fn(request_id_middleware))
    }

    fn with_admin_token(self, state: &AppState) -> Self {
        self.route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_token,
        ))
    }
}
