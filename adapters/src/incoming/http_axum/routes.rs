use axum::{
    Router,
    routing::{get, post, put},
};

use crate::incoming::http_axum::{
    handlers::{
        ban::{ban_player, find_ban_by_name, get_ban, list_bans, sweep_expired, unban_player},
        health::health_check,
    },
    router_ext::RouterExt,
};
use crate::shared::app_state::AppState;

pub fn build_application_router(state: &AppState) -> Router<AppState> {
    build_core_routes()
        .merge(build_ban_routes(state))
        .with_request_id()
}

fn build_core_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

fn build_ban_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/bans", get(list_bans))
        .route("/bans/search", get(find_ban_by_name))
        .route("/bans/sweep", post(sweep_expired))
        .route(
            "/bans/{player_id}",
            put(ban_player).get(get_ban).delete(unban_player),
        )
        .with_admin_token(state)
}
