use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use validator::{Validate, ValidationErrors};

use crate::incoming::http_axum::{
    dto::{
        requests::{BanPlayerRequest, ListBansQuery, NameSearchQuery},
        responses::{ApiResponse, BanPageResponse, BanResponse, SweepResponse},
    },
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;
use banstore_application::error::AppError;
use domain::{ban::PlayerId, page::BanListQuery};

fn validation_failed(e: &ValidationErrors) -> HttpError {
    HttpError(AppError::ValidationError {
        message: format!("Validation failed: {}", e),
    })
}

fn no_ban_for(player_id: PlayerId) -> HttpError {
    HttpError(AppError::NotFound {
        message: format!("No ban recorded for player {player_id}"),
    })
}

#[instrument(skip(state, request))]
pub async fn ban_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Json(request): Json<BanPlayerRequest>,
) -> Result<Json<ApiResponse<BanResponse>>, HttpError> {
    let target_id: PlayerId = player_id.parse().map_err(AppError::from)?;
    request.validate().map_err(|e| validation_failed(&e))?;
    let command = request.into_command(target_id).map_err(AppError::from)?;

    let record = state.ban_use_case.ban_player(command).await?;

    Ok(Json(ApiResponse::success_with_data(Some(
        BanResponse::from(record),
    ))))
}

#[instrument(skip(state))]
pub async fn get_ban(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<ApiResponse<BanResponse>>, HttpError> {
    let target_id: PlayerId = player_id.parse().map_err(AppError::from)?;

    let record = state
        .ban_use_case
        .get_ban(target_id)
        .await?
        .ok_or_else(|| no_ban_for(target_id))?;

    Ok(Json(ApiResponse::success_with_data(Some(
        BanResponse::from(record),
    ))))
}

#[instrument(skip(state))]
pub async fn unban_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, HttpError> {
    let target_id: PlayerId = player_id.parse().map_err(AppError::from)?;

    if !state.ban_use_case.unban_player(target_id).await? {
        return Err(no_ban_for(target_id));
    }

    Ok(Json(ApiResponse::success()))
}

#[instrument(skip(state))]
pub async fn find_ban_by_name(
    State(state): State<AppState>,
    Query(query): Query<NameSearchQuery>,
) -> Result<Json<ApiResponse<BanResponse>>, HttpError> {
    query.validate().map_err(|e| validation_failed(&e))?;

    let record = state
        .ban_use_case
        .find_ban_by_name(&query.name)
        .await?
        .ok_or_else(|| {
            HttpError(AppError::NotFound {
                message: format!("No ban matches name {:?}", query.name),
            })
        })?;

    Ok(Json(ApiResponse::success_with_data(Some(
        BanResponse::from(record),
    ))))
}

#[instrument(skip(state))]
pub async fn list_bans(
    State(state): State<AppState>,
    Query(query): Query<ListBansQuery>,
) -> Result<Json<ApiResponse<BanPageResponse>>, HttpError> {
    query.validate().map_err(|e| validation_failed(&e))?;

    let page_size = query
        .page_size
        .unwrap_or(state.config.listing.default_page_size);
    let page_number = query.page.unwrap_or(1);

    let page = state
        .ban_use_case
        .list_bans(BanListQuery {
            search: query.search.unwrap_or_default(),
            page_size,
            page_number,
        })
        .await?;

    Ok(Json(ApiResponse::success_with_data(Some(
        BanPageResponse::new(page, page_size, page_number),
    ))))
}

#[instrument(skip(state))]
pub async fn sweep_expired(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SweepResponse>>, HttpError> {
    let lifted = state.ban_use_case.sweep_expired().await?;

    Ok(Json(ApiResponse::success_with_data(Some(
        SweepResponse::from(lifted),
    ))))
}
