//! Route handlers: bind the request, call the catalog, pick the status.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use core_library::{NewSong, SongChanges};
use core_service::{InfoParams, ListParams, LyricsParams};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn query<T>(params: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

#[utoipa::path(
    post,
    path = "/api/songs",
    tag = "songs",
    request_body = NewSong,
    responses(
        (status = 201, description = "Song created", body = core_service::SongData),
        (status = 400, description = "Missing or empty group/song", body = crate::error::ErrorBody),
        (status = 500, description = "Store failure", body = crate::error::ErrorBody)
    )
)]
pub async fn create_song(
    State(state): State<AppState>,
    payload: Result<Json<NewSong>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let input = body(payload)?;
    let created = state.catalog.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/songs",
    tag = "songs",
    params(ListParams),
    responses(
        (status = 200, description = "One page of live songs, newest first", body = core_service::SongPage),
        (status = 400, description = "Invalid page or limit", body = crate::error::ErrorBody),
        (status = 500, description = "Store failure", body = crate::error::ErrorBody)
    )
)]
pub async fn list_songs(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let params = query(params)?;
    Ok(Json(state.catalog.list(&params).await?))
}

#[utoipa::path(
    get,
    path = "/api/songs/{id}",
    tag = "songs",
    params(("id" = String, Path, description = "Song id (UUID)")),
    responses(
        (status = 200, description = "The song", body = core_service::SongData),
        (status = 400, description = "Malformed id", body = crate::error::ErrorBody),
        (status = 404, description = "No live song with this id", body = crate::error::ErrorBody)
    )
)]
pub async fn show_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.catalog.show(&id).await?))
}

#[utoipa::path(
    put,
    path = "/api/songs/{id}",
    tag = "songs",
    params(("id" = String, Path, description = "Song id (UUID)")),
    request_body = SongChanges,
    responses(
        (status = 200, description = "The updated song", body = core_service::SongData),
        (status = 400, description = "Malformed id or body", body = crate::error::ErrorBody),
        (status = 404, description = "No live song with this id", body = crate::error::ErrorBody)
    )
)]
pub async fn update_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SongChanges>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let changes = body(payload)?;
    Ok(Json(state.catalog.update(&id, changes).await?))
}

#[utoipa::path(
    get,
    path = "/api/songs/{id}/lyrics",
    tag = "songs",
    params(("id" = String, Path, description = "Song id (UUID)"), LyricsParams),
    responses(
        (status = 200, description = "One page of lyric lines", body = core_service::LyricsData),
        (status = 400, description = "Malformed id, page or limit", body = crate::error::ErrorBody),
        (status = 404, description = "Song missing or without lyrics", body = crate::error::ErrorBody)
    )
)]
pub async fn song_lyrics(
    State(state): State<AppState>,
    Path(id): Path<String>,
    params: Result<Query<LyricsParams>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let params = query(params)?;
    Ok(Json(state.catalog.lyrics(&id, &params).await?))
}

#[utoipa::path(
    get,
    path = "/api/songs/info",
    tag = "songs",
    params(InfoParams),
    responses(
        (status = 200, description = "Details of the song with this exact group and title", body = core_service::InfoData),
        (status = 400, description = "group or song missing", body = crate::error::ErrorBody),
        (status = 404, description = "No such song", body = crate::error::ErrorBody)
    )
)]
pub async fn song_info(
    State(state): State<AppState>,
    params: Result<Query<InfoParams>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let params = query(params)?;
    Ok(Json(state.catalog.info(&params).await?))
}

#[utoipa::path(
    delete,
    path = "/api/songs/{id}",
    tag = "songs",
    params(("id" = String, Path, description = "Song id (UUID)")),
    responses(
        (status = 204, description = "Song soft-deleted"),
        (status = 400, description = "Malformed id", body = crate::error::ErrorBody),
        (status = 404, description = "No live song with this id", body = crate::error::ErrorBody)
    )
)]
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.catalog.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
