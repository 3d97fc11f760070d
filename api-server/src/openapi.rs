//! OpenAPI 3 description of the catalog routes, served as JSON.

use axum::Json;
use core_library::{LyricsWindow, NewSong, Song, SongChanges, SongInfo, SongSummary};
use core_service::{InfoData, LyricsData, SongData, SongListItem, SongPage};
use utoipa::OpenApi;

use crate::error::ErrorBody;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Music library",
        description = "Song catalog with paginated listings and lyrics"
    ),
    paths(
        handlers::create_song,
        handlers::list_songs,
        handlers::song_info,
        handlers::show_song,
        handlers::update_song,
        handlers::delete_song,
        handlers::song_lyrics
    ),
    components(schemas(
        Song,
        SongSummary,
        SongInfo,
        NewSong,
        SongChanges,
        LyricsWindow,
        SongListItem,
        SongData,
        SongPage,
        LyricsData,
        InfoData,
        ErrorBody
    )),
    tags((name = "songs", description = "Song catalog operations"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
