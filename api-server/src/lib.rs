//! HTTP transport for the song catalog.
//!
//! [`build_router`] mounts the catalog operations under `/api/songs`:
//!
//! | Method | Path | Operation |
//! |---|---|---|
//! | `POST` | `/api/songs` | create |
//! | `GET` | `/api/songs` | list (`page`, `limit`, `group`, `song`, `showLyrics`) |
//! | `GET` | `/api/songs/info` | info (`group`, `song`) |
//! | `GET` | `/api/songs/:id` | show |
//! | `PUT` | `/api/songs/:id` | update |
//! | `DELETE` | `/api/songs/:id` | delete |
//! | `GET` | `/api/songs/:id/lyrics` | lyrics (`page`, `limit`) |
//! | `GET` | `/swagger/openapi.json` | OpenAPI document for the routes above |

pub mod error;
pub mod handlers;
pub mod openapi;

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use core_service::SongCatalogService;
use tracing::{info, warn};

pub use error::{ApiError, ApiResult, ErrorBody};
pub use openapi::ApiDoc;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub catalog: SongCatalogService,
}

/// Build the application router around a catalog service
pub fn build_router(catalog: SongCatalogService) -> Router {
    let collection = get(handlers::list_songs).post(handlers::create_song);

    Router::new()
        .route("/api/songs", collection.clone())
        .route("/api/songs/", collection)
        .route("/api/songs/info", get(handlers::song_info))
        .route(
            "/api/songs/:id",
            get(handlers::show_song)
                .put(handlers::update_song)
                .delete(handlers::delete_song),
        )
        .route("/api/songs/:id/lyrics", get(handlers::song_lyrics))
        .route("/swagger/openapi.json", get(openapi::openapi_json))
        .layer(middleware::from_fn(log_request))
        .with_state(AppState { catalog })
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if response.status().is_server_error() {
        warn!(%method, %path, status, elapsed_ms, "Request failed");
    } else {
        info!(%method, %path, status, elapsed_ms, "Request handled");
    }

    response
}
