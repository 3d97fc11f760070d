//! Song catalog operations.

use std::sync::Arc;

use core_library::{
    LibraryError, LyricsWindow, NewSong, Page, PageRequest, Song, SongChanges, SongFilter,
    SongId, SongInfo, SongRepository,
};
use tracing::{debug, error, info, instrument};

use crate::error::{CatalogError, Result};
use crate::params::{InfoParams, ListParams, LyricsParams};
use crate::response::{DataEnvelope, ListEnvelope, SongListItem};

/// Façade over the song store.
///
/// Every operation validates its raw input before touching the store, so a
/// rejected request never costs a query.
#[derive(Clone)]
pub struct SongCatalogService {
    songs: Arc<dyn SongRepository>,
}

impl SongCatalogService {
    pub fn new(songs: Arc<dyn SongRepository>) -> Self {
        Self { songs }
    }

    /// Add a song with only group and title set
    #[instrument(skip(self, input), fields(group = %input.group, song = %input.title))]
    pub async fn create(&self, input: NewSong) -> Result<DataEnvelope<Song>> {
        input
            .validate()
            .map_err(|msg| CatalogError::validation("body", msg))?;

        let song = Song::new(input);
        self.songs
            .insert(&song)
            .await
            .map_err(|e| store_failure("create", e))?;

        info!(song_id = %song.id, "Created song");
        Ok(DataEnvelope::new(song))
    }

    /// Filtered, paginated listing, newest first
    #[instrument(skip(self, params))]
    pub async fn list(&self, params: &ListParams) -> Result<ListEnvelope<SongListItem>> {
        let request = PageRequest::parse(params.page.as_deref(), params.limit.as_deref())?;
        let filter = SongFilter::from_params(
            params.group.as_deref(),
            params.song.as_deref(),
            params.show_lyrics.as_deref(),
        );

        let total = self
            .songs
            .count(&filter)
            .await
            .map_err(|e| store_failure("count", e))?;
        let songs = self
            .songs
            .find_range(&filter, request.offset(), request.limit())
            .await
            .map_err(|e| store_failure("list", e))?;

        debug!(
            page = request.page,
            limit = request.limit,
            total,
            returned = songs.len(),
            "Listed songs"
        );

        let projection = filter.projection;
        let page = Page::new(songs, total, request).map(|s| SongListItem::project(s, projection));
        Ok(ListEnvelope::from(page))
    }

    #[instrument(skip(self))]
    pub async fn show(&self, id: &str) -> Result<DataEnvelope<Song>> {
        let id = parse_id(id)?;
        let song = self.find_live(&id).await?;
        Ok(DataEnvelope::new(song))
    }

    /// Replace group and title; optional fields left out stay as stored
    #[instrument(skip(self, changes))]
    pub async fn update(&self, id: &str, changes: SongChanges) -> Result<DataEnvelope<Song>> {
        let id = parse_id(id)?;
        changes
            .validate()
            .map_err(|msg| CatalogError::validation("body", msg))?;

        let song = self
            .songs
            .update(&id, &changes)
            .await
            .map_err(|e| store_failure("update", e))?;

        info!(song_id = %id, "Updated song");
        Ok(DataEnvelope::new(song))
    }

    /// One page of a song's lyric lines
    #[instrument(skip(self, params))]
    pub async fn lyrics(&self, id: &str, params: &LyricsParams) -> Result<DataEnvelope<LyricsWindow>> {
        let id = parse_id(id)?;
        let request = PageRequest::parse(params.page.as_deref(), params.limit.as_deref())?;

        let song = self.find_live(&id).await?;
        let text = song
            .lyrics
            .ok_or_else(|| CatalogError::NotFound("song has no lyrics".to_string()))?;

        let window = LyricsWindow::window(&text, request);
        debug!(
            song_id = %id,
            page = window.page,
            limit = window.limit,
            total = window.total,
            "Windowed lyrics"
        );
        Ok(DataEnvelope::new(window))
    }

    /// Details of the song with exactly this group and title
    #[instrument(skip(self, params))]
    pub async fn info(&self, params: &InfoParams) -> Result<DataEnvelope<SongInfo>> {
        let group = required(params.group.as_deref(), "group")?;
        let title = required(params.song.as_deref(), "song")?;

        let info = self
            .songs
            .find_info(group, title)
            .await
            .map_err(|e| store_failure("info", e))?
            .ok_or_else(|| CatalogError::NotFound("song not found".to_string()))?;

        Ok(DataEnvelope::new(info))
    }

    /// Soft-delete a song; it disappears from every later read
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = parse_id(id)?;
        self.songs
            .soft_delete(&id)
            .await
            .map_err(|e| store_failure("delete", e))?;

        info!(song_id = %id, "Deleted song");
        Ok(())
    }

    async fn find_live(&self, id: &SongId) -> Result<Song> {
        self.songs
            .find_by_id(id)
            .await
            .map_err(|e| store_failure("find", e))?
            .ok_or_else(|| CatalogError::NotFound("song not found".to_string()))
    }
}

fn parse_id(raw: &str) -> Result<SongId> {
    SongId::from_string(raw).map_err(|_| CatalogError::validation("id", "invalid song id"))
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CatalogError::validation(field, format!("{} is required", field))),
    }
}

fn store_failure(operation: &'static str, err: LibraryError) -> CatalogError {
    let err = CatalogError::from(err);
    if let CatalogError::Store(source) = &err {
        error!(operation, error = %source, "Song store operation failed");
    }
    err
}
