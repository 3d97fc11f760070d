//! Response envelopes for catalog operations.
//!
//! Single records travel as `{data}`; listings add the pagination metadata
//! next to the items.

use core_library::{LyricsWindow, Page, Projection, Song, SongInfo, SongSummary};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `{data: ...}` wrapper for single records and lyrics windows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[aliases(
    SongData = DataEnvelope<Song>,
    LyricsData = DataEnvelope<LyricsWindow>,
    InfoData = DataEnvelope<SongInfo>
)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// `{data, total, limit, page, pages}` wrapper for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[aliases(SongPage = ListEnvelope<SongListItem>)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub limit: u64,
    pub page: u64,
    pub pages: u64,
}

impl<T> From<Page<T>> for ListEnvelope<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            data: page.items,
            total: page.total,
            limit: page.limit,
            page: page.page,
            pages: page.pages,
        }
    }
}

/// Listing row in the projection the caller asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum SongListItem {
    Full(Song),
    Summary(SongSummary),
}

impl SongListItem {
    pub fn project(song: Song, projection: Projection) -> Self {
        match projection {
            Projection::Full => SongListItem::Full(song),
            Projection::Summary => SongListItem::Summary(song.into()),
        }
    }
}
