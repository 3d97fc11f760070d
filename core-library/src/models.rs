//! Domain models for the song catalog
//!
//! This module contains the song model with validation plus the payload types
//! used to create, update and partially project songs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

// =============================================================================
// ID Types
// =============================================================================

/// Unique identifier for a song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(pub Uuid);

impl SongId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for SongId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Timestamps
// =============================================================================

/// Current time truncated to the millisecond precision the store keeps.
pub fn now() -> DateTime<Utc> {
    let millis = Utc::now().timestamp_millis();
    DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
}

pub(crate) fn to_millis(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

pub(crate) fn from_millis(column: &str, millis: i64) -> crate::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        crate::LibraryError::corrupt(column, format!("timestamp {} is out of range", millis))
    })
}

// =============================================================================
// Domain Models
// =============================================================================

/// Catalog song
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Song {
    /// Unique identifier, assigned on creation
    #[schema(value_type = String, format = Uuid)]
    pub id: SongId,
    /// Performing group
    pub group: String,
    /// Song title
    #[serde(rename = "song")]
    pub title: String,
    /// Release date
    #[serde(rename = "date")]
    pub release_date: Option<DateTime<Utc>>,
    /// Newline-delimited lyrics
    pub lyrics: Option<String>,
    /// External link (URL)
    pub link: Option<String>,

    // Timestamps
    /// When first added
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
    /// Soft deletion marker
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Song {
    /// Create a new song from a creation payload
    pub fn new(input: NewSong) -> Self {
        let now = now();
        Self {
            id: SongId::new(),
            group: input.group,
            title: input.title,
            release_date: None,
            lyrics: None,
            link: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Validate song data
    pub fn validate(&self) -> Result<(), String> {
        require_text("group", &self.group)?;
        require_text("song", &self.title)?;

        if self.updated_at < self.created_at {
            return Err("Song updated_at cannot precede created_at".to_string());
        }

        Ok(())
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Song without its lyrics, returned by listings unless lyrics are requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SongSummary {
    #[schema(value_type = String, format = Uuid)]
    pub id: SongId,
    pub group: String,
    #[serde(rename = "song")]
    pub title: String,
    #[serde(rename = "date")]
    pub release_date: Option<DateTime<Utc>>,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Song> for SongSummary {
    fn from(song: Song) -> Self {
        Self {
            id: song.id,
            group: song.group,
            title: song.title,
            release_date: song.release_date,
            link: song.link,
            created_at: song.created_at,
            updated_at: song.updated_at,
        }
    }
}

/// Details looked up by group and title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SongInfo {
    pub lyrics: Option<String>,
    #[serde(rename = "date")]
    pub release_date: Option<DateTime<Utc>>,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a song
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewSong {
    pub group: String,
    #[serde(rename = "song")]
    pub title: String,
}

impl NewSong {
    pub fn new(group: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            title: title.into(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        require_text("group", &self.group)?;
        require_text("song", &self.title)
    }
}

/// Payload for updating a song.
///
/// `group` and `song` are always replaced; optional fields left as `None`
/// keep their stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct SongChanges {
    pub group: String,
    #[serde(rename = "song")]
    pub title: String,
    #[serde(rename = "date", default)]
    pub release_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl SongChanges {
    pub fn validate(&self) -> Result<(), String> {
        require_text("group", &self.group)?;
        require_text("song", &self.title)
    }
}

fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
