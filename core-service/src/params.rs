//! Raw request parameters as they arrive from the transport.
//!
//! Values stay unparsed strings so validation happens in one place, inside
//! the catalog service.

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// Query string of the listing operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// 1-based page number, default 1
    pub page: Option<String>,
    /// Page size, default 10
    pub limit: Option<String>,
    /// Case-insensitive substring of the group name
    pub group: Option<String>,
    /// Case-insensitive substring of the song title
    pub song: Option<String>,
    /// `true` includes lyrics in every row
    #[serde(rename = "showLyrics")]
    pub show_lyrics: Option<String>,
}

/// Query string of the lyrics operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LyricsParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Query string of the info lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InfoParams {
    pub group: Option<String>,
    pub song: Option<String>,
}
