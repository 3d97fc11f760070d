//! Line windowing over stored lyrics.

use crate::repositories::PageRequest;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One page of lyric lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LyricsWindow {
    /// Lines on the requested page, in text order
    pub lines: Vec<String>,
    pub page: u64,
    pub limit: u64,
    /// Number of lines in the full text
    pub total: u64,
}

impl LyricsWindow {
    /// Slice `text` into lines and return the page described by `request`.
    ///
    /// Lines are separated by `\n` only; a trailing newline yields a final
    /// empty line. A page past the end returns no lines but still reports
    /// the full line count.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_library::{LyricsWindow, PageRequest};
    ///
    /// let request = PageRequest::new(2, 2).unwrap();
    /// let window = LyricsWindow::window("a\nb\nc", request);
    /// assert_eq!(window.lines, vec!["c".to_string()]);
    /// assert_eq!(window.total, 3);
    /// ```
    pub fn window(text: &str, request: PageRequest) -> Self {
        let all: Vec<&str> = text.split('\n').collect();
        let total = all.len();

        let start = clamp_index(request.offset(), total);
        let end = clamp_index(request.offset().saturating_add(request.limit()), total);

        Self {
            lines: all[start..end].iter().map(|line| line.to_string()).collect(),
            page: request.page,
            limit: request.limit,
            total: total as u64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn clamp_index(index: u64, len: usize) -> usize {
    usize::try_from(index).map_or(len, |i| i.min(len))
}
