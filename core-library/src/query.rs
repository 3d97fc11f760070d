//! Filter composition for song listings.
//!
//! A [`SongFilter`] holds the optional constraints a listing was asked for
//! plus the projection to return. It performs no I/O: the repository turns it
//! into SQL through [`build_song_query_spec`], which always excludes
//! soft-deleted rows and joins the present constraints with `AND`.

use serde::{Deserialize, Serialize};

/// Which columns a listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Projection {
    /// Every persisted field
    Full,
    /// Every field except lyrics
    #[default]
    Summary,
}

impl Projection {
    /// Interpret the `showLyrics` query flag; only the exact value `true`
    /// selects the full record.
    pub fn from_flag(show_lyrics: Option<&str>) -> Self {
        match show_lyrics {
            Some("true") => Projection::Full,
            _ => Projection::Summary,
        }
    }

    pub(crate) fn columns(&self) -> &'static str {
        match self {
            Projection::Full => {
                "id, group_name, title, release_date, lyrics, link, \
                 created_at, updated_at, deleted_at"
            }
            Projection::Summary => {
                "id, group_name, title, release_date, NULL AS lyrics, link, \
                 created_at, updated_at, deleted_at"
            }
        }
    }
}

/// Filter options for querying songs.
///
/// Present constraints match as case-insensitive substrings; empty strings
/// are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SongFilter {
    pub group: Option<String>,
    pub title: Option<String>,
    pub projection: Projection,
}

impl SongFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter from raw listing parameters (`group`, `song`,
    /// `showLyrics`).
    pub fn from_params(
        group: Option<&str>,
        title: Option<&str>,
        show_lyrics: Option<&str>,
    ) -> Self {
        Self {
            group: non_empty(group),
            title: non_empty(title),
            projection: Projection::from_flag(show_lyrics),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = non_empty(Some(&group.into()));
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = non_empty(Some(&title.into()));
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// True when no row constraint is present
    pub fn is_unconstrained(&self) -> bool {
        self.group.is_none() && self.title.is_none()
    }
}

/// Case folding applied to stored names and to filter values before matching
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SongQuerySpec {
    pub select_sql: String,
    pub count_sql: String,
    pub binds: Vec<String>,
}

pub(crate) fn build_song_query_spec(filter: &SongFilter) -> SongQuerySpec {
    let mut conditions = vec!["deleted_at IS NULL"];
    let mut binds = Vec::new();

    // SQLite lower() folds ASCII only, so both sides are folded in Rust.
    // instr() keeps '%' and '_' in user input literal.
    if let Some(group) = &filter.group {
        conditions.push("instr(group_name_folded, ?) > 0");
        binds.push(fold_case(group));
    }

    if let Some(title) = &filter.title {
        conditions.push("instr(title_folded, ?) > 0");
        binds.push(fold_case(title));
    }

    let where_clause = conditions.join(" AND ");

    let select_sql = format!(
        "SELECT {} FROM songs WHERE {} ORDER BY created_at DESC, rowid DESC",
        filter.projection.columns(),
        where_clause
    );
    let count_sql = format!("SELECT COUNT(*) AS count FROM songs WHERE {}", where_clause);

    SongQuerySpec {
        select_sql,
        count_sql,
        binds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_from_flag() {
        assert_eq!(Projection::from_flag(Some("true")), Projection::Full);
        assert_eq!(Projection::from_flag(Some("TRUE")), Projection::Summary);
        assert_eq!(Projection::from_flag(Some("1")), Projection::Summary);
        assert_eq!(Projection::from_flag(None), Projection::Summary);
    }

    #[test]
    fn test_from_params_drops_empty_filters() {
        let filter = SongFilter::from_params(Some(""), Some("Bohemian"), None);
        assert_eq!(filter.group, None);
        assert_eq!(filter.title, Some("Bohemian".to_string()));
        assert!(!filter.is_unconstrained());

        assert!(SongFilter::from_params(Some(""), None, None).is_unconstrained());
    }

    #[test]
    fn test_unconstrained_spec_only_excludes_deleted() {
        let spec = build_song_query_spec(&SongFilter::new());

        assert!(spec.binds.is_empty());
        assert_eq!(
            spec.count_sql,
            "SELECT COUNT(*) AS count FROM songs WHERE deleted_at IS NULL"
        );
        assert!(spec.select_sql.contains("NULL AS lyrics"));
        assert!(spec.select_sql.ends_with("ORDER BY created_at DESC, rowid DESC"));
    }

    #[test]
    fn test_spec_conjoins_present_filters() {
        let filter = SongFilter::new()
            .with_group("Queen")
            .with_title("Bohemian")
            .with_projection(Projection::Full);
        let spec = build_song_query_spec(&filter);

        assert_eq!(spec.binds, vec!["queen".to_string(), "bohemian".to_string()]);
        assert_eq!(spec.count_sql.matches(" AND ").count(), 2);
        assert!(spec.select_sql.contains("lyrics, link"));
        assert!(!spec.select_sql.contains("NULL AS lyrics"));
    }

    #[test]
    fn test_fold_case_handles_non_ascii() {
        assert_eq!(fold_case("КИНО"), "кино");
        assert_eq!(fold_case("BJÖRK"), "björk");
        assert_eq!(fold_case("Queen"), "queen");

        let spec = build_song_query_spec(&SongFilter::new().with_group("ГРУППА"));
        assert_eq!(spec.binds, vec!["группа".to_string()]);
    }

    #[test]
    fn test_builder_order_does_not_matter() {
        let a = SongFilter::new().with_group("Queen").with_title("Bohemian");
        let b = SongFilter::new().with_title("Bohemian").with_group("Queen");

        assert_eq!(a, b);
        assert_eq!(build_song_query_spec(&a), build_song_query_spec(&b));
    }

    #[test]
    fn test_projection_does_not_change_row_predicate() {
        let summary = build_song_query_spec(&SongFilter::new().with_group("Queen"));
        let full = build_song_query_spec(
            &SongFilter::new()
                .with_group("Queen")
                .with_projection(Projection::Full),
        );

        assert_eq!(summary.count_sql, full.count_sql);
        assert_eq!(summary.binds, full.binds);
    }
}
