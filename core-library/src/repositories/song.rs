//! Song repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::{from_millis, now, to_millis, Song, SongChanges, SongId, SongInfo};
use crate::query::{build_song_query_spec, fold_case, SongFilter};
use async_trait::async_trait;
use sqlx::{query_as, FromRow, SqlitePool};
use tracing::debug;

/// Song repository interface for data access operations.
///
/// Soft-deleted songs are invisible to every read and write below.
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Insert a new song
    ///
    /// # Errors
    /// Returns error if:
    /// - Song with same ID already exists
    /// - Song validation fails
    /// - Database error occurs
    async fn insert(&self, song: &Song) -> Result<()>;

    /// Find a live song by its ID
    ///
    /// # Returns
    /// - `Ok(Some(song))` if found
    /// - `Ok(None)` if missing or soft-deleted
    async fn find_by_id(&self, id: &SongId) -> Result<Option<Song>>;

    /// Count songs matching `filter`
    async fn count(&self, filter: &SongFilter) -> Result<u64>;

    /// Fetch up to `limit` songs matching `filter`, newest first, after
    /// skipping `offset` rows.
    ///
    /// With [`Projection::Summary`](crate::query::Projection::Summary) the
    /// returned songs carry no lyrics.
    async fn find_range(&self, filter: &SongFilter, offset: u64, limit: u64)
        -> Result<Vec<Song>>;

    /// Apply `changes` to a live song and return the stored result
    ///
    /// # Errors
    /// Returns `NotFound` if the song does not exist or was deleted.
    async fn update(&self, id: &SongId, changes: &SongChanges) -> Result<Song>;

    /// Mark a live song as deleted
    ///
    /// # Errors
    /// Returns `NotFound` if the song does not exist or was already deleted.
    async fn soft_delete(&self, id: &SongId) -> Result<()>;

    /// Look up details of a song by exact group and title
    async fn find_info(&self, group: &str, title: &str) -> Result<Option<SongInfo>>;
}

/// SQLite implementation of SongRepository
pub struct SqliteSongRepository {
    pool: SqlitePool,
}

impl SqliteSongRepository {
    /// Create a new SQLite song repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct SongRow {
    id: String,
    group_name: String,
    title: String,
    release_date: Option<i64>,
    lyrics: Option<String>,
    link: Option<String>,
    created_at: i64,
    updated_at: i64,
    deleted_at: Option<i64>,
}

impl TryFrom<SongRow> for Song {
    type Error = LibraryError;

    fn try_from(row: SongRow) -> Result<Self> {
        let id = SongId::from_string(&row.id)
            .map_err(|e| LibraryError::corrupt("id", format!("stored id is not a UUID: {}", e)))?;

        Ok(Song {
            id,
            group: row.group_name,
            title: row.title,
            release_date: row
                .release_date
                .map(|ms| from_millis("release_date", ms))
                .transpose()?,
            lyrics: row.lyrics,
            link: row.link,
            created_at: from_millis("created_at", row.created_at)?,
            updated_at: from_millis("updated_at", row.updated_at)?,
            deleted_at: row
                .deleted_at
                .map(|ms| from_millis("deleted_at", ms))
                .transpose()?,
        })
    }
}

#[derive(FromRow)]
struct SongInfoRow {
    lyrics: Option<String>,
    release_date: Option<i64>,
    link: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<SongInfoRow> for SongInfo {
    type Error = LibraryError;

    fn try_from(row: SongInfoRow) -> Result<Self> {
        Ok(SongInfo {
            lyrics: row.lyrics,
            release_date: row
                .release_date
                .map(|ms| from_millis("release_date", ms))
                .transpose()?,
            link: row.link,
            created_at: from_millis("created_at", row.created_at)?,
            updated_at: from_millis("updated_at", row.updated_at)?,
        })
    }
}

fn song_not_found(id: &SongId) -> LibraryError {
    LibraryError::NotFound {
        entity_type: "Song".to_string(),
        id: id.to_string(),
    }
}

// SQLite integers are signed; anything larger is effectively unbounded
fn sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl SongRepository for SqliteSongRepository {
    async fn insert(&self, song: &Song) -> Result<()> {
        song.validate()
            .map_err(|msg| LibraryError::invalid("song", msg))?;

        sqlx::query(
            r#"
            INSERT INTO songs (
                id, group_name, title, group_name_folded, title_folded,
                release_date, lyrics, link, created_at, updated_at, deleted_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(song.id.to_string())
        .bind(&song.group)
        .bind(&song.title)
        .bind(fold_case(&song.group))
        .bind(fold_case(&song.title))
        .bind(song.release_date.map(to_millis))
        .bind(&song.lyrics)
        .bind(&song.link)
        .bind(to_millis(song.created_at))
        .bind(to_millis(song.updated_at))
        .bind(song.deleted_at.map(to_millis))
        .execute(&self.pool)
        .await?;

        debug!(song_id = %song.id, "Inserted song");
        Ok(())
    }

    async fn find_by_id(&self, id: &SongId) -> Result<Option<Song>> {
        let row = query_as::<_, SongRow>(
            "SELECT * FROM songs WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Song::try_from).transpose()
    }

    async fn count(&self, filter: &SongFilter) -> Result<u64> {
        let spec = build_song_query_spec(filter);

        let mut query = sqlx::query_as::<_, (i64,)>(&spec.count_sql);
        for value in &spec.binds {
            query = query.bind(value);
        }

        let (count,) = query.fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    async fn find_range(
        &self,
        filter: &SongFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Song>> {
        let spec = build_song_query_spec(filter);
        let sql = format!("{} LIMIT ? OFFSET ?", spec.select_sql);

        let mut query = query_as::<_, SongRow>(&sql);
        for value in &spec.binds {
            query = query.bind(value);
        }

        let rows = query
            .bind(sql_int(limit))
            .bind(sql_int(offset))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Song::try_from).collect()
    }

    async fn update(&self, id: &SongId, changes: &SongChanges) -> Result<Song> {
        changes
            .validate()
            .map_err(|msg| LibraryError::invalid("song", msg))?;

        let result = sqlx::query(
            r#"
            UPDATE songs SET
                group_name = ?, title = ?,
                group_name_folded = ?, title_folded = ?,
                release_date = COALESCE(?, release_date),
                lyrics = COALESCE(?, lyrics),
                link = COALESCE(?, link),
                updated_at = MAX(?, created_at)
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(&changes.group)
        .bind(&changes.title)
        .bind(fold_case(&changes.group))
        .bind(fold_case(&changes.title))
        .bind(changes.release_date.map(to_millis))
        .bind(&changes.lyrics)
        .bind(&changes.link)
        .bind(to_millis(now()))
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(song_not_found(id));
        }

        debug!(song_id = %id, "Updated song");
        self.find_by_id(id).await?.ok_or_else(|| song_not_found(id))
    }

    async fn soft_delete(&self, id: &SongId) -> Result<()> {
        let result =
            sqlx::query("UPDATE songs SET deleted_at = ? WHERE id = ? AND deleted_at IS NULL")
                .bind(to_millis(now()))
                .bind(id.to_string())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(song_not_found(id));
        }

        debug!(song_id = %id, "Soft-deleted song");
        Ok(())
    }

    async fn find_info(&self, group: &str, title: &str) -> Result<Option<SongInfo>> {
        let row = query_as::<_, SongInfoRow>(
            r#"
            SELECT lyrics, release_date, link, created_at, updated_at
            FROM songs
            WHERE group_name = ? AND title = ? AND deleted_at IS NULL
            ORDER BY created_at DESC, rowid DESC
            LIMIT 1
            "#,
        )
        .bind(group)
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SongInfo::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use crate::models::NewSong;
    use crate::query::Projection;
    use chrono::{Duration, TimeZone, Utc};

    async fn setup() -> SqliteSongRepository {
        SqliteSongRepository::new(create_test_pool().await.unwrap())
    }

    /// Song created `minutes` after a fixed epoch, so ordering is deterministic
    fn song_at(group: &str, title: &str, minutes: i64) -> Song {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes);
        let mut song = Song::new(NewSong::new(group, title));
        song.created_at = created;
        song.updated_at = created;
        song
    }

    #[tokio::test]
    async fn test_insert_and_find_round_trip() {
        let repo = setup().await;
        let song = Song::new(NewSong::new("G", "S"));

        repo.insert(&song).await.unwrap();
        let found = repo.find_by_id(&song.id).await.unwrap().unwrap();

        assert_eq!(found, song);
        assert_eq!(found.group, "G");
        assert_eq!(found.title, "S");
        assert!(found.lyrics.is_none());
        assert!(found.link.is_none());
        assert!(found.release_date.is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_song() {
        let repo = setup().await;
        let song = Song::new(NewSong::new("", "S"));

        let err = repo.insert(&song).await.unwrap_err();
        assert!(matches!(err, LibraryError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let repo = setup().await;
        assert!(repo.find_by_id(&SongId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_range_orders_newest_first() {
        let repo = setup().await;
        for (i, title) in ["first", "second", "third"].iter().enumerate() {
            repo.insert(&song_at("G", title, i as i64)).await.unwrap();
        }

        let songs = repo.find_range(&SongFilter::new(), 0, 10).await.unwrap();
        let titles: Vec<_> = songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second", "first"]);

        let page = repo.find_range(&SongFilter::new(), 1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "second");
    }

    #[tokio::test]
    async fn test_find_range_beyond_end_is_empty() {
        let repo = setup().await;
        repo.insert(&song_at("G", "only", 0)).await.unwrap();

        assert!(repo
            .find_range(&SongFilter::new(), 10, 10)
            .await
            .unwrap()
            .is_empty());
        assert!(repo
            .find_range(&SongFilter::new(), u64::MAX, u64::MAX)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_filters_match_case_insensitive_substrings() {
        let repo = setup().await;
        repo.insert(&song_at("Queen", "Bohemian Rhapsody", 0)).await.unwrap();
        repo.insert(&song_at("Queen", "Innuendo", 1)).await.unwrap();
        repo.insert(&song_at("Muse", "Bohemian Like You", 2)).await.unwrap();

        let by_group = SongFilter::new().with_group("QUEEN");
        assert_eq!(repo.count(&by_group).await.unwrap(), 2);

        let by_title = SongFilter::new().with_title("bohemian");
        assert_eq!(repo.count(&by_title).await.unwrap(), 2);

        let both = SongFilter::new().with_group("que").with_title("bohem");
        let songs = repo.find_range(&both, 0, 10).await.unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "Bohemian Rhapsody");

        assert_eq!(repo.count(&SongFilter::new()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_filters_fold_non_ascii_case() {
        let repo = setup().await;
        repo.insert(&song_at("Кино", "Группа крови", 0)).await.unwrap();
        repo.insert(&song_at("Björk", "Jóga", 1)).await.unwrap();

        for (filter, expected) in [
            (SongFilter::new().with_group("КИНО"), 1),
            (SongFilter::new().with_title("группа КРОВИ"), 1),
            (SongFilter::new().with_group("BJÖRK"), 1),
            (SongFilter::new().with_title("JÓGA"), 1),
            (SongFilter::new().with_group("BJ"), 1),
            (SongFilter::new().with_group("кино").with_title("jóga"), 0),
        ] {
            assert_eq!(repo.count(&filter).await.unwrap(), expected, "{:?}", filter);
        }
    }

    #[tokio::test]
    async fn test_update_refreshes_folded_names() {
        let repo = setup().await;
        let song = song_at("Кино", "Кукушка", 0);
        repo.insert(&song).await.unwrap();

        let changes = SongChanges {
            group: "Ария".to_string(),
            title: "Беспечный ангел".to_string(),
            ..Default::default()
        };
        repo.update(&song.id, &changes).await.unwrap();

        assert_eq!(repo.count(&SongFilter::new().with_group("КИНО")).await.unwrap(), 0);
        assert_eq!(repo.count(&SongFilter::new().with_group("АРИЯ")).await.unwrap(), 1);
        assert_eq!(repo.count(&SongFilter::new().with_title("АНГЕЛ")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_filter_wildcards_are_literal() {
        let repo = setup().await;
        repo.insert(&song_at("AC/DC", "100%", 0)).await.unwrap();
        repo.insert(&song_at("AC/DC", "1000", 1)).await.unwrap();

        let filter = SongFilter::new().with_title("%");
        assert_eq!(repo.count(&filter).await.unwrap(), 1);

        let filter = SongFilter::new().with_title("_");
        assert_eq!(repo.count(&filter).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_summary_projection_omits_lyrics() {
        let repo = setup().await;
        let mut song = song_at("G", "S", 0);
        song.lyrics = Some("la\nla".to_string());
        repo.insert(&song).await.unwrap();

        let summary = repo.find_range(&SongFilter::new(), 0, 10).await.unwrap();
        assert!(summary[0].lyrics.is_none());

        let full = SongFilter::new().with_projection(Projection::Full);
        let songs = repo.find_range(&full, 0, 10).await.unwrap();
        assert_eq!(songs[0].lyrics.as_deref(), Some("la\nla"));
    }

    #[tokio::test]
    async fn test_update_keeps_absent_optionals() {
        let repo = setup().await;
        let mut song = song_at("G", "S", 0);
        song.link = Some("https://example.com/s".to_string());
        repo.insert(&song).await.unwrap();

        let changes = SongChanges {
            group: "G2".to_string(),
            title: "S2".to_string(),
            lyrics: Some("verse".to_string()),
            ..Default::default()
        };
        let updated = repo.update(&song.id, &changes).await.unwrap();

        assert_eq!(updated.group, "G2");
        assert_eq!(updated.title, "S2");
        assert_eq!(updated.lyrics.as_deref(), Some("verse"));
        assert_eq!(updated.link.as_deref(), Some("https://example.com/s"));
        assert_eq!(updated.created_at, song.created_at);
        assert!(updated.updated_at >= song.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_song_is_not_found() {
        let repo = setup().await;
        let changes = SongChanges {
            group: "G".to_string(),
            title: "S".to_string(),
            ..Default::default()
        };

        let err = repo.update(&SongId::new(), &changes).await.unwrap_err();
        assert!(matches!(err, LibraryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_song() {
        let repo = setup().await;
        let song = song_at("G", "S", 0);
        repo.insert(&song).await.unwrap();

        repo.soft_delete(&song.id).await.unwrap();

        assert!(repo.find_by_id(&song.id).await.unwrap().is_none());
        assert_eq!(repo.count(&SongFilter::new()).await.unwrap(), 0);
        assert!(repo.find_info("G", "S").await.unwrap().is_none());

        let err = repo.soft_delete(&song.id).await.unwrap_err();
        assert!(matches!(err, LibraryError::NotFound { .. }));

        let changes = SongChanges {
            group: "G".to_string(),
            title: "S".to_string(),
            ..Default::default()
        };
        assert!(repo.update(&song.id, &changes).await.is_err());

        let (raw,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM songs")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(raw, 1, "soft delete keeps the row");
    }

    #[tokio::test]
    async fn test_find_info_exact_match() {
        let repo = setup().await;
        let mut song = song_at("Queen", "Innuendo", 0);
        song.lyrics = Some("While the sun hangs in the sky".to_string());
        song.link = Some("https://example.com/innuendo".to_string());
        repo.insert(&song).await.unwrap();

        let info = repo.find_info("Queen", "Innuendo").await.unwrap().unwrap();
        assert_eq!(info.lyrics, song.lyrics);
        assert_eq!(info.link, song.link);
        assert_eq!(info.created_at, song.created_at);

        assert!(repo.find_info("queen", "Innuendo").await.unwrap().is_none());
        assert!(repo.find_info("Queen", "Innu").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_undecodable_row_is_corrupt() {
        let repo = setup().await;
        sqlx::query(
            "INSERT INTO songs (id, group_name, title, created_at, updated_at) \
             VALUES ('not-a-uuid', 'G', 'S', 0, 0)",
        )
        .execute(&repo.pool)
        .await
        .unwrap();

        let err = repo.find_range(&SongFilter::new(), 0, 10).await.unwrap_err();
        assert!(matches!(err, LibraryError::Corrupt { ref column, .. } if column == "id"));
    }
}
