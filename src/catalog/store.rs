//! SQLite-backed media catalog.

use super::schema::MEDIA_VERSIONED_SCHEMAS;
use super::{CatalogError, CatalogStore, SortColumn, SortOrder};
use crate::media::{EnrichedRecord, MediaType, StoredRecord};
use crate::sqlite_persistence::initialize_schema;
use rusqlite::{params, types::Type, Connection, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SELECT_COLUMNS: &str = "id, title, category, description, pubdate, link, creator, duration, \
     media_type, resolved_media_type, resolved_title, tmdb_id, popularity, vote_average, \
     vote_count, imdb_id, imdb_rating, rotten_tomatoes, metacritic, awards, boxoffice, \
     resolved_type, downloaded, created_at";

/// Catalog stored in a single SQLite file.
///
/// Every operation opens its own connection and drops it before returning, so
/// the store never holds the database across network calls of the ingestion run
/// and readers in the HTTP view are not blocked by a long-lived handle.
pub struct SqliteCatalogStore {
    db_path: PathBuf,
}

impl SqliteCatalogStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection, CatalogError> {
        let conn = Connection::open(&self.db_path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    fn row_to_record(row: &Row) -> rusqlite::Result<StoredRecord> {
        Ok(StoredRecord {
            id: row.get(0)?,
            record: EnrichedRecord {
                title: row.get(1)?,
                category: row.get(2)?,
                description: row.get(3)?,
                pubdate: row.get(4)?,
                link: row.get(5)?,
                creator: row.get(6)?,
                duration: row.get(7)?,
                media_type: parse_media_type(8, row.get(8)?)?,
                resolved_media_type: row
                    .get::<_, Option<String>>(9)?
                    .map(|s| parse_media_type(9, s))
                    .transpose()?,
                resolved_title: row.get(10)?,
                tmdb_id: row.get(11)?,
                popularity: row.get(12)?,
                vote_average: row.get(13)?,
                vote_count: row.get(14)?,
                imdb_id: row.get(15)?,
                imdb_rating: row.get(16)?,
                rotten_tomatoes: row.get(17)?,
                metacritic: row.get(18)?,
                awards: row.get(19)?,
                boxoffice: row.get(20)?,
                resolved_type: row.get(21)?,
            },
            downloaded: row.get::<_, i64>(22)? != 0,
            created_at: row.get(23)?,
        })
    }
}

fn parse_media_type(index: usize, value: String) -> rusqlite::Result<MediaType> {
    MediaType::from_str(&value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            Type::Text,
            format!("unknown media type '{}'", value).into(),
        )
    })
}

impl CatalogStore for SqliteCatalogStore {
    fn init_schema(&self) -> Result<(), CatalogError> {
        let conn = self.connect()?;
        initialize_schema(&conn, MEDIA_VERSIONED_SCHEMAS)?;
        Ok(())
    }

    fn exists(&self, title: &str, link: &str) -> Result<bool, CatalogError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT 1 FROM media WHERE title = ?1 OR link = ?2 LIMIT 1")?;
        Ok(stmt.exists(params![title, link])?)
    }

    fn insert(&self, record: &EnrichedRecord) -> Result<i64, CatalogError> {
        let conn = self.connect()?;
        let created_at = chrono::Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO media (
                title, category, description, pubdate, link, creator, duration,
                media_type, resolved_media_type, resolved_title, tmdb_id, popularity,
                vote_average, vote_count, imdb_id, imdb_rating, rotten_tomatoes,
                metacritic, awards, boxoffice, resolved_type, downloaded, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                      ?15, ?16, ?17, ?18, ?19, ?20, ?21, 0, ?22)",
            params![
                record.title,
                record.category,
                record.description,
                record.pubdate,
                record.link,
                record.creator,
                record.duration,
                record.media_type.as_str(),
                record.resolved_media_type.map(|t| t.as_str()),
                record.resolved_title,
                record.tmdb_id,
                record.popularity,
                record.vote_average,
                record.vote_count,
                record.imdb_id,
                record.imdb_rating,
                record.rotten_tomatoes,
                record.metacritic,
                record.awards,
                record.boxoffice,
                record.resolved_type,
                created_at,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Inserted media row {} for '{}'", id, record.title);
        Ok(id)
    }

    fn list(&self, sort: SortColumn, order: SortOrder) -> Result<Vec<StoredRecord>, CatalogError> {
        let conn = self.connect()?;
        let column = sort.sql_expr();
        // Column and direction come from closed enums, never from raw input
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM media
             ORDER BY CASE WHEN {column} IS NULL OR {column} = 'N/A' THEN 1 ELSE 0 END,
                      {column} {direction}, id ASC",
            direction = order.as_sql(),
        );

        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn count(&self) -> Result<usize, CatalogError> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM media", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
