//! Database schema for the media catalog.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};
use anyhow::Result;
use rusqlite::Connection;

/// Layout written by the first generation of the ingester, never stamped with
/// a `user_version`. `media_type` holds the TMDB-resolved type when a search
/// matched, `type` is the OMDb type.
const MEDIA_TABLE_V0: Table = Table {
    name: "media",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text),
        sqlite_column!("category", &SqlType::Text),
        sqlite_column!("description", &SqlType::Text),
        sqlite_column!("pubdate", &SqlType::Text),
        sqlite_column!("link", &SqlType::Text),
        sqlite_column!("creator", &SqlType::Text),
        sqlite_column!("duration", &SqlType::Integer),
        sqlite_column!("tmdb_id", &SqlType::Integer),
        sqlite_column!("popularity", &SqlType::Real),
        sqlite_column!("vote_average", &SqlType::Real),
        sqlite_column!("vote_count", &SqlType::Integer),
        sqlite_column!("imdb_id", &SqlType::Text),
        sqlite_column!("imdb_rating", &SqlType::Real),
        sqlite_column!("rotten_tomatoes", &SqlType::Text),
        sqlite_column!("metacritic", &SqlType::Text),
        sqlite_column!("awards", &SqlType::Text),
        sqlite_column!("boxoffice", &SqlType::Text),
        sqlite_column!("media_type", &SqlType::Text),
        sqlite_column!("type", &SqlType::Text),
        sqlite_column!("downloaded", &SqlType::Boolean),
        sqlite_column!("created_at", &SqlType::Text),
    ],
    indices: &[],
};

/// One row per ingested feed entry. Append-only from the ingestion side;
/// `downloaded` is maintained by external tooling.
const MEDIA_TABLE_V1: Table = Table {
    name: "media",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("category", &SqlType::Text, non_null = true),
        sqlite_column!("description", &SqlType::Text, non_null = true),
        sqlite_column!("pubdate", &SqlType::Text, non_null = true),
        sqlite_column!("link", &SqlType::Text, non_null = true),
        sqlite_column!("creator", &SqlType::Text, non_null = true),
        sqlite_column!("duration", &SqlType::Integer, non_null = true),
        sqlite_column!("media_type", &SqlType::Text, non_null = true),
        sqlite_column!("resolved_media_type", &SqlType::Text),
        sqlite_column!("resolved_title", &SqlType::Text),
        sqlite_column!("tmdb_id", &SqlType::Integer),
        sqlite_column!("popularity", &SqlType::Real),
        sqlite_column!("vote_average", &SqlType::Real),
        sqlite_column!("vote_count", &SqlType::Integer),
        sqlite_column!("imdb_id", &SqlType::Text),
        sqlite_column!("imdb_rating", &SqlType::Real),
        sqlite_column!("rotten_tomatoes", &SqlType::Text),
        sqlite_column!("metacritic", &SqlType::Text),
        sqlite_column!("awards", &SqlType::Text),
        sqlite_column!("boxoffice", &SqlType::Text),
        sqlite_column!("resolved_type", &SqlType::Text),
        sqlite_column!(
            "downloaded",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!("created_at", &SqlType::Text, non_null = true),
    ],
    indices: &[
        ("idx_media_title", "title"),
        ("idx_media_link", "link"),
    ],
};

/// Rebuilds the v0 table in the v1 layout.
///
/// The duration classification is recomputed for `media_type`, the stored type
/// moves to `resolved_media_type` for rows that matched on TMDB and `type`
/// becomes `resolved_type`. Row ids are kept.
fn migrate_v0_to_v1(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("ALTER TABLE media RENAME TO media_v0", [])?;
    MEDIA_TABLE_V1.create(&tx)?;
    tx.execute(
        "INSERT INTO media (
            id, title, category, description, pubdate, link, creator, duration,
            media_type, resolved_media_type, resolved_title, tmdb_id, popularity,
            vote_average, vote_count, imdb_id, imdb_rating, rotten_tomatoes,
            metacritic, awards, boxoffice, resolved_type, downloaded, created_at
        )
        SELECT
            id, COALESCE(title, ''), COALESCE(category, ''), COALESCE(description, ''),
            COALESCE(pubdate, ''), COALESCE(link, ''), COALESCE(creator, ''),
            COALESCE(duration, 0),
            CASE WHEN COALESCE(duration, 0) >= 90 THEN 'movie' ELSE 'tv' END,
            CASE WHEN tmdb_id IS NOT NULL AND media_type IN ('movie', 'tv')
                 THEN media_type END,
            NULL, tmdb_id, popularity, vote_average, vote_count, imdb_id, imdb_rating,
            rotten_tomatoes, metacritic, awards, boxoffice, type,
            CASE WHEN downloaded IN (1, '1', 'true', 'True', 'TRUE') THEN 1 ELSE 0 END,
            COALESCE(created_at, '')
        FROM media_v0",
        [],
    )?;
    tx.execute("DROP TABLE media_v0", [])?;
    tx.commit()?;
    Ok(())
}

pub const MEDIA_VERSIONED_SCHEMAS: &[VersionedSchema] = &[
    VersionedSchema {
        version: 0,
        tables: &[MEDIA_TABLE_V0],
        migration: None,
    },
    VersionedSchema {
        version: 1,
        tables: &[MEDIA_TABLE_V1],
        migration: Some(migrate_v0_to_v1),
    },
];
