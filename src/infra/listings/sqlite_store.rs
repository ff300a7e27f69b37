// SQLite-backed listing store.
//
// Tables:
// - listings: one row per directory entry, rating kept as integer tenths
//
// Votes are folded inside one write transaction: it takes the write lock,
// reads the row, lets the core compute the next tally and writes it back
// before any other writer can get in.

use crate::core::listings::{
    Listing, ListingError, ListingId, ListingStatus, ListingStore, TallyFold,
};
use crate::core::ratings::{Rating, RatingTally};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteQueryResult, SqliteRow};
use sqlx::Row;
use std::path::Path;

pub struct SqliteListingStore {
    pool: SqlitePool,
}

impl SqliteListingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database at `database_url` and run migrations.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        // Ensure the file exists if it's a file path
        let path_str = database_url
            .trim_start_matches("sqlite://")
            .trim_start_matches("sqlite:");
        if !database_url.contains(":memory:") && !Path::new(path_str).exists() {
            if let Some(parent) = Path::new(path_str).parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::File::create(path_str)?;
        }

        let conn_str = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            format!("sqlite://{}", database_url)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&conn_str)
            .await?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Run database migrations to create required tables.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS listings (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                link TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                country TEXT NOT NULL,
                submitted_by_email TEXT,
                creator_name TEXT,
                followers INTEGER,
                status TEXT NOT NULL DEFAULT 'pending'
                    CHECK (status IN ('pending', 'approved', 'rejected')),
                rating_tenths INTEGER NOT NULL DEFAULT 0
                    CHECK (rating_tenths BETWEEN 0 AND 50),
                total_votes INTEGER NOT NULL DEFAULT 0 CHECK (total_votes >= 0),
                verified BOOLEAN NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE (name, link)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Status listings are always filtered by status and sorted by age
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_listings_status_created
            ON listings(status, created_at DESC)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ListingStore for SqliteListingStore {
    async fn insert(&self, listing: Listing) -> Result<(), ListingError> {
        sqlx::query(
            r#"
            INSERT INTO listings (
                id, name, link, description, category, country,
                submitted_by_email, creator_name, followers,
                status, rating_tenths, total_votes, verified,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(listing.id.to_string())
        .bind(&listing.name)
        .bind(&listing.link)
        .bind(&listing.description)
        .bind(&listing.category)
        .bind(&listing.country)
        .bind(&listing.submitted_by_email)
        .bind(&listing.creator_name)
        .bind(listing.followers.map(|f| f as i64))
        .bind(listing.status.as_str())
        .bind(i64::from(listing.rating.tenths()))
        .bind(listing.total_votes as i64)
        .bind(listing.verified)
        .bind(timestamp(listing.created_at))
        .bind(timestamp(listing.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => ListingError::Duplicate,
            other => storage_error(other),
        })?;

        Ok(())
    }

    async fn get(&self, id: ListingId) -> Result<Option<Listing>, ListingError> {
        let row = sqlx::query("SELECT * FROM listings WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        row.as_ref().map(row_to_listing).transpose()
    }

    async fn list_by_status(&self, status: ListingStatus) -> Result<Vec<Listing>, ListingError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM listings
            WHERE status = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(row_to_listing).collect()
    }

    async fn update_status(
        &self,
        id: ListingId,
        status: ListingStatus,
        at: DateTime<Utc>,
    ) -> Result<(), ListingError> {
        let result = sqlx::query("UPDATE listings SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(timestamp(at))
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        expect_one_row(id, result)
    }

    async fn set_verified(
        &self,
        id: ListingId,
        verified: bool,
        at: DateTime<Utc>,
    ) -> Result<(), ListingError> {
        let result = sqlx::query("UPDATE listings SET verified = ?, updated_at = ? WHERE id = ?")
            .bind(verified)
            .bind(timestamp(at))
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        expect_one_row(id, result)
    }

    async fn set_rating(
        &self,
        id: ListingId,
        rating: Rating,
        at: DateTime<Utc>,
    ) -> Result<(), ListingError> {
        let result = sqlx::query("UPDATE listings SET rating_tenths = ?, updated_at = ? WHERE id = ?")
            .bind(i64::from(rating.tenths()))
            .bind(timestamp(at))
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        expect_one_row(id, result)
    }

    async fn update_tally(
        &self,
        id: ListingId,
        fold: &TallyFold<'_>,
        at: DateTime<Utc>,
    ) -> Result<RatingTally, ListingError> {
        // Dropping `tx` on any early return rolls the whole vote back.
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        // Write first so this transaction holds the write lock before it reads.
        // A concurrent vote waits on the busy timeout here instead of folding
        // over a tally that is about to change.
        let touched = sqlx::query("UPDATE listings SET updated_at = ? WHERE id = ?")
            .bind(timestamp(at))
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;
        expect_one_row(id, touched)?;

        let row = sqlx::query("SELECT * FROM listings WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(&mut *tx)
            .await
            .map_err(storage_error)?;
        let next = fold(&row_to_listing(&row)?)?;

        sqlx::query("UPDATE listings SET rating_tenths = ?, total_votes = ? WHERE id = ?")
            .bind(i64::from(next.rating.tenths()))
            .bind(next.total_votes as i64)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;
        Ok(next)
    }

    async fn delete(&self, id: ListingId) -> Result<(), ListingError> {
        let result = sqlx::query("DELETE FROM listings WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        expect_one_row(id, result)
    }
}

/// Single-row writes that matched nothing targeted an unknown listing.
fn expect_one_row(id: ListingId, result: SqliteQueryResult) -> Result<(), ListingError> {
    if result.rows_affected() == 0 {
        return Err(ListingError::NotFound(id));
    }
    Ok(())
}

fn storage_error(e: sqlx::Error) -> ListingError {
    ListingError::StorageError(e.to_string())
}

/// Fixed-width RFC 3339 so text ordering matches time ordering.
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>, ListingError> {
    let raw: String = row.get(column);
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ListingError::StorageError(format!("bad {} '{}': {}", column, raw, e)))
}

fn row_to_listing(row: &SqliteRow) -> Result<Listing, ListingError> {
    let id: String = row.get("id");
    let status: String = row.get("status");
    let rating_tenths: i64 = row.get("rating_tenths");
    let total_votes: i64 = row.get("total_votes");
    let followers: Option<i64> = row.get("followers");

    Ok(Listing {
        id: id
            .parse()
            .map_err(|_| ListingError::StorageError(format!("bad listing id '{}'", id)))?,
        name: row.get("name"),
        link: row.get("link"),
        description: row.get("description"),
        category: row.get("category"),
        country: row.get("country"),
        submitted_by_email: row.get("submitted_by_email"),
        creator_name: row.get("creator_name"),
        followers: followers
            .map(u64::try_from)
            .transpose()
            .map_err(|_| ListingError::StorageError(format!("bad followers {:?}", followers)))?,
        status: status
            .parse()
            .map_err(|_| ListingError::StorageError(format!("bad status '{}'", status)))?,
        rating: u16::try_from(rating_tenths)
            .ok()
            .and_then(|tenths| Rating::from_tenths(tenths).ok())
            .ok_or_else(|| ListingError::StorageError(format!("bad rating_tenths {}", rating_tenths)))?,
        total_votes: u64::try_from(total_votes)
            .map_err(|_| ListingError::StorageError(format!("bad total_votes {}", total_votes)))?,
        verified: row.get("verified"),
        created_at: parse_timestamp(row, "created_at")?,
        updated_at: parse_timestamp(row, "updated_at")?,
    })
}
