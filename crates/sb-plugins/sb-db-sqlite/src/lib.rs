//! # sb-db-sqlite
//!
//! SQLite implementation of `SpotRepo`. The `tagged` column holds a JSON
//! array of user ids; membership queries go through `json_each`. The `id`
//! primary key carries the idempotence invariant, and the flag flip is a
//! single guarded UPDATE so concurrent moderation actions on one spot
//! cannot both succeed.

use async_trait::async_trait;
use sb_core::models::Spot;
use sb_core::traits::{InsertOutcome, Lookup, SpotRepo};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;

pub struct SqliteSpotRepo {
    pool: SqlitePool,
}

impl SqliteSpotRepo {
    /// Opens (creating if missing) the database at `url` and ensures the
    /// schema exists.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS spots (
                id        TEXT PRIMARY KEY,
                spotter   TEXT NOT NULL,
                tagged    TEXT NOT NULL,
                image_url TEXT NOT NULL,
                flagged   INTEGER NOT NULL DEFAULT 0,
                semester  TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_spots_semester_spotter
             ON spots (semester, flagged, spotter)",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

fn row_to_spot(row: &sqlx::sqlite::SqliteRow) -> Spot {
    Spot {
        id: row.get("id"),
        spotter: row.get("spotter"),
        tagged: serde_json::from_str(&row.get::<String, _>("tagged")).unwrap_or_default(),
        image_url: row.get("image_url"),
        flagged: row.get("flagged"),
        semester: row.get("semester"),
    }
}

#[async_trait]
impl SpotRepo for SqliteSpotRepo {
    /// Inserts one spot. A duplicate id leaves the existing row untouched
    /// and reports `Duplicate`.
    async fn insert(&self, spot: Spot) -> anyhow::Result<InsertOutcome> {
        let result = sqlx::query(
            "INSERT INTO spots (id, spotter, tagged, image_url, flagged, semester)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO NOTHING",
        )
        .bind(&spot.id)
        .bind(&spot.spotter)
        .bind(serde_json::to_string(&spot.tagged)?)
        .bind(&spot.image_url)
        .bind(spot.flagged)
        .bind(&spot.semester)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            log::warn!("duplicate insert for spot {}", spot.id);
            Ok(InsertOutcome::Duplicate)
        } else {
            Ok(InsertOutcome::Inserted)
        }
    }

    async fn find(&self, id: &str) -> anyhow::Result<Lookup> {
        let rows = sqlx::query("SELECT * FROM spots WHERE id = ?")
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        // The primary key makes more than one row unreachable here; the
        // variant stays so callers can stay exhaustive over the contract.
        match rows.as_slice() {
            [] => Ok(Lookup::NotFound),
            [row] => Ok(Lookup::Found(row_to_spot(row))),
            _ => Ok(Lookup::Conflict),
        }
    }

    async fn set_flagged(&self, id: &str, flagged: bool) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE spots SET flagged = ? WHERE id = ? AND flagged = ?")
            .bind(flagged)
            .bind(id)
            .bind(!flagged)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_for(&self, user_id: &str, semester: &str) -> anyhow::Result<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM spots
             WHERE spotter = ? AND semester = ? AND flagged = 0",
        )
        .bind(user_id)
        .bind(semester)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("n"))
    }

    async fn spot_counts(&self, semester: &str) -> anyhow::Result<Vec<(String, i64)>> {
        let rows = sqlx::query(
            "SELECT spotter, COUNT(*) AS n FROM spots
             WHERE semester = ? AND flagged = 0
             GROUP BY spotter
             ORDER BY n DESC, spotter ASC",
        )
        .bind(semester)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|row| (row.get("spotter"), row.get("n"))).collect())
    }

    async fn tagged_count(&self, user_id: &str, semester: &str) -> anyhow::Result<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS n FROM spots
             WHERE semester = ? AND flagged = 0
               AND EXISTS (SELECT 1 FROM json_each(spots.tagged) WHERE json_each.value = ?)",
        )
        .bind(semester)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("n"))
    }

    async fn spotter_counts_of(
        &self,
        user_id: &str,
        semester: &str,
    ) -> anyhow::Result<Vec<(String, i64)>> {
        let rows = sqlx::query(
            "SELECT spotter, COUNT(*) AS n FROM spots
             WHERE semester = ? AND flagged = 0
               AND EXISTS (SELECT 1 FROM json_each(spots.tagged) WHERE json_each.value = ?)
             GROUP BY spotter
             ORDER BY n DESC, spotter ASC",
        )
        .bind(semester)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|row| (row.get("spotter"), row.get("n"))).collect())
    }

    async fn spots_tagging(&self, user_id: &str, semester: &str) -> anyhow::Result<Vec<Spot>> {
        let rows = sqlx::query(
            "SELECT * FROM spots
             WHERE semester = ? AND flagged = 0
               AND EXISTS (SELECT 1 FROM json_each(spots.tagged) WHERE json_each.value = ?)",
        )
        .bind(semester)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(row_to_spot).collect())
    }
}
