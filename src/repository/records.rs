//! Records repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    lifecycle::RecordEffect,
    models::{
        enums::RecordStatus,
        record::{CreateRecord, ImportRecordRow, Record, RecordQuery, UpdateRecord},
    },
};

#[derive(Clone)]
pub struct RecordsRepository {
    pool: Pool<Postgres>,
}

impl RecordsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get record by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Record> {
        sqlx::query_as::<_, Record>("SELECT * FROM records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Record with id {} not found", id)))
    }

    /// List records, optionally filtered by status, category, or a title search
    pub async fn list(&self, query: &RecordQuery) -> AppResult<Vec<Record>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut idx = 0;

        if query.status.is_some() {
            idx += 1;
            conditions.push(format!("status = ${}", idx));
        }
        if query.category.is_some() {
            idx += 1;
            conditions.push(format!("category = ${}", idx));
        }
        if query.search.is_some() {
            idx += 1;
            conditions.push(format!("title ILIKE ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!("SELECT * FROM records {} ORDER BY title", where_clause);
        let mut q = sqlx::query_as::<_, Record>(&sql);
        if let Some(status) = query.status {
            q = q.bind(status);
        }
        if let Some(ref category) = query.category {
            q = q.bind(category);
        }
        if let Some(ref search) = query.search {
            q = q.bind(format!("%{}%", search));
        }

        Ok(q.fetch_all(&self.pool).await?)
    }

    /// Create a new record (always starts available with no holder)
    pub async fn create(&self, record: &CreateRecord) -> AppResult<Record> {
        let created = sqlx::query_as::<_, Record>(
            r#"
            INSERT INTO records (title, category, description, metadata)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&record.title)
        .bind(&record.category)
        .bind(&record.description)
        .bind(record.metadata.clone().unwrap_or_else(|| serde_json::json!({})))
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update descriptive fields of a record (possession state is only
    /// touched via apply_effect)
    pub async fn update(&self, id: i32, update: &UpdateRecord) -> AppResult<Record> {
        sqlx::query_as::<_, Record>(
            r#"
            UPDATE records
            SET title = COALESCE($2, title),
                category = COALESCE($3, category),
                description = COALESCE($4, description),
                metadata = COALESCE($5, metadata),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.category)
        .bind(&update.description)
        .bind(&update.metadata)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Record with id {} not found", id)))
    }

    /// Delete a record
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Record with id {} not found", id)));
        }
        Ok(())
    }

    /// Replace the whole record collection with importer rows.
    ///
    /// Runs in a single transaction so concurrent readers never see a
    /// partially imported collection. Requests reference record ids, so
    /// the request log is cleared along with the collection it describes.
    pub async fn replace_all(&self, rows: &[ImportRecordRow]) -> AppResult<usize> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM requests").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM records").execute(&mut *tx).await?;

        for row in rows {
            sqlx::query(
                r#"
                INSERT INTO records (title, category, description, metadata)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(&row.title)
            .bind(&row.category)
            .bind(&row.description)
            .bind(row.metadata.clone().unwrap_or_else(|| serde_json::json!({})))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(rows.len())
    }

    /// Apply a possession change with an optimistic version check.
    ///
    /// The caller passes the version it read the record at; if another
    /// transition won the race in between, zero rows match and the losing
    /// caller gets a Conflict instead of silently overwriting.
    pub async fn apply_effect(
        &self,
        record_id: i32,
        expected_version: i32,
        effect: RecordEffect,
    ) -> AppResult<Record> {
        let now = Utc::now();

        let updated = match effect {
            RecordEffect::Borrow { holder } => {
                sqlx::query_as::<_, Record>(
                    r#"
                    UPDATE records
                    SET status = 'borrowed', current_holder = $3, borrowed_date = $4,
                        return_date = NULL, version = version + 1, updated_at = $4
                    WHERE id = $1 AND version = $2
                    RETURNING *
                    "#,
                )
                .bind(record_id)
                .bind(expected_version)
                .bind(holder)
                .bind(now)
                .fetch_optional(&self.pool)
                .await?
            }
            RecordEffect::Release => {
                sqlx::query_as::<_, Record>(
                    r#"
                    UPDATE records
                    SET status = 'available', current_holder = NULL, borrowed_date = NULL,
                        return_date = $3, version = version + 1, updated_at = $3
                    WHERE id = $1 AND version = $2
                    RETURNING *
                    "#,
                )
                .bind(record_id)
                .bind(expected_version)
                .bind(now)
                .fetch_optional(&self.pool)
                .await?
            }
        };

        updated.ok_or_else(|| {
            AppError::Conflict(
                "Record was modified by a concurrent transition; re-fetch and retry".to_string(),
            )
        })
    }

    /// Records currently held by a user
    pub async fn list_held_by(&self, user_id: i32) -> AppResult<Vec<Record>> {
        let records = sqlx::query_as::<_, Record>(
            "SELECT * FROM records WHERE current_holder = $1 ORDER BY borrowed_date",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Count all records
    pub async fn count_total(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM records")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count records in a given possession state
    pub async fn count_by_status(&self, status: RecordStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM records WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count records held by a user
    pub async fn count_held_by(&self, user_id: i32) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM records WHERE current_holder = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
