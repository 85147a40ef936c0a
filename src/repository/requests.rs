//! Requests repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{RequestStatus, RequestTarget, RequestType},
        record::RecordSummary,
        request::{Request, RequestDetails, RequestQuery},
        user::UserSummary,
    },
};

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

const DETAILS_SELECT: &str = r#"
    SELECT r.*,
           u.username AS req_username, u.full_name AS req_full_name,
           rec.title AS rec_title, rec.category AS rec_category, rec.status AS rec_status
    FROM requests r
    JOIN users u ON r.user_id = u.id
    JOIN records rec ON r.record_id = rec.id
"#;

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Request> {
        sqlx::query_as::<_, Request>("SELECT * FROM requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request with id {} not found", id)))
    }

    /// Create a new request in pending status
    pub async fn create(
        &self,
        user_id: i32,
        record_id: i32,
        request_type: RequestType,
        target: RequestTarget,
        message: Option<&str>,
    ) -> AppResult<Request> {
        let created = sqlx::query_as::<_, Request>(
            r#"
            INSERT INTO requests (user_id, record_id, status, request_type, target_user, message)
            VALUES ($1, $2, 'pending', $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(record_id)
        .bind(request_type)
        .bind(target.as_db())
        .bind(message)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Whether the user already has a pending request for this record
    pub async fn has_pending(&self, user_id: i32, record_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM requests
                WHERE user_id = $1 AND record_id = $2 AND status = 'pending'
            )
            "#,
        )
        .bind(user_id)
        .bind(record_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Persist a validated transition: status, optional response note,
    /// and the processing stamp.
    pub async fn apply_transition(
        &self,
        id: i32,
        next_status: RequestStatus,
        admin_response: Option<&str>,
        processed_by: i32,
        processed_at: DateTime<Utc>,
    ) -> AppResult<Request> {
        sqlx::query_as::<_, Request>(
            r#"
            UPDATE requests
            SET status = $2,
                admin_response = COALESCE($3, admin_response),
                processed_by = $4,
                processed_at = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(next_status)
        .bind(admin_response)
        .bind(processed_by)
        .bind(processed_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request with id {} not found", id)))
    }

    /// List management-pool requests (target_user IS NULL), optionally
    /// filtered by status and type, with user/record summaries.
    pub async fn list_pool(&self, query: &RequestQuery) -> AppResult<Vec<RequestDetails>> {
        let mut conditions = vec!["r.target_user IS NULL".to_string()];
        let mut idx = 0;

        if query.status.is_some() {
            idx += 1;
            conditions.push(format!("r.status = ${}", idx));
        }
        if query.request_type.is_some() {
            idx += 1;
            conditions.push(format!("r.request_type = ${}", idx));
        }

        let sql = format!(
            "{} WHERE {} ORDER BY r.created_at DESC",
            DETAILS_SELECT,
            conditions.join(" AND ")
        );

        let mut q = sqlx::query(&sql);
        if let Some(status) = query.status {
            q = q.bind(status);
        }
        if let Some(request_type) = query.request_type {
            q = q.bind(request_type);
        }

        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Self::row_to_details).collect())
    }

    /// Requests created by a user, newest first
    pub async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<RequestDetails>> {
        let sql = format!("{} WHERE r.user_id = $1 ORDER BY r.created_at DESC", DETAILS_SELECT);
        let rows = sqlx::query(&sql).bind(user_id).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Self::row_to_details).collect())
    }

    /// Peer requests addressed to a user as the current holder
    pub async fn list_incoming(&self, user_id: i32) -> AppResult<Vec<RequestDetails>> {
        let sql = format!(
            "{} WHERE r.target_user = $1 ORDER BY r.created_at DESC",
            DETAILS_SELECT
        );
        let rows = sqlx::query(&sql).bind(user_id).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Self::row_to_details).collect())
    }

    fn row_to_details(row: sqlx::postgres::PgRow) -> RequestDetails {
        RequestDetails {
            id: row.get("id"),
            status: row.get("status"),
            request_type: row.get("request_type"),
            target_user: row.get("target_user"),
            message: row.get("message"),
            admin_response: row.get("admin_response"),
            processed_by: row.get("processed_by"),
            processed_at: row.get("processed_at"),
            created_at: row.get("created_at"),
            user: UserSummary {
                id: row.get("user_id"),
                username: row.get("req_username"),
                full_name: row.get("req_full_name"),
            },
            record: RecordSummary {
                id: row.get("record_id"),
                title: row.get("rec_title"),
                category: row.get("rec_category"),
                status: row.get("rec_status"),
            },
        }
    }

    /// Count management-pool requests matching a status and type
    pub async fn count_pool(
        &self,
        status: RequestStatus,
        request_type: Option<RequestType>,
    ) -> AppResult<i64> {
        let count: i64 = match request_type {
            Some(rt) => {
                sqlx::query_scalar(
                    r#"
                    SELECT COUNT(*) FROM requests
                    WHERE target_user IS NULL AND status = $1 AND request_type = $2
                    "#,
                )
                .bind(status)
                .bind(rt)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar(
                    "SELECT COUNT(*) FROM requests WHERE target_user IS NULL AND status = $1",
                )
                .bind(status)
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(count)
    }

    /// Count a user's own requests in a given status
    pub async fn count_by_user(&self, user_id: i32, status: RequestStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM requests WHERE user_id = $1 AND status = $2",
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count pending peer requests addressed to a user
    pub async fn count_incoming_pending(&self, user_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM requests WHERE target_user = $1 AND status = 'pending'",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
