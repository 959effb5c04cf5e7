use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;
use tracing::debug;

use super::{LeaveStore, UserStore};
use crate::{
    error::AppResult,
    model::{
        leave::{LeaveRecord, NewLeave},
        user::User,
    },
};

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// DATETIME columns compare against midnight so that only the calendar day
/// matters.
fn midnight(day: NaiveDate) -> chrono::NaiveDateTime {
    day.and_time(chrono::NaiveTime::MIN)
}

#[async_trait]
impl LeaveStore for MySqlStore {
    async fn get_leave(&self, id: u64) -> AppResult<Option<LeaveRecord>> {
        let leave = sqlx::query_as::<_, LeaveRecord>(
            r#"
            SELECT id, user_id, start_date, end_date
            FROM leaves
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(leave)
    }

    async fn list_leaves(&self) -> AppResult<Vec<LeaveRecord>> {
        let leaves = sqlx::query_as::<_, LeaveRecord>(
            "SELECT id, user_id, start_date, end_date FROM leaves ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(leaves)
    }

    async fn user_leaves_between(
        &self,
        user_id: u64,
        from: NaiveDate,
        until: NaiveDate,
    ) -> AppResult<Vec<LeaveRecord>> {
        debug!(user_id, %from, %until, "Fetching leaves in window");

        let leaves = sqlx::query_as::<_, LeaveRecord>(
            r#"
            SELECT id, user_id, start_date, end_date
            FROM leaves
            WHERE user_id = ?
            AND end_date >= ?
            AND start_date < ?
            ORDER BY start_date
            "#,
        )
        .bind(user_id)
        .bind(midnight(from))
        .bind(midnight(until))
        .fetch_all(&self.pool)
        .await?;

        Ok(leaves)
    }

    async fn user_leaves_from(&self, user_id: u64, from: NaiveDate) -> AppResult<Vec<LeaveRecord>> {
        let from = midnight(from);

        let leaves = sqlx::query_as::<_, LeaveRecord>(
            r#"
            SELECT id, user_id, start_date, end_date
            FROM leaves
            WHERE user_id = ?
            AND (start_date >= ? OR end_date >= ?)
            ORDER BY start_date, id
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        Ok(leaves)
    }

    async fn insert_leave(&self, leave: &NewLeave) -> AppResult<LeaveRecord> {
        let result = sqlx::query(
            r#"
            INSERT INTO leaves (user_id, start_date, end_date)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(leave.user_id)
        .bind(leave.start_date)
        .bind(leave.end_date)
        .execute(&self.pool)
        .await?;

        Ok(LeaveRecord {
            id: result.last_insert_id(),
            user_id: leave.user_id,
            start_date: leave.start_date,
            end_date: leave.end_date,
        })
    }

    async fn update_leave(&self, leave: &LeaveRecord) -> AppResult<bool> {
        // MySQL reports 0 affected rows for an unchanged row, so existence
        // is checked separately.
        if self.get_leave(leave.id).await?.is_none() {
            return Ok(false);
        }

        sqlx::query("UPDATE leaves SET start_date = ?, end_date = ? WHERE id = ?")
            .bind(leave.start_date)
            .bind(leave.end_date)
            .bind(leave.id)
            .execute(&self.pool)
            .await?;

        Ok(true)
    }

    async fn delete_leave(&self, id: u64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM leaves WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_leaves(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM leaves").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl UserStore for MySqlStore {
    async fn get_user(&self, id: u64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT id FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn insert_user(&self, id: u64) -> AppResult<bool> {
        let result = sqlx::query("INSERT INTO users (id) VALUES (?)")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23000") => {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_user(&self, id: u64) -> AppResult<bool> {
        // leaves go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_users(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM users").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
