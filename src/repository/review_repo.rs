// ==========================================
// B2B 交易平台 - 评价仓储
// ==========================================

use crate::domain::review::Review;
use crate::domain::types::ModerationStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_util::{code_from_sql, ts_from_sql, ts_to_sql};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const REVIEW_COLUMNS: &str = "id, company_id, author_id, rating, text, status, created_at";

pub struct ReviewRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ReviewRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, review: &Review) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO reviews (company_id, author_id, rating, text, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                review.company_id,
                review.author_id,
                review.rating,
                review.text,
                review.status.as_str(),
                ts_to_sql(&review.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update_status(&self, id: i64, status: ModerationStatus) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE reviews SET status = ?2 WHERE id = ?1",
            params![id, status.as_str()],
        )?;
        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Review".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Review>> {
        let conn = self.get_conn()?;
        let review = conn
            .query_row(
                &format!("SELECT {} FROM reviews WHERE id = ?1", REVIEW_COLUMNS),
                params![id],
                map_row,
            )
            .optional()?;
        Ok(review)
    }

    /// 公司全部已通过评价的评分
    pub fn approved_ratings(&self, company_id: i64) -> RepositoryResult<Vec<i32>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT rating FROM reviews WHERE company_id = ?1 AND status = 'APPROVED' ORDER BY id",
        )?;
        let ratings = stmt
            .query_map(params![company_id], |row| row.get(0))?
            .collect::<SqliteResult<Vec<i32>>>()?;
        Ok(ratings)
    }

    /// 指定状态的评价（新到旧）
    pub fn list_by_status(&self, status: ModerationStatus) -> RepositoryResult<Vec<Review>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM reviews WHERE status = ?1 ORDER BY created_at DESC, id DESC",
            REVIEW_COLUMNS
        ))?;
        let reviews = stmt
            .query_map(params![status.as_str()], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(reviews)
    }
}

fn map_row(row: &Row) -> rusqlite::Result<Review> {
    let status: String = row.get(5)?;
    let created_at: String = row.get(6)?;
    Ok(Review {
        id: row.get(0)?,
        company_id: row.get(1)?,
        author_id: row.get(2)?,
        rating: row.get(3)?,
        text: row.get(4)?,
        status: code_from_sql(5, &status, ModerationStatus::from_code)?,
        created_at: ts_from_sql(6, &created_at)?,
    })
}
