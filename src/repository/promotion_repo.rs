// ==========================================
// B2B 交易平台 - 促销活动仓储
// ==========================================
// 存储: promotions + promotion_products (多对多)
// ==========================================

use crate::domain::promotion::Promotion;
use crate::domain::types::ModerationStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_util::{code_from_sql, ts_from_sql, ts_to_sql};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const PROMOTION_COLUMNS: &str = "id, company_id, title, starts_at, ends_at, status, created_at";

pub struct PromotionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PromotionRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, promotion: &Promotion) -> RepositoryResult<i64> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO promotions (company_id, title, starts_at, ends_at, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                promotion.company_id,
                promotion.title,
                ts_to_sql(&promotion.starts_at),
                ts_to_sql(&promotion.ends_at),
                promotion.status.as_str(),
                ts_to_sql(&promotion.created_at),
            ],
        )?;
        let id = tx.last_insert_rowid();
        for product_id in &promotion.product_ids {
            tx.execute(
                "INSERT OR IGNORE INTO promotion_products (promotion_id, product_id) VALUES (?1, ?2)",
                params![id, product_id],
            )?;
        }
        tx.commit()?;
        Ok(id)
    }

    pub fn update_status(&self, id: i64, status: ModerationStatus) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE promotions SET status = ?2 WHERE id = ?1",
            params![id, status.as_str()],
        )?;
        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Promotion".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Promotion>> {
        let conn = self.get_conn()?;
        let promotion = conn
            .query_row(
                &format!("SELECT {} FROM promotions WHERE id = ?1", PROMOTION_COLUMNS),
                params![id],
                map_row,
            )
            .optional()?;
        promotion.map(|p| load_products(&conn, p)).transpose()
    }

    pub fn list_by_status(&self, status: ModerationStatus) -> RepositoryResult<Vec<Promotion>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM promotions WHERE status = ?1 ORDER BY created_at DESC, id DESC",
            PROMOTION_COLUMNS
        ))?;
        let promotions = stmt
            .query_map(params![status.as_str()], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        promotions
            .into_iter()
            .map(|p| load_products(&conn, p))
            .collect()
    }

    /// 商品是否仍被其他生效中的活动覆盖
    pub fn product_has_other_active(
        &self,
        product_id: i64,
        exclude_promotion_id: i64,
        now: &chrono::NaiveDateTime,
    ) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let now = ts_to_sql(now);
        let found = conn
            .query_row(
                r#"
                SELECT 1 FROM promotions p
                JOIN promotion_products pp ON pp.promotion_id = p.id
                WHERE pp.product_id = ?1 AND p.id != ?2 AND p.status = 'APPROVED'
                  AND p.starts_at <= ?3 AND p.ends_at >= ?3
                LIMIT 1
                "#,
                params![product_id, exclude_promotion_id, now],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(found)
    }
}

fn load_products(conn: &Connection, mut promotion: Promotion) -> RepositoryResult<Promotion> {
    let mut stmt = conn.prepare(
        "SELECT product_id FROM promotion_products WHERE promotion_id = ?1 ORDER BY product_id",
    )?;
    promotion.product_ids = stmt
        .query_map(params![promotion.id], |row| row.get(0))?
        .collect::<SqliteResult<Vec<i64>>>()?;
    Ok(promotion)
}

fn map_row(row: &Row) -> rusqlite::Result<Promotion> {
    let starts_at: String = row.get(3)?;
    let ends_at: String = row.get(4)?;
    let status: String = row.get(5)?;
    let created_at: String = row.get(6)?;
    Ok(Promotion {
        id: row.get(0)?,
        company_id: row.get(1)?,
        title: row.get(2)?,
        starts_at: ts_from_sql(3, &starts_at)?,
        ends_at: ts_from_sql(4, &ends_at)?,
        status: code_from_sql(5, &status, ModerationStatus::from_code)?,
        product_ids: Vec::new(),
        created_at: ts_from_sql(6, &created_at)?,
    })
}
