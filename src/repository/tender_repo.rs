// ==========================================
// B2B 交易平台 - 招标仓储
// ==========================================

use crate::domain::tender::Tender;
use crate::domain::types::ModerationStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_util::{code_from_sql, ts_from_sql, ts_to_sql};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const TENDER_COLUMNS: &str = "id, company_id, author_id, title, description, status, created_at";

pub struct TenderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TenderRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, tender: &Tender) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO tenders (company_id, author_id, title, description, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                tender.company_id,
                tender.author_id,
                tender.title,
                tender.description,
                tender.status.as_str(),
                ts_to_sql(&tender.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update_status(&self, id: i64, status: ModerationStatus) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE tenders SET status = ?2 WHERE id = ?1",
            params![id, status.as_str()],
        )?;
        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Tender".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Tender>> {
        let conn = self.get_conn()?;
        let tender = conn
            .query_row(
                &format!("SELECT {} FROM tenders WHERE id = ?1", TENDER_COLUMNS),
                params![id],
                map_row,
            )
            .optional()?;
        Ok(tender)
    }

    pub fn list_by_status(&self, status: ModerationStatus) -> RepositoryResult<Vec<Tender>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM tenders WHERE status = ?1 ORDER BY created_at DESC, id DESC",
            TENDER_COLUMNS
        ))?;
        let tenders = stmt
            .query_map(params![status.as_str()], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(tenders)
    }
}

fn map_row(row: &Row) -> rusqlite::Result<Tender> {
    let status: String = row.get(5)?;
    let created_at: String = row.get(6)?;
    Ok(Tender {
        id: row.get(0)?,
        company_id: row.get(1)?,
        author_id: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        status: code_from_sql(5, &status, ModerationStatus::from_code)?,
        created_at: ts_from_sql(6, &created_at)?,
    })
}
