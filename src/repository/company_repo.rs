// ==========================================
// B2B 交易平台 - 公司仓储
// ==========================================
// 红线: Repository 不做业务逻辑，只做数据映射
// 存储: companies + company_categories (多对多)
// ==========================================

use crate::domain::company::Company;
use crate::domain::types::{CompanyStatus, SupplierType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_util::{code_from_sql, json_from_sql, ts_from_sql, ts_to_sql};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row, Transaction};
use std::sync::{Arc, Mutex};

const COMPANY_COLUMNS: &str = r#"
    id, name, owner_id, description, city, address, supplier_type, status,
    contacts_json, legal_info_json, payment_methods_json, work_schedule_json,
    rating, created_at
"#;

pub struct CompanyRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CompanyRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入公司（含分类关联），返回新 id
    pub fn insert(&self, company: &Company) -> RepositoryResult<i64> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO companies (
                name, owner_id, description, city, address, supplier_type, status,
                contacts_json, legal_info_json, payment_methods_json, work_schedule_json,
                rating, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                company.name,
                company.owner_id,
                company.description,
                company.city,
                company.address,
                company.supplier_type.as_str(),
                company.status.as_str(),
                serde_json::to_string(&company.contacts)?,
                serde_json::to_string(&company.legal_info)?,
                serde_json::to_string(&company.payment_methods)?,
                serde_json::to_string(&company.work_schedule)?,
                company.rating,
                ts_to_sql(&company.created_at),
            ],
        )?;
        let id = tx.last_insert_rowid();
        replace_categories(&tx, id, &company.category_ids)?;

        tx.commit()?;
        Ok(id)
    }

    /// 全量更新公司（含分类关联）
    pub fn update(&self, company: &Company) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let rows = tx.execute(
            r#"
            UPDATE companies SET
                name = ?2, owner_id = ?3, description = ?4, city = ?5, address = ?6,
                supplier_type = ?7, status = ?8, contacts_json = ?9, legal_info_json = ?10,
                payment_methods_json = ?11, work_schedule_json = ?12, rating = ?13
            WHERE id = ?1
            "#,
            params![
                company.id,
                company.name,
                company.owner_id,
                company.description,
                company.city,
                company.address,
                company.supplier_type.as_str(),
                company.status.as_str(),
                serde_json::to_string(&company.contacts)?,
                serde_json::to_string(&company.legal_info)?,
                serde_json::to_string(&company.payment_methods)?,
                serde_json::to_string(&company.work_schedule)?,
                company.rating,
            ],
        )?;
        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Company".to_string(),
                id: company.id.to_string(),
            });
        }
        replace_categories(&tx, company.id, &company.category_ids)?;

        tx.commit()?;
        Ok(())
    }

    /// 更新状态（审核）
    pub fn update_status(&self, id: i64, status: CompanyStatus) -> RepositoryResult<()> {
        self.touch(
            "UPDATE companies SET status = ?2 WHERE id = ?1",
            id,
            status.as_str(),
        )
    }

    /// 更新评分
    pub fn update_rating(&self, id: i64, rating: f64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE companies SET rating = ?2 WHERE id = ?1",
            params![id, rating],
        )?;
        if rows == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    fn touch(&self, sql: &str, id: i64, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(sql, params![id, value])?;
        if rows == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    // ==========================================
    // 查询操作
    // ==========================================

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Company>> {
        let conn = self.get_conn()?;
        let company = conn
            .query_row(
                &format!("SELECT {} FROM companies WHERE id = ?1", COMPANY_COLUMNS),
                params![id],
                map_row,
            )
            .optional()?;
        company.map(|c| load_categories(&conn, c)).transpose()
    }

    /// 按名称精确匹配（同名取 id 最小者）
    pub fn find_first_by_name(&self, name: &str) -> RepositoryResult<Option<Company>> {
        let conn = self.get_conn()?;
        let company = conn
            .query_row(
                &format!(
                    "SELECT {} FROM companies WHERE name = ?1 ORDER BY id LIMIT 1",
                    COMPANY_COLUMNS
                ),
                params![name],
                map_row,
            )
            .optional()?;
        company.map(|c| load_categories(&conn, c)).transpose()
    }

    /// 按名称精确匹配的全部公司（按 id 升序）
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Vec<Company>> {
        self.list_where(
            &format!(
                "SELECT {} FROM companies WHERE name = ?1 ORDER BY id",
                COMPANY_COLUMNS
            ),
            Some(name),
        )
    }

    /// 全部公司（按 id 升序，导出用）
    pub fn list_all(&self) -> RepositoryResult<Vec<Company>> {
        self.list_where(&format!(
            "SELECT {} FROM companies ORDER BY id",
            COMPANY_COLUMNS
        ), None)
    }

    /// 指定状态的公司（新到旧）
    pub fn list_by_status(&self, status: CompanyStatus) -> RepositoryResult<Vec<Company>> {
        self.list_where(
            &format!(
                "SELECT {} FROM companies WHERE status = ?1 ORDER BY created_at DESC, id DESC",
                COMPANY_COLUMNS
            ),
            Some(status.as_str()),
        )
    }

    fn list_where(&self, sql: &str, param: Option<&str>) -> RepositoryResult<Vec<Company>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(sql)?;
        let companies = match param {
            Some(p) => stmt
                .query_map(params![p], map_row)?
                .collect::<SqliteResult<Vec<_>>>()?,
            None => stmt.query_map([], map_row)?.collect::<SqliteResult<Vec<_>>>()?,
        };
        companies
            .into_iter()
            .map(|c| load_categories(&conn, c))
            .collect()
    }
}

fn not_found(id: i64) -> RepositoryError {
    RepositoryError::NotFound {
        entity: "Company".to_string(),
        id: id.to_string(),
    }
}

fn replace_categories(tx: &Transaction, company_id: i64, category_ids: &[i64]) -> RepositoryResult<()> {
    tx.execute(
        "DELETE FROM company_categories WHERE company_id = ?1",
        params![company_id],
    )?;
    for category_id in category_ids {
        tx.execute(
            "INSERT OR IGNORE INTO company_categories (company_id, category_id) VALUES (?1, ?2)",
            params![company_id, category_id],
        )?;
    }
    Ok(())
}

fn load_categories(conn: &Connection, mut company: Company) -> RepositoryResult<Company> {
    let mut stmt = conn.prepare(
        "SELECT category_id FROM company_categories WHERE company_id = ?1 ORDER BY category_id",
    )?;
    company.category_ids = stmt
        .query_map(params![company.id], |row| row.get(0))?
        .collect::<SqliteResult<Vec<i64>>>()?;
    Ok(company)
}

fn map_row(row: &Row) -> rusqlite::Result<Company> {
    let supplier_type: String = row.get(6)?;
    let status: String = row.get(7)?;
    let contacts: String = row.get(8)?;
    let legal_info: String = row.get(9)?;
    let payment_methods: String = row.get(10)?;
    let work_schedule: String = row.get(11)?;
    let created_at: String = row.get(13)?;

    Ok(Company {
        id: row.get(0)?,
        name: row.get(1)?,
        owner_id: row.get(2)?,
        description: row.get(3)?,
        city: row.get(4)?,
        address: row.get(5)?,
        supplier_type: code_from_sql(6, &supplier_type, SupplierType::from_code)?,
        status: code_from_sql(7, &status, CompanyStatus::from_code)?,
        contacts: json_from_sql(8, &contacts)?,
        legal_info: json_from_sql(9, &legal_info)?,
        payment_methods: json_from_sql(10, &payment_methods)?,
        work_schedule: json_from_sql(11, &work_schedule)?,
        rating: row.get(12)?,
        category_ids: Vec::new(),
        created_at: ts_from_sql(13, &created_at)?,
    })
}
