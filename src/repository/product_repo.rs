// ==========================================
// B2B 交易平台 - 商品仓储
// ==========================================

use crate::domain::product::Product;
use crate::domain::types::Currency;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_util::{code_from_sql, ts_from_sql, ts_to_sql};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const PRODUCT_COLUMNS: &str = r#"
    id, company_id, title, category_id, description, price, currency,
    in_stock, is_active, on_sale, created_at
"#;

pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
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

    pub fn insert(&self, product: &Product) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO products (
                company_id, title, category_id, description, price, currency,
                in_stock, is_active, on_sale, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                product.company_id,
                product.title,
                product.category_id,
                product.description,
                product.price,
                product.currency.as_str(),
                product.in_stock,
                product.is_active,
                product.on_sale,
                ts_to_sql(&product.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(&self, product: &Product) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE products SET
                company_id = ?2, title = ?3, category_id = ?4, description = ?5,
                price = ?6, currency = ?7, in_stock = ?8, is_active = ?9, on_sale = ?10
            WHERE id = ?1
            "#,
            params![
                product.id,
                product.company_id,
                product.title,
                product.category_id,
                product.description,
                product.price,
                product.currency.as_str(),
                product.in_stock,
                product.is_active,
                product.on_sale,
            ],
        )?;
        if rows == 0 {
            return Err(not_found(product.id));
        }
        Ok(())
    }

    /// 上架/下架（审核）
    pub fn set_active(&self, id: i64, is_active: bool) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE products SET is_active = ?2 WHERE id = ?1",
            params![id, is_active],
        )?;
        if rows == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// 批量设置促销标记
    pub fn set_on_sale(&self, ids: &[i64], on_sale: bool) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let mut count = 0;
        for id in ids {
            count += tx.execute(
                "UPDATE products SET on_sale = ?2 WHERE id = ?1",
                params![id, on_sale],
            )?;
        }
        tx.commit()?;
        Ok(count)
    }

    // ==========================================
    // 查询操作
    // ==========================================

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let product = conn
            .query_row(
                &format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS),
                params![id],
                map_row,
            )
            .optional()?;
        Ok(product)
    }

    /// 业务键匹配: (公司, 标题)
    pub fn find_by_company_and_title(
        &self,
        company_id: i64,
        title: &str,
    ) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let product = conn
            .query_row(
                &format!(
                    "SELECT {} FROM products WHERE company_id = ?1 AND title = ?2 ORDER BY id LIMIT 1",
                    PRODUCT_COLUMNS
                ),
                params![company_id, title],
                map_row,
            )
            .optional()?;
        Ok(product)
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<Product>> {
        self.list(&format!("SELECT {} FROM products ORDER BY id", PRODUCT_COLUMNS))
    }

    /// 待审核商品（未上架，新到旧）
    pub fn list_inactive(&self) -> RepositoryResult<Vec<Product>> {
        self.list(&format!(
            "SELECT {} FROM products WHERE is_active = 0 ORDER BY created_at DESC, id DESC",
            PRODUCT_COLUMNS
        ))
    }

    fn list(&self, sql: &str) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(sql)?;
        let products = stmt
            .query_map([], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(products)
    }
}

fn not_found(id: i64) -> RepositoryError {
    RepositoryError::NotFound {
        entity: "Product".to_string(),
        id: id.to_string(),
    }
}

fn map_row(row: &Row) -> rusqlite::Result<Product> {
    let currency: String = row.get(6)?;
    let created_at: String = row.get(10)?;
    Ok(Product {
        id: row.get(0)?,
        company_id: row.get(1)?,
        title: row.get(2)?,
        category_id: row.get(3)?,
        description: row.get(4)?,
        price: row.get(5)?,
        currency: code_from_sql(6, &currency, Currency::from_code)?,
        in_stock: row.get(7)?,
        is_active: row.get(8)?,
        on_sale: row.get(9)?,
        created_at: ts_from_sql(10, &created_at)?,
    })
}
