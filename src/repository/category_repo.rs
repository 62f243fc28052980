// ==========================================
// B2B 交易平台 - 分类仓储
// ==========================================
// 约束: slug 在数据库层唯一 (UNIQUE)
// ==========================================

use crate::domain::category::Category;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const CATEGORY_COLUMNS: &str = "id, name, slug, parent_id, is_active";

pub struct CategoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CategoryRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入分类，返回新 id
    pub fn insert(&self, category: &Category) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO categories (name, slug, parent_id, is_active) VALUES (?1, ?2, ?3, ?4)",
            params![
                category.name,
                category.slug,
                category.parent_id,
                category.is_active
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update(&self, category: &Category) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE categories SET name = ?2, slug = ?3, parent_id = ?4, is_active = ?5 WHERE id = ?1",
            params![
                category.id,
                category.name,
                category.slug,
                category.parent_id,
                category.is_active
            ],
        )?;
        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Category".to_string(),
                id: category.id.to_string(),
            });
        }
        Ok(())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Category>> {
        let conn = self.get_conn()?;
        let category = conn
            .query_row(
                &format!("SELECT {} FROM categories WHERE id = ?1", CATEGORY_COLUMNS),
                params![id],
                map_row,
            )
            .optional()?;
        Ok(category)
    }

    pub fn find_by_slug(&self, slug: &str) -> RepositoryResult<Option<Category>> {
        let conn = self.get_conn()?;
        let category = conn
            .query_row(
                &format!("SELECT {} FROM categories WHERE slug = ?1", CATEGORY_COLUMNS),
                params![slug],
                map_row,
            )
            .optional()?;
        Ok(category)
    }

    /// 按名称精确匹配（可能多条，按 id 升序）
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Vec<Category>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM categories WHERE name = ?1 ORDER BY id",
            CATEGORY_COLUMNS
        ))?;
        let categories = stmt
            .query_map(params![name], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(categories)
    }

    /// slug 是否已被其他记录占用
    pub fn slug_taken(&self, slug: &str, exclude_id: Option<i64>) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let taken = conn
            .query_row(
                "SELECT 1 FROM categories WHERE slug = ?1 AND id != ?2 LIMIT 1",
                params![slug, exclude_id.unwrap_or(0)],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(taken)
    }

    /// 全部分类（按 id 升序，导出用）
    pub fn list_all(&self) -> RepositoryResult<Vec<Category>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM categories ORDER BY id",
            CATEGORY_COLUMNS
        ))?;
        let categories = stmt
            .query_map([], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(categories)
    }
}

fn map_row(row: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        parent_id: row.get(3)?,
        is_active: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> CategoryRepository {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        CategoryRepository::new(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_insert_and_lookup() {
        let repo = setup();
        let parent = repo.insert(&Category::new("Металл", "металл", None)).unwrap();
        let child = repo
            .insert(&Category::new("Трубы", "трубы", Some(parent)))
            .unwrap();

        let found = repo.find_by_slug("трубы").unwrap().unwrap();
        assert_eq!(found.id, child);
        assert_eq!(found.parent_id, Some(parent));
        assert!(found.is_active);
        let by_name = repo.find_by_name("Металл").unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, parent);
    }

    #[test]
    fn test_find_by_name_returns_all_namesakes() {
        let repo = setup();
        let first = repo.insert(&Category::new("Трубы", "трубы", None)).unwrap();
        let second = repo.insert(&Category::new("Трубы", "трубы-1", None)).unwrap();

        let ids: Vec<i64> = repo.find_by_name("Трубы").unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![first, second]);
        assert!(repo.find_by_name("Дерево").unwrap().is_empty());
    }

    #[test]
    fn test_slug_taken_excludes_self() {
        let repo = setup();
        let id = repo.insert(&Category::new("Металл", "металл", None)).unwrap();

        assert!(repo.slug_taken("металл", None).unwrap());
        assert!(!repo.slug_taken("металл", Some(id)).unwrap());
        assert!(!repo.slug_taken("дерево", None).unwrap());
    }

    #[test]
    fn test_duplicate_slug_is_rejected() {
        let repo = setup();
        repo.insert(&Category::new("Металл", "металл", None)).unwrap();
        let err = repo
            .insert(&Category::new("Металл 2", "металл", None))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }

    #[test]
    fn test_deleting_parent_cascades() {
        let repo = setup();
        let parent = repo.insert(&Category::new("Металл", "металл", None)).unwrap();
        repo.insert(&Category::new("Трубы", "трубы", Some(parent)))
            .unwrap();

        {
            let conn = repo.get_conn().unwrap();
            conn.execute("DELETE FROM categories WHERE id = ?1", params![parent])
                .unwrap();
        }
        assert!(repo.list_all().unwrap().is_empty());
    }
}
