// ==========================================
// B2B 交易平台 - 用户仓储
// ==========================================

use crate::domain::user::User;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const USER_COLUMNS: &str = "id, username, email, is_superuser, is_staff";

pub struct UserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入用户，返回新 id
    pub fn insert(&self, user: &User) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO users (username, email, is_superuser, is_staff) VALUES (?1, ?2, ?3, ?4)",
            params![user.username, user.email, user.is_superuser, user.is_staff],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        self.find_one(&format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS), id)
    }

    pub fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        self.find_one(
            &format!("SELECT {} FROM users WHERE username = ?1", USER_COLUMNS),
            username,
        )
    }

    /// 邮箱匹配（忽略大小写）
    pub fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        self.find_one(
            &format!(
                "SELECT {} FROM users WHERE lower(email) = lower(?1) ORDER BY id LIMIT 1",
                USER_COLUMNS
            ),
            email,
        )
    }

    /// 第一个超级用户（作为系统兜底用户）
    pub fn first_superuser(&self) -> RepositoryResult<Option<User>> {
        let conn = self.get_conn()?;
        let user = conn
            .query_row(
                &format!(
                    "SELECT {} FROM users WHERE is_superuser = 1 ORDER BY id LIMIT 1",
                    USER_COLUMNS
                ),
                [],
                map_row,
            )
            .optional()?;
        Ok(user)
    }

    fn find_one<P: rusqlite::ToSql>(&self, sql: &str, param: P) -> RepositoryResult<Option<User>> {
        let conn = self.get_conn()?;
        let user = conn.query_row(sql, params![param], map_row).optional()?;
        Ok(user)
    }
}

fn map_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        is_superuser: row.get(3)?,
        is_staff: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> UserRepository {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        UserRepository::new(Arc::new(Mutex::new(conn)))
    }

    fn user(username: &str, email: &str, is_superuser: bool) -> User {
        User {
            id: 0,
            username: username.to_string(),
            email: email.to_string(),
            is_superuser,
            is_staff: is_superuser,
        }
    }

    #[test]
    fn test_lookup_by_username_and_email() {
        let repo = setup();
        let id = repo.insert(&user("aigerim", "Aigerim@Example.kz", false)).unwrap();

        assert_eq!(repo.find_by_username("aigerim").unwrap().unwrap().id, id);
        assert_eq!(repo.find_by_email("aigerim@example.kz").unwrap().unwrap().id, id);
        assert!(repo.find_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn test_first_superuser() {
        let repo = setup();
        assert!(repo.first_superuser().unwrap().is_none());

        repo.insert(&user("buyer", "buyer@example.kz", false)).unwrap();
        let admin_id = repo.insert(&user("admin", "admin@example.kz", true)).unwrap();
        repo.insert(&user("admin2", "admin2@example.kz", true)).unwrap();

        assert_eq!(repo.first_superuser().unwrap().unwrap().id, admin_id);
    }
}
