// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use b2b_marketplace::db::{init_schema, open_sqlite_connection};
use b2b_marketplace::domain::{Company, Review, User};
use b2b_marketplace::repository::{CompanyRepository, ReviewRepository, UserRepository};
use b2b_marketplace::ModerationStatus;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use rust_xlsxwriter::Workbook;
use std::error::Error;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开共享连接
pub fn shared_conn(db_path: &str) -> Arc<Mutex<Connection>> {
    Arc::new(Mutex::new(open_sqlite_connection(db_path).unwrap()))
}

/// 固定的测试时间
pub fn test_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 15)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

/// 插入用户
pub fn seed_user(conn: &Arc<Mutex<Connection>>, username: &str, is_superuser: bool) -> i64 {
    UserRepository::new(conn.clone())
        .insert(&User {
            id: 0,
            username: username.to_string(),
            email: format!("{}@example.kz", username),
            is_superuser,
            is_staff: is_superuser,
        })
        .unwrap()
}

/// 插入管理员
pub fn seed_admin(conn: &Arc<Mutex<Connection>>) -> i64 {
    seed_user(conn, "admin", true)
}

/// 插入公司
pub fn seed_company(conn: &Arc<Mutex<Connection>>, name: &str, owner_id: i64) -> i64 {
    CompanyRepository::new(conn.clone())
        .insert(&Company::new(name, owner_id, test_now()))
        .unwrap()
}

/// 插入评价
pub fn seed_review(
    conn: &Arc<Mutex<Connection>>,
    company_id: i64,
    author_id: i64,
    rating: i32,
    status: ModerationStatus,
) -> i64 {
    ReviewRepository::new(conn.clone())
        .insert(&Review {
            id: 0,
            company_id,
            author_id,
            rating,
            text: String::new(),
            status,
            created_at: test_now(),
        })
        .unwrap()
}

/// 生成单表 xlsx（第一行为表头，所有单元格写为文本，空字符串不写入）
pub fn build_xlsx(headers: &[&str], rows: &[Vec<&str>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (c, header) in headers.iter().enumerate() {
        sheet.write_string(0, c as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string((r + 1) as u32, c as u16, *value).unwrap();
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// 读取 xlsx 指定工作表为字符串矩阵
pub fn read_xlsx(bytes: &[u8], sheet_name: &str) -> Vec<Vec<String>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).unwrap();
    let range = workbook.worksheet_range(sheet_name).unwrap();
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

/// 工作表名称列表
pub fn sheet_names(bytes: &[u8]) -> Vec<String> {
    open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .unwrap()
        .sheet_names()
}
