// ==========================================
// B2B 交易平台 - 仓储层列编解码辅助
// ==========================================

use crate::db::TS_FORMAT;
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use serde::de::DeserializeOwned;

/// 时间戳 → 存储字符串
pub(crate) fn ts_to_sql(ts: &NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}

/// 存储字符串 → 时间戳
pub(crate) fn ts_from_sql(idx: usize, raw: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TS_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// JSON 列 → 类型
pub(crate) fn json_from_sql<T: DeserializeOwned>(idx: usize, raw: &str) -> rusqlite::Result<T> {
    serde_json::from_str(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// 枚举代码列 → 枚举
pub(crate) fn code_from_sql<T>(
    idx: usize,
    raw: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    parse(raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("未知代码: {}", raw).into(),
        )
    })
}
