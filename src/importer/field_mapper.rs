// ==========================================
// B2B 交易平台 - 字段映射器实现
// ==========================================
// 职责: 本地化表头 → 字段键映射 + 单元格类型转换
// 表头按名称匹配（TRIM + 忽略大小写），与列顺序无关
// 未填写的单元格一律为 None，不会覆盖已有值
// ==========================================

use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// 列定义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub key: &'static str,
    pub header: &'static str,
    pub aliases: &'static [&'static str],
    pub required: bool,
}

impl ColumnSpec {
    pub const fn required(key: &'static str, header: &'static str) -> Self {
        Self {
            key,
            header,
            aliases: &[],
            required: true,
        }
    }

    pub const fn optional(key: &'static str, header: &'static str) -> Self {
        Self {
            key,
            header,
            aliases: &[],
            required: false,
        }
    }

    pub const fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    fn matches(&self, header: &str) -> bool {
        let header = header.trim().to_lowercase();
        self.header.to_lowercase() == header
            || self.aliases.iter().any(|a| a.to_lowercase() == header)
    }
}

// ==========================================
// ColumnMap - 表头解析结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    indices: HashMap<&'static str, usize>,
    headers: HashMap<&'static str, &'static str>,
}

impl ColumnMap {
    /// 解析表头
    ///
    /// # 返回
    /// - Ok(ColumnMap): 全部必需列存在
    /// - Err(MissingColumns): 列出所有缺失的必需列
    pub fn resolve(headers: &[String], specs: &[ColumnSpec]) -> ImportResult<Self> {
        let mut map = ColumnMap::default();
        let mut missing = Vec::new();

        for spec in specs {
            map.headers.insert(spec.key, spec.header);
            match headers.iter().position(|h| spec.matches(h)) {
                Some(idx) => {
                    map.indices.insert(spec.key, idx);
                }
                None if spec.required => missing.push(spec.header.to_string()),
                None => {}
            }
        }

        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing));
        }
        Ok(map)
    }

    pub fn has_column(&self, key: &str) -> bool {
        self.indices.contains_key(key)
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.indices.get(key).copied()
    }

    fn header_of(&self, key: &str) -> String {
        self.headers.get(key).copied().unwrap_or(key).to_string()
    }
}

// ==========================================
// RowReader - 单行取值
// ==========================================
pub struct RowReader<'a> {
    row: &'a RawRow,
    columns: &'a ColumnMap,
    cleaner: DataCleaner,
}

impl<'a> RowReader<'a> {
    pub fn new(row: &'a RawRow, columns: &'a ColumnMap) -> Self {
        Self {
            row,
            columns,
            cleaner: DataCleaner,
        }
    }

    pub fn row_number(&self) -> usize {
        self.row.row_number
    }

    /// 文本值（列缺失或单元格为空 → None）
    pub fn text(&self, key: &str) -> Option<String> {
        let idx = self.columns.index_of(key)?;
        self.row
            .cell(idx)
            .and_then(|v| self.cleaner.normalize_null(v))
    }

    /// 必填文本值
    pub fn required_text(&self, key: &str) -> ImportResult<String> {
        self.text(key)
            .ok_or_else(|| ImportError::RequiredValueMissing {
                row: self.row_number(),
                column: self.columns.header_of(key),
            })
    }

    /// 记录 ID: 无法解析为整数时视为未填写
    pub fn record_id(&self, key: &str) -> Option<i64> {
        self.text(key)
            .and_then(|v| self.cleaner.parse_integer(&v))
            .filter(|id| *id > 0)
    }

    /// 小数值（非数字 → 行级错误）
    pub fn decimal(&self, key: &str) -> ImportResult<Option<f64>> {
        self.convert(key, |v| self.cleaner.parse_decimal(v))
    }

    /// 库存数量 → 是否有货（非数字 → 行级错误）
    pub fn stock(&self, key: &str) -> ImportResult<Option<bool>> {
        self.convert(key, |v| self.cleaner.parse_stock(v))
    }

    /// 俄文布尔值（未识别的值视为未填写）
    pub fn bool_ru(&self, key: &str) -> Option<bool> {
        self.text(key).and_then(|v| self.cleaner.parse_bool_ru(&v))
    }

    /// JSON 单元格: 格式错误时回落到 default，不记错误
    pub fn json_or(&self, key: &str, default: JsonValue) -> Option<JsonValue> {
        let raw = self.text(key)?;
        match self.cleaner.parse_json(&raw) {
            Some(value) => Some(value),
            None => {
                tracing::debug!(
                    row = self.row_number(),
                    column = %self.columns.header_of(key),
                    "JSON 单元格格式错误，使用空默认值"
                );
                Some(default)
            }
        }
    }

    /// 列表单元格（按分隔符拆分）
    pub fn list(&self, key: &str, separator: char) -> Option<Vec<String>> {
        self.text(key)
            .map(|v| self.cleaner.split_list(&v, separator))
    }

    /// 自定义转换，失败记为类型转换错误
    pub fn convert<T>(
        &self,
        key: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> ImportResult<Option<T>> {
        match self.text(key) {
            None => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| ImportError::TypeConversionError {
                    row: self.row_number(),
                    column: self.columns.header_of(key),
                    value: raw,
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SPECS: &[ColumnSpec] = &[
        ColumnSpec::optional("id", "ID"),
        ColumnSpec::required("name", "Название").with_aliases(&["name"]),
        ColumnSpec::required("company", "Компания"),
        ColumnSpec::optional("price", "Цена"),
        ColumnSpec::optional("contacts", "Контакты"),
    ];

    fn headers(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn row(cells: &[&str]) -> RawRow {
        RawRow {
            row_number: 2,
            cells: cells.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_missing_required_columns_are_all_named() {
        let err = ColumnMap::resolve(&headers(&["ID", "Цена"]), SPECS).unwrap_err();
        match err {
            ImportError::MissingColumns(cols) => {
                assert_eq!(cols, vec!["Название".to_string(), "Компания".to_string()])
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_headers_match_by_name_case_insensitive() {
        let map = ColumnMap::resolve(&headers(&["компания", " NAME "]), SPECS).unwrap();
        let raw = row(&["Acme", "Труба"]);
        let reader = RowReader::new(&raw, &map);
        assert_eq!(reader.text("name"), Some("Труба".to_string()));
        assert_eq!(reader.text("company"), Some("Acme".to_string()));
        assert_eq!(reader.text("price"), None);
    }

    #[test]
    fn test_required_value_and_conversion_errors() {
        let map = ColumnMap::resolve(&headers(&["Название", "Компания", "Цена", "ID"]), SPECS)
            .unwrap();
        let raw = row(&["", "Acme", "дорого", "abc"]);
        let reader = RowReader::new(&raw, &map);

        assert!(matches!(
            reader.required_text("name"),
            Err(ImportError::RequiredValueMissing { row: 2, ref column }) if column == "Название"
        ));
        assert!(matches!(
            reader.decimal("price"),
            Err(ImportError::TypeConversionError { ref value, .. }) if value == "дорого"
        ));
        assert_eq!(reader.record_id("id"), None);
    }

    #[test]
    fn test_malformed_json_falls_back_to_default() {
        let map = ColumnMap::resolve(&headers(&["Название", "Компания", "Контакты"]), SPECS)
            .unwrap();
        let raw = row(&["Acme", "Acme", "{not json"]);
        let reader = RowReader::new(&raw, &map);
        assert_eq!(reader.json_or("contacts", json!({})), Some(json!({})));
    }
}
