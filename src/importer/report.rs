// ==========================================
// B2B 交易平台 - 导入结果报告
// ==========================================
// 计数: created / updated / skipped（未变化的行与出错的行均计入 skipped）
// 错误: "Строка N: 原因"，仅保留前 N 条，其余汇总为一条 "... и ещё K ошибок"
// ==========================================

use crate::i18n::t_in;
use serde::{Deserialize, Serialize};

/// 单行处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Created,
    Updated,
    Unchanged,
}

/// 导入结果（接口响应体）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub total_rows: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<String>,

    /// 自动创建的关联记录数（仅用于日志）
    #[serde(skip)]
    pub auto_created: usize,
}

impl ImportReport {
    pub fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Created => self.created += 1,
            RowOutcome::Updated => self.updated += 1,
            RowOutcome::Unchanged => self.skipped += 1,
        }
    }
}

// ==========================================
// ErrorCollector - 行级错误收集
// ==========================================
pub struct ErrorCollector {
    limit: usize,
    locale: String,
    shown: Vec<String>,
    hidden: usize,
}

impl ErrorCollector {
    pub fn new(limit: usize, locale: &str) -> Self {
        Self {
            limit,
            locale: locale.to_string(),
            shown: Vec::new(),
            hidden: 0,
        }
    }

    /// 记录一条行级错误
    pub fn push(&mut self, row: usize, message: &str) {
        if self.shown.len() < self.limit {
            self.shown.push(t_in(
                &self.locale,
                "import.row_error",
                &[("row", &row.to_string()), ("message", message)],
            ));
        } else {
            self.hidden += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.shown.len() + self.hidden
    }

    /// 生成最终错误列表（超出部分汇总为一条）
    pub fn finish(mut self) -> Vec<String> {
        if self.hidden > 0 {
            self.shown.push(t_in(
                &self.locale,
                "import.more_errors",
                &[("count", &self.hidden.to_string())],
            ));
        }
        self.shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_preview_is_capped() {
        let mut collector = ErrorCollector::new(2, "ru");
        for row in 2..7 {
            collector.push(row, "ошибка");
        }
        assert_eq!(collector.total(), 5);

        let errors = collector.finish();
        assert_eq!(
            errors,
            vec![
                "Строка 2: ошибка".to_string(),
                "Строка 3: ошибка".to_string(),
                "... и ещё 3 ошибок".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_summary_when_under_limit() {
        let mut collector = ErrorCollector::new(10, "en");
        collector.push(4, "bad");
        assert_eq!(collector.finish(), vec!["Row 4: bad".to_string()]);
    }

    #[test]
    fn test_report_serializes_contract_fields_only() {
        let mut report = ImportReport {
            total_rows: 3,
            auto_created: 2,
            ..Default::default()
        };
        report.record(RowOutcome::Created);
        report.record(RowOutcome::Unchanged);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["created"], 1);
        assert_eq!(value["skipped"], 1);
        assert!(value.get("auto_created").is_none());
    }
}
