// ==========================================
// B2B 交易平台 - 导入资源接口
// ==========================================
// 资源 (Resource): 一种实体的“列 ↔ 字段”映射定义及单行导入逻辑
// 单行流程: 解析并校验全部单元格 → 匹配已有记录 → 解析关联记录 → 比较 → 写入
// ==========================================

use crate::importer::error::ImportResult;
use crate::importer::field_mapper::{ColumnSpec, RowReader};
use crate::importer::report::RowOutcome;
use chrono::NaiveDateTime;
use std::collections::HashSet;

/// 单次导入的运行参数
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// 关联记录缺失时是否自动创建
    pub auto_create: bool,
    /// 错误预览条数
    pub error_limit: usize,
    /// 报告语言
    pub locale: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            auto_create: false,
            error_limit: 10,
            locale: crate::i18n::DEFAULT_LOCALE.to_string(),
        }
    }
}

/// 单次导入的运行上下文（跨行共享）
#[derive(Debug, Clone)]
pub struct ImportContext {
    pub auto_create: bool,
    pub now: NaiveDateTime,

    /// 本次导入中由数据行新建的分类（同名行不互相匹配）
    pub created_category_ids: HashSet<i64>,

    /// 自动创建的关联记录数
    pub auto_created: usize,
}

impl ImportContext {
    pub fn new(auto_create: bool, now: NaiveDateTime) -> Self {
        Self {
            auto_create,
            now,
            created_category_ids: HashSet::new(),
            auto_created: 0,
        }
    }
}

/// 导入资源 Trait
pub trait ImportResource {
    /// 资源名（日志用）
    fn name(&self) -> &'static str;

    /// 列定义（导入与导出共用同一组表头）
    fn columns(&self) -> &'static [ColumnSpec];

    /// 导入单行
    ///
    /// # 返回
    /// - Created / Updated: 已写入
    /// - Unchanged: 与已有记录一致，未写入
    /// - Err: 行级错误，由引擎记录后继续下一行
    fn import_row(&self, ctx: &mut ImportContext, row: &RowReader<'_>) -> ImportResult<RowOutcome>;
}

/// 按“有值才覆盖”的规则写入字段
pub(crate) fn apply<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}
