// ==========================================
// B2B 交易平台 - 导入模块错误类型
// ==========================================
// 分级:
// - 请求级（整批终止）: 文件缺失 / 格式不支持 / 无法读取 / 缺少必需列
// - 行级（记录后继续）: 必填值为空 / 类型转换失败 / 关联记录缺失 / 存储失败
// 工具: thiserror 派生宏
// ==========================================

use crate::i18n::t_in;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误（请求级） =====
    #[error("未提供文件")]
    MissingFile,

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls）")]
    UnsupportedFormat(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("Excel 文件无表头行")]
    EmptySheet,

    #[error("缺少必需列: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    // ===== 数据映射错误（行级） =====
    #[error("必填值为空 (行 {row}, 列 {column})")]
    RequiredValueMissing { row: usize, column: String },

    #[error("类型转换失败 (行 {row}, 列 {column}): {value}")]
    TypeConversionError {
        row: usize,
        column: String,
        value: String,
    },

    #[error("关联记录不存在 (行 {row}, {entity}): {value}")]
    RelatedNotFound {
        row: usize,
        entity: RelatedEntity,
        value: String,
    },

    #[error("关联记录不唯一 (行 {row}, {entity}): {value} 匹配 {count} 条")]
    AmbiguousReference {
        row: usize,
        entity: RelatedEntity,
        value: String,
        count: usize,
    },

    #[error("无可用的系统用户 (行 {0})")]
    NoSystemUser(usize),

    #[error("分类不能以自身为父级 (行 {0})")]
    SelfParent(usize),

    // ===== 存储错误（行级） =====
    #[error("存储失败 (行 {row}): {source}")]
    Storage {
        row: usize,
        #[source]
        source: RepositoryError,
    },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 可自动创建的关联实体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelatedEntity {
    Company,
    Category,
    User,
}

impl RelatedEntity {
    fn i18n_key(&self) -> &'static str {
        match self {
            RelatedEntity::Company => "entity.company",
            RelatedEntity::Category => "entity.category",
            RelatedEntity::User => "entity.user",
        }
    }
}

impl std::fmt::Display for RelatedEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelatedEntity::Company => write!(f, "company"),
            RelatedEntity::Category => write!(f, "category"),
            RelatedEntity::User => write!(f, "user"),
        }
    }
}

impl ImportError {
    /// 是否终止整批导入
    pub fn is_request_fatal(&self) -> bool {
        matches!(
            self,
            ImportError::MissingFile
                | ImportError::UnsupportedFormat(_)
                | ImportError::ExcelParseError(_)
                | ImportError::EmptySheet
                | ImportError::MissingColumns(_)
        )
    }

    /// 面向用户的本地化消息（不含行号前缀）
    pub fn localized(&self, locale: &str) -> String {
        match self {
            ImportError::MissingFile => t_in(locale, "import.missing_file", &[]),
            ImportError::UnsupportedFormat(ext) => {
                t_in(locale, "import.unsupported_format", &[("ext", ext)])
            }
            ImportError::ExcelParseError(reason) => {
                t_in(locale, "import.unreadable_file", &[("reason", reason)])
            }
            ImportError::EmptySheet => t_in(locale, "import.empty_sheet", &[]),
            ImportError::MissingColumns(columns) => t_in(
                locale,
                "import.missing_columns",
                &[("columns", &columns.join(", "))],
            ),
            ImportError::RequiredValueMissing { column, .. } => {
                t_in(locale, "import.required_value", &[("column", column)])
            }
            ImportError::TypeConversionError { column, value, .. } => t_in(
                locale,
                "import.invalid_value",
                &[("column", column), ("value", value)],
            ),
            ImportError::RelatedNotFound { entity, value, .. } => {
                let entity_label = t_in(locale, entity.i18n_key(), &[]);
                t_in(
                    locale,
                    "import.related_not_found",
                    &[("entity", &entity_label), ("value", value)],
                )
            }
            ImportError::AmbiguousReference {
                entity,
                value,
                count,
                ..
            } => {
                let entity_label = t_in(locale, entity.i18n_key(), &[]);
                t_in(
                    locale,
                    "import.ambiguous_reference",
                    &[
                        ("entity", &entity_label),
                        ("value", value),
                        ("count", &count.to_string()),
                    ],
                )
            }
            ImportError::NoSystemUser(_) => t_in(locale, "import.no_system_user", &[]),
            ImportError::SelfParent(_) => t_in(locale, "import.self_parent", &[]),
            ImportError::Storage { source, .. } => t_in(
                locale,
                "import.storage_error",
                &[("reason", &source.to_string())],
            ),
            ImportError::InternalError(reason) => {
                t_in(locale, "import.internal", &[("reason", reason)])
            }
            ImportError::Other(e) => t_in(locale, "import.internal", &[("reason", &e.to_string())]),
        }
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// 仓储错误附加行号
pub(crate) trait StorageContext<T> {
    fn at_row(self, row: usize) -> ImportResult<T>;
}

impl<T> StorageContext<T> for Result<T, RepositoryError> {
    fn at_row(self, row: usize) -> ImportResult<T> {
        self.map_err(|source| ImportError::Storage { row, source })
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(ImportError::MissingColumns(vec!["Название".to_string()]).is_request_fatal());
        assert!(ImportError::UnsupportedFormat("csv".to_string()).is_request_fatal());
        assert!(!ImportError::RequiredValueMissing {
            row: 2,
            column: "Название".to_string()
        }
        .is_request_fatal());
    }

    #[test]
    fn test_localized_messages() {
        let err = ImportError::MissingColumns(vec!["Компания".to_string(), "Название".to_string()]);
        assert_eq!(
            err.localized("ru"),
            "Отсутствуют обязательные колонки: Компания, Название"
        );
        assert_eq!(
            err.localized("en"),
            "Missing required columns: Компания, Название"
        );

        let err = ImportError::RelatedNotFound {
            row: 3,
            entity: RelatedEntity::Category,
            value: "Трубы".to_string(),
        };
        assert!(err.localized("ru").starts_with("Категория «Трубы»"));
    }
}
