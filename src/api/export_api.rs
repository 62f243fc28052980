// ==========================================
// B2B 交易平台 - 导出 API
// ==========================================
// 职责: 资源导出与导入模板下载
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::import_api::ResourceKind;
use crate::exporter::{category_template, company_template, product_template, Exporter};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::info;

/// xlsx 的 MIME 类型
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// 生成的文件
#[derive(Debug, Clone)]
pub struct XlsxFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct ExportApi {
    conn: Arc<Mutex<Connection>>,
}

impl ExportApi {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 导出全部记录（按 id 排序）
    pub async fn export(&self, kind: ResourceKind) -> ApiResult<XlsxFile> {
        let conn = self.conn.clone();
        let bytes = tokio::task::spawn_blocking(move || {
            let exporter = Exporter::new(conn);
            match kind {
                ResourceKind::Companies => exporter.export_companies(),
                ResourceKind::Products => exporter.export_products(),
                ResourceKind::Categories => exporter.export_categories(),
            }
        })
        .await
        .map_err(|e| ApiError::InternalError(format!("导出任务异常终止: {}", e)))??;

        info!(resource = %kind, size = bytes.len(), "导出完成");
        Ok(XlsxFile {
            file_name: format!("{}_export.xlsx", kind),
            bytes,
        })
    }

    /// 导入模板（表头 + 示例行 + 说明页）
    pub fn template(&self, kind: ResourceKind) -> ApiResult<XlsxFile> {
        let bytes = match kind {
            ResourceKind::Companies => company_template()?,
            ResourceKind::Products => product_template()?,
            ResourceKind::Categories => category_template()?,
        };
        Ok(XlsxFile {
            file_name: format!("sample_{}_import.xlsx", kind),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> ExportApi {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ExportApi::new(Arc::new(Mutex::new(conn)))
    }

    #[tokio::test]
    async fn test_export_empty_table_has_header_only() {
        let file = api().export(ResourceKind::Categories).await.unwrap();
        assert_eq!(file.file_name, "categories_export.xlsx");
        assert!(!file.bytes.is_empty());
    }

    #[test]
    fn test_template_file_name() {
        let file = api().template(ResourceKind::Companies).unwrap();
        assert_eq!(file.file_name, "sample_companies_import.xlsx");
    }
}
