// ==========================================
// B2B 交易平台 - 批量导入引擎
// ==========================================
// 流程:
// 阶段 0: 文件解析（扩展名 / 工作簿 / 表头）→ 失败则整批终止
// 阶段 1: 表头映射（缺少必需列 → 整批终止）
// 阶段 2: 逐行导入，单行失败只记录错误并计入 skipped
// 阶段 3: 汇总报告（错误预览截断）
// ==========================================

use crate::importer::error::ImportResult;
use crate::importer::field_mapper::{ColumnMap, RowReader};
use crate::importer::file_parser::{ExcelParser, RawSheet};
use crate::importer::report::{ErrorCollector, ImportReport};
use crate::importer::resource::{ImportContext, ImportOptions, ImportResource};
use chrono::{Timelike, Utc};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

pub struct ImportEngine<R: ImportResource> {
    resource: R,
    parser: ExcelParser,
}

impl<R: ImportResource> ImportEngine<R> {
    pub fn new(resource: R) -> Self {
        Self {
            resource,
            parser: ExcelParser,
        }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    /// 导入上传的文件
    ///
    /// # 参数
    /// - file_name: 原始文件名
    /// - bytes: 文件内容
    /// - options: 运行参数
    ///
    /// # 返回
    /// - Ok(ImportReport): 已处理全部数据行（可能含行级错误）
    /// - Err(ImportError): 请求级错误，未处理任何行
    #[instrument(skip(self, bytes, options), fields(resource = self.resource.name(), size = bytes.len()))]
    pub fn import_bytes(
        &self,
        file_name: &str,
        bytes: &[u8],
        options: &ImportOptions,
    ) -> ImportResult<ImportReport> {
        let sheet = self.parser.parse_bytes(file_name, bytes)?;
        self.import_sheet(&sheet, options)
    }

    /// 导入已解析的工作表
    pub fn import_sheet(&self, sheet: &RawSheet, options: &ImportOptions) -> ImportResult<ImportReport> {
        let start = Instant::now();
        let columns = ColumnMap::resolve(&sheet.headers, self.resource.columns())?;

        // 时间戳按秒存储
        let now = Utc::now().naive_utc();
        let now = now.with_nanosecond(0).unwrap_or(now);

        let mut ctx = ImportContext::new(options.auto_create, now);
        let mut errors = ErrorCollector::new(options.error_limit, &options.locale);
        let mut report = ImportReport {
            total_rows: sheet.rows.len(),
            ..Default::default()
        };

        for raw in &sheet.rows {
            let reader = RowReader::new(raw, &columns);
            match self.resource.import_row(&mut ctx, &reader) {
                Ok(outcome) => report.record(outcome),
                Err(e) => {
                    debug!(row = raw.row_number, error = %e, "行导入失败");
                    errors.push(raw.row_number, &e.localized(&options.locale));
                    report.skipped += 1;
                }
            }
        }

        let error_count = errors.total();
        report.errors = errors.finish();
        report.auto_created = ctx.auto_created;

        if report.auto_created > 0 {
            warn!(
                resource = self.resource.name(),
                auto_created = report.auto_created,
                "导入过程中自动创建了关联记录"
            );
        }
        info!(
            resource = self.resource.name(),
            total_rows = report.total_rows,
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            errors = error_count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "导入完成"
        );

        Ok(report)
    }
}
