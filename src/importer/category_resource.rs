// ==========================================
// B2B 交易平台 - 分类导入资源
// ==========================================
// 匹配顺序:
// 1. ID（存在且为整数）
// 2. 填写了 slug → 按 slug
// 3. 未填写 slug → 按 slugify(名称)，但不匹配本次导入中新建的记录
//    （同一文件中的同名行生成不同记录，重复导入仍保持幂等）
// slug 冲突时追加 -1, -2, ... 直至全局唯一
// ==========================================

use crate::domain::category::{slugify, Category};
use crate::importer::error::{ImportError, ImportResult, StorageContext};
use crate::importer::field_mapper::{ColumnSpec, RowReader};
use crate::importer::related::RelatedResolver;
use crate::importer::report::RowOutcome;
use crate::importer::resource::{apply, ImportContext, ImportResource};
use crate::repository::CategoryRepository;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::debug;

pub const CATEGORY_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::optional("id", "ID"),
    ColumnSpec::required("name", "Название").with_aliases(&["name"]),
    ColumnSpec::optional("slug", "Slug"),
    ColumnSpec::optional("parent", "Родитель").with_aliases(&["parent"]),
    ColumnSpec::optional("is_active", "Активна").with_aliases(&["is_active"]),
];

#[derive(Debug)]
struct CategoryRow {
    id: Option<i64>,
    name: String,
    slug: Option<String>,
    parent: Option<String>,
    is_active: Option<bool>,
}

pub struct CategoryResource {
    categories: CategoryRepository,
    related: RelatedResolver,
}

impl CategoryResource {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            categories: CategoryRepository::new(conn.clone()),
            related: RelatedResolver::new(conn),
        }
    }

    fn parse_row(&self, row: &RowReader<'_>) -> ImportResult<CategoryRow> {
        Ok(CategoryRow {
            id: row.record_id("id"),
            name: row.required_text("name")?,
            slug: row.text("slug"),
            parent: row.text("parent"),
            is_active: row.bool_ru("is_active"),
        })
    }

    fn find_existing(
        &self,
        ctx: &ImportContext,
        parsed: &CategoryRow,
        row: usize,
    ) -> ImportResult<Option<Category>> {
        if let Some(id) = parsed.id {
            if let Some(category) = self.categories.find_by_id(id).at_row(row)? {
                return Ok(Some(category));
            }
        }

        match &parsed.slug {
            Some(slug) => self.categories.find_by_slug(slug).at_row(row),
            None => {
                let derived = slugify(&parsed.name);
                let found = self.categories.find_by_slug(&derived).at_row(row)?;
                Ok(found.filter(|c| !ctx.created_category_ids.contains(&c.id)))
            }
        }
    }
}

impl ImportResource for CategoryResource {
    fn name(&self) -> &'static str {
        "category"
    }

    fn columns(&self) -> &'static [ColumnSpec] {
        CATEGORY_COLUMNS
    }

    fn import_row(&self, ctx: &mut ImportContext, row: &RowReader<'_>) -> ImportResult<RowOutcome> {
        let row_number = row.row_number();
        let parsed = self.parse_row(row)?;
        let existing = self.find_existing(ctx, &parsed, row_number)?;

        // ===== 父分类 =====
        let parent_id = match &parsed.parent {
            Some(parent) => {
                let parent_id = self.related.resolve_parent(ctx, row_number, parent)?;
                if existing.as_ref().map(|c| c.id) == Some(parent_id) {
                    return Err(ImportError::SelfParent(row_number));
                }
                Some(parent_id)
            }
            None => None,
        };

        // ===== 组装候选记录 =====
        let mut candidate = match &existing {
            Some(category) => category.clone(),
            None => {
                let base = parsed
                    .slug
                    .clone()
                    .unwrap_or_else(|| slugify(&parsed.name));
                let slug = self.related.unique_slug(&base, None).at_row(row_number)?;
                Category::new(&parsed.name, &slug, None)
            }
        };
        candidate.name = parsed.name;
        if let (Some(current), Some(slug)) = (&existing, &parsed.slug) {
            if &current.slug != slug {
                candidate.slug = self
                    .related
                    .unique_slug(slug, Some(current.id))
                    .at_row(row_number)?;
            }
        }
        if parent_id.is_some() {
            candidate.parent_id = parent_id;
        }
        apply(&mut candidate.is_active, parsed.is_active);

        // ===== 写入 =====
        match existing {
            Some(current) if current == candidate => {
                debug!(row = row_number, category_id = current.id, "数据未变化，跳过");
                Ok(RowOutcome::Unchanged)
            }
            Some(_) => {
                self.categories.update(&candidate).at_row(row_number)?;
                debug!(row = row_number, category_id = candidate.id, "分类已更新");
                Ok(RowOutcome::Updated)
            }
            None => {
                let id = self.categories.insert(&candidate).at_row(row_number)?;
                ctx.created_category_ids.insert(id);
                debug!(row = row_number, category_id = id, slug = %candidate.slug, "分类已创建");
                Ok(RowOutcome::Created)
            }
        }
    }
}
