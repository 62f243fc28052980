// ==========================================
// B2B 交易平台 - 商品导入资源
// ==========================================
// 业务键: (公司, 名称)
// 公司 / 分类按名称精确匹配，缺失时按 auto_create 决定创建或报错
// ==========================================

use crate::domain::product::Product;
use crate::domain::types::Currency;
use crate::importer::error::{ImportResult, StorageContext};
use crate::importer::field_mapper::{ColumnSpec, RowReader};
use crate::importer::related::RelatedResolver;
use crate::importer::report::RowOutcome;
use crate::importer::resource::{apply, ImportContext, ImportResource};
use crate::repository::ProductRepository;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::debug;

pub const PRODUCT_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::optional("id", "ID"),
    ColumnSpec::required("company", "Компания"),
    ColumnSpec::required("title", "Название"),
    ColumnSpec::optional("category", "Категория"),
    ColumnSpec::optional("description", "Описание"),
    ColumnSpec::optional("price", "Цена"),
    ColumnSpec::optional("currency", "Валюта"),
    ColumnSpec::optional("stock", "Остаток"),
    ColumnSpec::optional("is_active", "Активен"),
];

#[derive(Debug)]
struct ProductRow {
    id: Option<i64>,
    company: String,
    title: String,
    category: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    currency: Option<Currency>,
    in_stock: Option<bool>,
    is_active: Option<bool>,
}

pub struct ProductResource {
    products: ProductRepository,
    related: RelatedResolver,
}

impl ProductResource {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            products: ProductRepository::new(conn.clone()),
            related: RelatedResolver::new(conn),
        }
    }

    fn parse_row(&self, row: &RowReader<'_>) -> ImportResult<ProductRow> {
        Ok(ProductRow {
            id: row.record_id("id"),
            company: row.required_text("company")?,
            title: row.required_text("title")?,
            category: row.text("category"),
            description: row.text("description"),
            price: row.decimal("price")?,
            currency: row.convert("currency", Currency::from_code)?,
            in_stock: row.stock("stock")?,
            is_active: row.bool_ru("is_active"),
        })
    }
}

impl ImportResource for ProductResource {
    fn name(&self) -> &'static str {
        "product"
    }

    fn columns(&self) -> &'static [ColumnSpec] {
        PRODUCT_COLUMNS
    }

    fn import_row(&self, ctx: &mut ImportContext, row: &RowReader<'_>) -> ImportResult<RowOutcome> {
        let row_number = row.row_number();
        let parsed = self.parse_row(row)?;

        // ===== 关联记录 =====
        let company_id = self
            .related
            .resolve_company(ctx, row_number, &parsed.company)?;
        let category_id = match &parsed.category {
            Some(name) => Some(self.related.resolve_category(ctx, row_number, name)?),
            None => None,
        };

        // ===== 匹配已有记录 =====
        let by_id = match parsed.id {
            Some(id) => self.products.find_by_id(id).at_row(row_number)?,
            None => None,
        };
        let existing = match by_id {
            Some(product) => Some(product),
            None => self
                .products
                .find_by_company_and_title(company_id, &parsed.title)
                .at_row(row_number)?,
        };

        // ===== 组装候选记录 =====
        let mut candidate = match &existing {
            Some(product) => product.clone(),
            None => Product::new(company_id, &parsed.title, ctx.now),
        };
        candidate.company_id = company_id;
        candidate.title = parsed.title;
        if category_id.is_some() {
            candidate.category_id = category_id;
        }
        apply(&mut candidate.description, parsed.description);
        if parsed.price.is_some() {
            candidate.price = parsed.price;
        }
        apply(&mut candidate.currency, parsed.currency);
        apply(&mut candidate.in_stock, parsed.in_stock);
        apply(&mut candidate.is_active, parsed.is_active);

        // ===== 写入 =====
        match existing {
            Some(current) if current == candidate => {
                debug!(row = row_number, product_id = current.id, "数据未变化，跳过");
                Ok(RowOutcome::Unchanged)
            }
            Some(_) => {
                self.products.update(&candidate).at_row(row_number)?;
                debug!(row = row_number, product_id = candidate.id, "商品已更新");
                Ok(RowOutcome::Updated)
            }
            None => {
                let id = self.products.insert(&candidate).at_row(row_number)?;
                debug!(row = row_number, product_id = id, "商品已创建");
                Ok(RowOutcome::Created)
            }
        }
    }
}
