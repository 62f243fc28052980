// ==========================================
// B2B 交易平台 - 数据导出
// ==========================================
// 表头与导入资源的列定义一致，导出 → 编辑 → 导入 时列保持对应
// JSON 字段输出为带缩进的文本（保留非 ASCII 字符），导入时再解析
// ==========================================

use crate::domain::category::Category;
use crate::domain::company::Company;
use crate::domain::product::Product;
use crate::exporter::xlsx_writer::{write_workbook, CellValue, ExportResult, SheetData};
use crate::importer::company_resource::{CATEGORY_SEPARATOR, COMPANY_EXPORT_ONLY_HEADER};
use crate::importer::field_mapper::ColumnSpec;
use crate::importer::{CATEGORY_COLUMNS, COMPANY_COLUMNS, PRODUCT_COLUMNS};
use crate::repository::{
    CategoryRepository, CompanyRepository, ProductRepository, UserRepository,
};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument};

pub const IN_STOCK_LABEL: &str = "в наличии";
pub const OUT_OF_STOCK_LABEL: &str = "нет в наличии";

pub(crate) fn headers_of(columns: &[ColumnSpec]) -> Vec<String> {
    columns.iter().map(|c| c.header.to_string()).collect()
}

pub(crate) fn yes_no(value: bool) -> CellValue {
    CellValue::text(if value { "да" } else { "нет" })
}

/// 分类引用文本: 名称唯一时写名称，同名时写 slug
fn category_refs(categories: &[Category]) -> HashMap<i64, String> {
    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    for category in categories {
        *name_counts.entry(category.name.as_str()).or_default() += 1;
    }
    categories
        .iter()
        .map(|c| {
            let reference = if name_counts.get(c.name.as_str()).copied().unwrap_or(0) > 1 {
                c.slug.clone()
            } else {
                c.name.clone()
            };
            (c.id, reference)
        })
        .collect()
}

pub(crate) fn pretty_json<T: Serialize>(value: &T) -> ExportResult<CellValue> {
    Ok(CellValue::text(serde_json::to_string_pretty(value)?))
}

pub struct Exporter {
    companies: CompanyRepository,
    products: ProductRepository,
    categories: CategoryRepository,
    users: UserRepository,
}

impl Exporter {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            companies: CompanyRepository::new(conn.clone()),
            products: ProductRepository::new(conn.clone()),
            categories: CategoryRepository::new(conn.clone()),
            users: UserRepository::new(conn),
        }
    }

    /// 导出全部公司
    #[instrument(skip(self))]
    pub fn export_companies(&self) -> ExportResult<Vec<u8>> {
        let companies = self.companies.list_all()?;
        let category_names = category_refs(&self.categories.list_all()?);

        let mut headers = headers_of(COMPANY_COLUMNS);
        headers.push(COMPANY_EXPORT_ONLY_HEADER.to_string());
        let mut sheet = SheetData::new("Companies", headers);

        for company in &companies {
            sheet.rows.push(self.company_row(company, &category_names)?);
        }

        info!(rows = companies.len(), "公司导出完成");
        write_workbook(&[sheet])
    }

    fn company_row(
        &self,
        company: &Company,
        category_names: &HashMap<i64, String>,
    ) -> ExportResult<Vec<CellValue>> {
        let owner = self
            .users
            .find_by_id(company.owner_id)?
            .map(|u| u.username)
            .unwrap_or_default();
        let categories: Vec<&str> = company
            .category_ids
            .iter()
            .filter_map(|id| category_names.get(id).map(String::as_str))
            .collect();
        let payment_codes: Vec<&str> = company.payment_methods.iter().map(|m| m.as_str()).collect();

        Ok(vec![
            CellValue::Number(company.id as f64),
            CellValue::text(company.name.as_str()),
            CellValue::text(company.contacts.phones_text()),
            CellValue::text(company.description.as_str()),
            CellValue::text(company.city.as_str()),
            CellValue::text(company.address.as_str()),
            CellValue::text(company.supplier_type.label()),
            pretty_json(&company.contacts.to_legacy_json())?,
            pretty_json(&company.legal_info)?,
            pretty_json(&payment_codes)?,
            pretty_json(&company.work_schedule)?,
            CellValue::text(company.status.label()),
            CellValue::text(owner),
            CellValue::text(categories.join(&format!(" {} ", CATEGORY_SEPARATOR))),
            CellValue::text(company.created_at.format("%Y-%m-%d %H:%M:%S").to_string()),
        ])
    }

    /// 导出全部商品
    #[instrument(skip(self))]
    pub fn export_products(&self) -> ExportResult<Vec<u8>> {
        let products = self.products.list_all()?;
        let category_names = category_refs(&self.categories.list_all()?);
        let company_names: HashMap<i64, String> = self
            .companies
            .list_all()?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let mut sheet = SheetData::new("Products", headers_of(PRODUCT_COLUMNS));
        for product in &products {
            sheet
                .rows
                .push(product_row(product, &company_names, &category_names));
        }

        info!(rows = products.len(), "商品导出完成");
        write_workbook(&[sheet])
    }

    /// 导出全部分类
    #[instrument(skip(self))]
    pub fn export_categories(&self) -> ExportResult<Vec<u8>> {
        let categories = self.categories.list_all()?;
        let names = category_refs(&categories);

        let mut sheet = SheetData::new("Categories", headers_of(CATEGORY_COLUMNS));
        for category in &categories {
            let parent = category
                .parent_id
                .and_then(|id| names.get(&id).cloned())
                .unwrap_or_default();
            sheet.rows.push(vec![
                CellValue::Number(category.id as f64),
                CellValue::text(category.name.as_str()),
                CellValue::text(category.slug.as_str()),
                CellValue::text(parent),
                yes_no(category.is_active),
            ]);
        }

        info!(rows = categories.len(), "分类导出完成");
        write_workbook(&[sheet])
    }
}

fn product_row(
    product: &Product,
    company_names: &HashMap<i64, String>,
    category_names: &HashMap<i64, String>,
) -> Vec<CellValue> {
    let company = company_names
        .get(&product.company_id)
        .cloned()
        .unwrap_or_default();
    let category = product
        .category_id
        .and_then(|id| category_names.get(&id).cloned())
        .unwrap_or_default();

    vec![
        CellValue::Number(product.id as f64),
        CellValue::text(company),
        CellValue::text(product.title.as_str()),
        CellValue::text(category),
        CellValue::text(product.description.as_str()),
        CellValue::from(product.price),
        CellValue::text(product.currency.as_str()),
        CellValue::text(if product.in_stock {
            IN_STOCK_LABEL
        } else {
            OUT_OF_STOCK_LABEL
        }),
        yes_no(product.is_active),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str, slug: &str) -> Category {
        let mut category = Category::new(name, slug, None);
        category.id = id;
        category
    }

    #[test]
    fn test_category_refs_use_slug_only_for_namesakes() {
        let categories = vec![
            category(1, "Трубы", "трубы"),
            category(2, "Трубы", "трубы-1"),
            category(3, "Металл", "metal"),
        ];
        let refs = category_refs(&categories);
        assert_eq!(refs[&1], "трубы");
        assert_eq!(refs[&2], "трубы-1");
        assert_eq!(refs[&3], "Металл");
    }
}
