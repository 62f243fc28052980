// ==========================================
// B2B 交易平台 - 公司导入资源
// ==========================================
// 匹配顺序: ID（存在且为整数）→ 名称（业务键）→ 新建
// JSON 列格式错误时回落到空默认值，不记错误
// ==========================================

use crate::domain::company::Company;
use crate::domain::contacts::Contacts;
use crate::domain::types::{CompanyStatus, PaymentMethod, SupplierType};
use crate::importer::error::{ImportResult, StorageContext};
use crate::importer::field_mapper::{ColumnSpec, RowReader};
use crate::importer::related::RelatedResolver;
use crate::importer::report::RowOutcome;
use crate::importer::resource::{apply, ImportContext, ImportResource};
use crate::repository::CompanyRepository;
use rusqlite::Connection;
use serde_json::{json, Map, Value as JsonValue};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// 列定义（表头与导出一致）
pub const COMPANY_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::optional("id", "ID"),
    ColumnSpec::required("name", "Название"),
    ColumnSpec::optional("phones", "Номера телефонов"),
    ColumnSpec::optional("description", "Описание"),
    ColumnSpec::optional("city", "Город"),
    ColumnSpec::optional("address", "Адрес"),
    ColumnSpec::optional("supplier_type", "Тип поставщика"),
    ColumnSpec::optional("contacts", "Контакты"),
    ColumnSpec::optional("legal_info", "Юр. информация"),
    ColumnSpec::optional("payment_methods", "Способы оплаты"),
    ColumnSpec::optional("work_schedule", "График работы"),
    ColumnSpec::optional("status", "Статус"),
    ColumnSpec::optional("owner", "Владелец"),
    ColumnSpec::optional("categories", "Категории"),
];

/// 仅导出的列（导入时忽略）
pub const COMPANY_EXPORT_ONLY_HEADER: &str = "Дата создания";

/// 分类列分隔符
pub const CATEGORY_SEPARATOR: char = '|';

/// 单行解析结果（全部字段 Option: None = 未填写）
#[derive(Debug, Default)]
struct CompanyRow {
    id: Option<i64>,
    name: String,
    phones: Option<String>,
    description: Option<String>,
    city: Option<String>,
    address: Option<String>,
    supplier_type: Option<SupplierType>,
    contacts: Option<Contacts>,
    legal_info: Option<Map<String, JsonValue>>,
    payment_methods: Option<Vec<PaymentMethod>>,
    work_schedule: Option<Map<String, JsonValue>>,
    status: Option<CompanyStatus>,
    owner: Option<String>,
    categories: Option<Vec<String>>,
}

pub struct CompanyResource {
    companies: CompanyRepository,
    related: RelatedResolver,
}

impl CompanyResource {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            companies: CompanyRepository::new(conn.clone()),
            related: RelatedResolver::new(conn),
        }
    }

    fn parse_row(&self, row: &RowReader<'_>) -> ImportResult<CompanyRow> {
        let row_number = row.row_number();

        let supplier_type = row.text("supplier_type").map(|v| {
            SupplierType::from_label(&v).unwrap_or_else(|| {
                debug!(row = row_number, value = %v, "未知供应商类型，使用 DEALER");
                SupplierType::Dealer
            })
        });
        let status = row.text("status").map(|v| {
            CompanyStatus::from_label(&v).unwrap_or_else(|| {
                debug!(row = row_number, value = %v, "未知状态，使用 APPROVED");
                CompanyStatus::Approved
            })
        });

        Ok(CompanyRow {
            id: row.record_id("id"),
            name: row.required_text("name")?,
            phones: row.text("phones"),
            description: row.text("description"),
            city: row.text("city"),
            address: row.text("address"),
            supplier_type,
            contacts: row.json_or("contacts", json!({})).map(|v| parse_contacts(&v)),
            legal_info: row.json_or("legal_info", json!({})).map(into_object),
            payment_methods: row
                .json_or("payment_methods", json!([]))
                .map(|v| parse_payment_methods(&v)),
            work_schedule: row.json_or("work_schedule", json!({})).map(into_object),
            status,
            owner: row.text("owner"),
            categories: row.list("categories", CATEGORY_SEPARATOR),
        })
    }

    fn find_existing(&self, parsed: &CompanyRow, row: usize) -> ImportResult<Option<Company>> {
        if let Some(id) = parsed.id {
            if let Some(company) = self.companies.find_by_id(id).at_row(row)? {
                return Ok(Some(company));
            }
        }
        self.companies.find_first_by_name(&parsed.name).at_row(row)
    }
}

impl ImportResource for CompanyResource {
    fn name(&self) -> &'static str {
        "company"
    }

    fn columns(&self) -> &'static [ColumnSpec] {
        COMPANY_COLUMNS
    }

    fn import_row(&self, ctx: &mut ImportContext, row: &RowReader<'_>) -> ImportResult<RowOutcome> {
        let row_number = row.row_number();
        let parsed = self.parse_row(row)?;
        let existing = self.find_existing(&parsed, row_number)?;

        // ===== 关联记录 =====
        let owner_id = match (&parsed.owner, &existing) {
            (Some(owner), _) => Some(self.related.resolve_owner(ctx, row_number, owner)?),
            (None, None) => Some(self.related.fallback_owner(ctx, row_number)?),
            (None, Some(_)) => None,
        };
        let category_ids = match &parsed.categories {
            Some(names) => {
                let mut ids = Vec::with_capacity(names.len());
                for name in names {
                    ids.push(self.related.resolve_category(ctx, row_number, name)?);
                }
                ids.sort_unstable();
                ids.dedup();
                Some(ids)
            }
            None => None,
        };

        // ===== 组装候选记录 =====
        let mut candidate = match &existing {
            Some(company) => company.clone(),
            None => Company::new(&parsed.name, 0, ctx.now),
        };
        candidate.name = parsed.name;
        apply(&mut candidate.owner_id, owner_id);
        apply(&mut candidate.description, parsed.description);
        apply(&mut candidate.city, parsed.city);
        apply(&mut candidate.address, parsed.address);
        apply(&mut candidate.supplier_type, parsed.supplier_type);
        apply(&mut candidate.status, parsed.status);
        apply(&mut candidate.contacts, parsed.contacts);
        if let Some(phones) = &parsed.phones {
            candidate.contacts.replace_phones_text(phones);
        }
        apply(&mut candidate.legal_info, parsed.legal_info);
        apply(&mut candidate.payment_methods, parsed.payment_methods);
        apply(&mut candidate.work_schedule, parsed.work_schedule);
        apply(&mut candidate.category_ids, category_ids);

        // ===== 写入 =====
        match existing {
            Some(current) if current == candidate => {
                debug!(row = row_number, company_id = current.id, "数据未变化，跳过");
                Ok(RowOutcome::Unchanged)
            }
            Some(_) => {
                self.companies.update(&candidate).at_row(row_number)?;
                debug!(row = row_number, company_id = candidate.id, "公司已更新");
                Ok(RowOutcome::Updated)
            }
            None => {
                let id = self.companies.insert(&candidate).at_row(row_number)?;
                debug!(row = row_number, company_id = id, "公司已创建");
                Ok(RowOutcome::Created)
            }
        }
    }
}

/// 联系方式单元格: 历史对象结构或规范列表结构，其他 → 空
fn parse_contacts(value: &JsonValue) -> Contacts {
    match value {
        JsonValue::Object(_) => Contacts::from_legacy_json(value),
        JsonValue::Array(_) => serde_json::from_value(value.clone()).unwrap_or_default(),
        _ => Contacts::new(),
    }
}

fn into_object(value: JsonValue) -> Map<String, JsonValue> {
    match value {
        JsonValue::Object(map) => map,
        _ => Map::new(),
    }
}

/// 支付方式列表，只保留已知代码
fn parse_payment_methods(value: &JsonValue) -> Vec<PaymentMethod> {
    let mut methods = Vec::new();
    if let Some(items) = value.as_array() {
        for code in items.iter().filter_map(JsonValue::as_str) {
            if let Some(method) = PaymentMethod::from_code(code) {
                if !methods.contains(&method) {
                    methods.push(method);
                }
            }
        }
    }
    methods
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payment_methods_filters_unknown() {
        let methods = parse_payment_methods(&json!(["cash", "BARTER", "CARD", "CASH", 5]));
        assert_eq!(methods, vec![PaymentMethod::Cash, PaymentMethod::Card]);
        assert!(parse_payment_methods(&json!({"a": 1})).is_empty());
    }

    #[test]
    fn test_parse_contacts_shapes() {
        let legacy = parse_contacts(&json!({"phone": "+7 700 1", "emails": ["a@b.kz"]}));
        assert_eq!(legacy.phones(), vec!["+7 700 1"]);
        assert_eq!(legacy.emails(), vec!["a@b.kz"]);

        let canonical = parse_contacts(&json!([{"kind": "website", "value": "https://x.kz"}]));
        assert_eq!(canonical.website(), Some("https://x.kz"));

        assert!(parse_contacts(&json!("text")).is_empty());
    }
}
