// ==========================================
// B2B 交易平台 - 公司模型
// ==========================================
// 默认排序: created_at DESC
// 状态只由审核接口或管理员修改
// ==========================================

use crate::domain::contacts::Contacts;
use crate::domain::types::{CompanyStatus, PaymentMethod, SupplierType};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    // ===== 主键 / 业务键 =====
    pub id: i64,
    pub name: String,

    // ===== 归属 =====
    pub owner_id: i64,

    // ===== 基础信息 =====
    pub description: String,
    pub city: String,
    pub address: String,
    pub supplier_type: SupplierType,
    pub status: CompanyStatus,

    // ===== 结构化字段 (JSON) =====
    pub contacts: Contacts,
    pub legal_info: Map<String, JsonValue>,   // inn / kpp / legal_name
    pub payment_methods: Vec<PaymentMethod>,
    pub work_schedule: Map<String, JsonValue>,

    // ===== 评分与分类 =====
    pub rating: f64,
    pub category_ids: Vec<i64>,

    pub created_at: NaiveDateTime,
}

impl Company {
    /// 以默认值构造新公司（id 由仓储写入后回填）
    pub fn new(name: &str, owner_id: i64, created_at: NaiveDateTime) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            owner_id,
            description: String::new(),
            city: String::new(),
            address: String::new(),
            supplier_type: SupplierType::default(),
            status: CompanyStatus::Approved,
            contacts: Contacts::new(),
            legal_info: Map::new(),
            payment_methods: Vec::new(),
            work_schedule: Map::new(),
            rating: 0.0,
            category_ids: Vec::new(),
            created_at,
        }
    }
}
