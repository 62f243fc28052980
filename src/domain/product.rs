// ==========================================
// B2B 交易平台 - 商品模型
// ==========================================

use crate::domain::types::Currency;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub company_id: i64,
    pub title: String,
    pub category_id: Option<i64>,
    pub description: String,
    pub price: Option<f64>,
    pub currency: Currency,
    pub in_stock: bool,
    pub is_active: bool,
    pub on_sale: bool, // 关联有效促销时为 true
    pub created_at: NaiveDateTime,
}

impl Product {
    pub fn new(company_id: i64, title: &str, created_at: NaiveDateTime) -> Self {
        Self {
            id: 0,
            company_id,
            title: title.to_string(),
            category_id: None,
            description: String::new(),
            price: None,
            currency: Currency::default(),
            in_stock: true,
            is_active: true,
            on_sale: false,
            created_at,
        }
    }
}
