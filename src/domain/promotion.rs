// ==========================================
// B2B 交易平台 - 促销活动模型
// ==========================================
// 商品 on_sale 规则: 关联到 APPROVED 且处于有效期内的活动
// ==========================================

use crate::domain::types::ModerationStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: i64,
    pub company_id: i64,
    pub title: String,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub status: ModerationStatus,
    pub product_ids: Vec<i64>,
    pub created_at: NaiveDateTime,
}

impl Promotion {
    /// 当前时刻是否处于活动期
    pub fn is_current(&self, now: NaiveDateTime) -> bool {
        self.starts_at <= now && now <= self.ends_at
    }

    /// 是否使关联商品处于促销状态
    pub fn puts_products_on_sale(&self, now: NaiveDateTime) -> bool {
        self.status == ModerationStatus::Approved && self.is_current(now)
    }
}
