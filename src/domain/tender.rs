// ==========================================
// B2B 交易平台 - 招标模型
// ==========================================

use crate::domain::types::ModerationStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tender {
    pub id: i64,
    pub company_id: Option<i64>,
    pub author_id: i64,
    pub title: String,
    pub description: String,
    pub status: ModerationStatus,
    pub created_at: NaiveDateTime,
}
