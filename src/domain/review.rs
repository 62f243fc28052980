// ==========================================
// B2B 交易平台 - 评价模型
// ==========================================
// 约束: rating ∈ [1, 5]；同一作者对同一公司仅一条
// ==========================================

use crate::domain::types::ModerationStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub company_id: i64,
    pub author_id: i64,
    pub rating: i32,
    pub text: String,
    pub status: ModerationStatus,
    pub created_at: NaiveDateTime,
}

/// 评分算术平均值（全量重算，不做增量）
pub fn mean_rating(ratings: &[i32]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().map(|r| *r as i64).sum();
    Some(sum as f64 / ratings.len() as f64)
}
