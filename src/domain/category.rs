// ==========================================
// B2B 交易平台 - 分类模型
// ==========================================
// 约束: slug 全局唯一；父子关系构成树（不主动校验环）
// ==========================================

use serde::{Deserialize, Serialize};

/// slug 为空时的回退值
pub const FALLBACK_SLUG: &str = "category-new";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<i64>,
    pub is_active: bool,
}

impl Category {
    pub fn new(name: &str, slug: &str, parent_id: Option<i64>) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            slug: slug.to_string(),
            parent_id,
            is_active: true,
        }
    }
}

/// 由名称生成 slug（保留 Unicode 字母数字）
///
/// 规则: 小写；字母/数字/下划线保留；空白与连字符视为分隔符；其余字符丢弃；
/// 连续分隔符折叠为单个 `-`，首尾的 `-` / `_` 去除；结果为空时返回 `category-new`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;

    for ch in name.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() || ch == '_' {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '-' {
            pending_sep = true;
        }
    }

    let trimmed = slug.trim_matches(|c| c == '-' || c == '_');
    if trimmed.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        trimmed.to_string()
    }
}

/// 生成带序号的候选 slug: base, base-1, base-2, ...
pub fn slug_candidate(base: &str, attempt: usize) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}
