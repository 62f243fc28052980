// ==========================================
// B2B 交易平台 - 用户模型
// ==========================================
// 仅保留导入/审核/审计所需字段，认证签发不在本系统范围内
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_superuser: bool,
    pub is_staff: bool,
}

impl User {
    /// 是否具备管理端权限
    pub fn is_admin(&self) -> bool {
        self.is_superuser || self.is_staff
    }
}
