// ==========================================
// B2B 交易平台 - 数据仓储层
// ==========================================
// 职责: 实体 ↔ SQLite 行映射
// 红线: 不含业务逻辑（匹配/自动创建/审核规则在上层）
// ==========================================

pub mod action_log_repo;
pub mod category_repo;
pub mod company_repo;
pub mod error;
pub mod product_repo;
pub mod promotion_repo;
pub mod review_repo;
pub mod tender_repo;
pub mod user_repo;

pub(crate) mod sql_util;

// 重导出
pub use action_log_repo::ActionLogRepository;
pub use category_repo::CategoryRepository;
pub use company_repo::CompanyRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use product_repo::ProductRepository;
pub use promotion_repo::PromotionRepository;
pub use review_repo::ReviewRepository;
pub use tender_repo::TenderRepository;
pub use user_repo::UserRepository;
