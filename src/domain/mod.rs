// ==========================================
// B2B 交易平台 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、纯业务规则
// 红线: 不含数据访问逻辑
// ==========================================

pub mod action_log;
pub mod category;
pub mod company;
pub mod contacts;
pub mod product;
pub mod promotion;
pub mod review;
pub mod tender;
pub mod types;
pub mod user;

// 重导出核心类型
pub use action_log::ActionLog;
pub use category::Category;
pub use company::Company;
pub use contacts::{ContactItem, ContactKind, Contacts};
pub use product::Product;
pub use promotion::Promotion;
pub use review::Review;
pub use tender::Tender;
pub use types::{CompanyStatus, Currency, ModerationStatus, PaymentMethod, SupplierType};
pub use user::User;
