// ==========================================
// B2B 交易平台 - 操作日志数据仓储
// ==========================================
// 红线: 只追加，不提供更新/删除
// ==========================================

mod core;
mod queries;


pub use self::core::ActionLogRepository;
