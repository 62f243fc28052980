// ==========================================
// B2B 交易平台 - 审核层
// ==========================================

pub mod service;

pub use service::{
    parse_decision, ModeratedItem, ModerationError, ModerationKind, ModerationResult,
    ModerationService,
};
