// ==========================================
// B2B 交易平台 - 汇率模块错误类型
// ==========================================
// 对调用方不可见: 转换时一律回落到内置汇率
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CurrencyError {
    #[error("汇率接口请求失败: {0}")]
    Http(#[from] reqwest::Error),

    #[error("汇率接口返回无效数据: {0}")]
    InvalidResponse(String),

    #[error("汇率缓存读写失败: {0}")]
    Store(String),

    #[error("缓存有效期超出范围: {0} 秒")]
    InvalidTtl(u64),
}

impl From<rusqlite::Error> for CurrencyError {
    fn from(err: rusqlite::Error) -> Self {
        CurrencyError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for CurrencyError {
    fn from(err: serde_json::Error) -> Self {
        CurrencyError::Store(err.to_string())
    }
}

pub type CurrencyResult<T> = Result<T, CurrencyError>;
