// ==========================================
// B2B 交易平台 - 汇率与币种转换
// ==========================================
// 支持币种: KZT / RUB / USD（基准 USD）
// ==========================================

pub mod clock;
pub mod converter;
pub mod error;
pub mod provider;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use converter::{convert_with, fallback_rates, format_price, round2, CurrencyConverter};
pub use error::{CurrencyError, CurrencyResult};
pub use provider::{parse_rates_response, ExchangeRateHostProvider, RateProvider};
pub use store::{ttl_from_secs, CachedRates, InMemoryRateStore, RateStore, RateTable, SqliteRateStore, BASE_CURRENCY};

use std::sync::Arc;

/// 服务进程使用的转换器（各依赖以 trait 对象注入）
pub type SharedConverter =
    CurrencyConverter<Arc<dyn RateStore>, Arc<dyn RateProvider>, Arc<dyn Clock>>;
