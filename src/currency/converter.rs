// ==========================================
// B2B 交易平台 - 币种转换
// ==========================================
// 取汇率顺序: 未过期缓存 → 远程接口（成功则写缓存）→ 内置汇率（不写缓存）
// 换算: amount / rate[from] * rate[to]，始终经由 USD，结果保留两位小数
// 相同币种或不支持的币种: 原样返回金额
// ==========================================

use crate::currency::clock::Clock;
use crate::currency::error::CurrencyResult;
use crate::currency::provider::RateProvider;
use crate::currency::store::{RateStore, RateTable};
use crate::domain::types::Currency;
use tracing::{error, warn};

/// 远程接口不可用时使用的近似汇率（1 USD = x）
pub fn fallback_rates() -> RateTable {
    RateTable::from([
        (Currency::Usd, 1.0),
        (Currency::Kzt, 450.0),
        (Currency::Rub, 90.0),
    ])
}

/// 四舍五入到两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 按给定汇率表换算
pub fn convert_with(rates: &RateTable, amount: f64, from: Currency, to: Currency) -> f64 {
    if from == to {
        return amount;
    }
    match (rates.get(&from), rates.get(&to)) {
        (Some(from_rate), Some(to_rate)) if *from_rate > 0.0 => {
            round2(amount / from_rate * to_rate)
        }
        _ => amount,
    }
}

/// 价格显示: "1500.00 ₸" / "1500.00 ₽" / "$1500.00"
pub fn format_price(amount: f64, currency: Currency) -> String {
    match currency {
        Currency::Usd => format!("{}{:.2}", currency.symbol(), amount),
        _ => format!("{:.2} {}", amount, currency.symbol()),
    }
}

pub struct CurrencyConverter<S: RateStore, P: RateProvider, C: Clock> {
    store: S,
    provider: P,
    clock: C,
}

impl<S: RateStore, P: RateProvider, C: Clock> CurrencyConverter<S, P, C> {
    pub fn new(store: S, provider: P, clock: C) -> Self {
        Self {
            store,
            provider,
            clock,
        }
    }

    /// 当前汇率表（不会失败）
    pub async fn rates(&self) -> RateTable {
        match self.cached() {
            Some(rates) => rates,
            None => match self.refresh().await {
                Ok(rates) => rates,
                Err(e) => {
                    error!(error = %e, "获取汇率失败，使用内置汇率");
                    fallback_rates()
                }
            },
        }
    }

    /// 未过期的缓存汇率
    pub fn cached(&self) -> Option<RateTable> {
        match self.store.get(self.clock.now()) {
            Ok(rates) => rates,
            Err(e) => {
                warn!(error = %e, "读取汇率缓存失败");
                None
            }
        }
    }

    /// 从远程接口刷新并写入缓存
    pub async fn refresh(&self) -> CurrencyResult<RateTable> {
        let rates = self.provider.fetch().await?;
        if let Err(e) = self.store.put(&rates, self.clock.now()) {
            warn!(error = %e, "写入汇率缓存失败");
        }
        Ok(rates)
    }

    /// 清空缓存
    pub fn invalidate(&self) -> CurrencyResult<()> {
        self.store.clear()
    }

    /// 按币种代码换算
    ///
    /// # 参数
    /// - amount: 金额
    /// - from / to: 币种代码（KZT / RUB / USD，忽略大小写）
    pub async fn convert(&self, amount: f64, from: &str, to: &str) -> f64 {
        let (from, to) = match (Currency::from_code(from), Currency::from_code(to)) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                warn!(from = %from, to = %to, "不支持的币种，金额原样返回");
                return amount;
            }
        };
        if from == to {
            return amount;
        }
        let rates = self.rates().await;
        convert_with(&rates, amount, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::clock::ManualClock;
    use crate::currency::error::CurrencyError;
    use crate::currency::store::InMemoryRateStore;
    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeProvider {
        rates: Option<RateTable>,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(rates: Option<RateTable>) -> Self {
            Self {
                rates,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RateProvider for FakeProvider {
        async fn fetch(&self) -> CurrencyResult<RateTable> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rates
                .clone()
                .ok_or_else(|| CurrencyError::InvalidResponse("offline".to_string()))
        }
    }

    fn live_rates() -> RateTable {
        RateTable::from([
            (Currency::Usd, 1.0),
            (Currency::Kzt, 500.0),
            (Currency::Rub, 100.0),
        ])
    }

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            NaiveDate::from_ymd_opt(2026, 3, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        ))
    }

    #[test]
    fn test_convert_with_goes_through_usd() {
        let rates = fallback_rates();
        assert_eq!(convert_with(&rates, 450.0, Currency::Kzt, Currency::Usd), 1.0);
        assert_eq!(convert_with(&rates, 1000.0, Currency::Kzt, Currency::Rub), 200.0);
        assert_eq!(convert_with(&rates, 10.0, Currency::Usd, Currency::Kzt), 4500.0);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let rates = fallback_rates();
        for from in Currency::ALL {
            for to in Currency::ALL {
                let amount = 1234.56;
                let there = convert_with(&rates, amount, from, to);
                let back = convert_with(&rates, there, to, from);
                let tolerance = 0.01 * rates[&from] / rates[&to] + 0.01;
                assert!(
                    (back - amount).abs() <= tolerance,
                    "{} -> {} -> {}: {}",
                    from,
                    to,
                    from,
                    back
                );
            }
        }
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1500.0, Currency::Kzt), "1500.00 ₸");
        assert_eq!(format_price(99.5, Currency::Rub), "99.50 ₽");
        assert_eq!(format_price(3.0, Currency::Usd), "$3.00");
    }

    #[tokio::test]
    async fn test_uses_cache_until_ttl_expires() {
        let clock = clock();
        let provider = Arc::new(FakeProvider::new(Some(live_rates())));
        let converter =
            CurrencyConverter::new(InMemoryRateStore::new(3600).unwrap(), provider.clone(), clock.clone());

        assert_eq!(converter.convert(1000.0, "KZT", "USD").await, 2.0);
        assert_eq!(converter.convert(1000.0, "kzt", "RUB").await, 200.0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        clock.advance(Duration::seconds(3600));
        converter.rates().await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_provider_failure_uses_fallback_without_caching() {
        let provider = Arc::new(FakeProvider::new(None));
        let converter = CurrencyConverter::new(InMemoryRateStore::new(3600).unwrap(), provider.clone(), clock());

        assert_eq!(converter.rates().await, fallback_rates());
        assert_eq!(converter.convert(90.0, "RUB", "USD").await, 1.0);
        assert!(converter.cached().is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_identity_and_unsupported_codes() {
        let provider = Arc::new(FakeProvider::new(Some(live_rates())));
        let converter = CurrencyConverter::new(InMemoryRateStore::new(3600).unwrap(), provider.clone(), clock());

        assert_eq!(converter.convert(12.345, "USD", "USD").await, 12.345);
        assert_eq!(converter.convert(100.0, "EUR", "KZT").await, 100.0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
