// ==========================================
// B2B 交易平台 - 远程汇率来源
// ==========================================
// 接口: GET {api_url}（默认 exchangerate.host，base=USD）
// 有效响应: success = true 且 rates 中包含 KZT / RUB / USD
// ==========================================

use crate::config::CurrencySettings;
use crate::currency::error::{CurrencyError, CurrencyResult};
use crate::currency::store::RateTable;
use crate::domain::types::Currency;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// 获取以 USD 为基准的汇率表
    async fn fetch(&self) -> CurrencyResult<RateTable>;
}

#[async_trait]
impl<T: RateProvider + ?Sized> RateProvider for Arc<T> {
    async fn fetch(&self) -> CurrencyResult<RateTable> {
        (**self).fetch().await
    }
}

pub struct ExchangeRateHostProvider {
    client: reqwest::Client,
    url: String,
}

impl ExchangeRateHostProvider {
    pub fn new(settings: &CurrencySettings) -> CurrencyResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: settings.api_url.clone(),
        })
    }
}

#[async_trait]
impl RateProvider for ExchangeRateHostProvider {
    async fn fetch(&self) -> CurrencyResult<RateTable> {
        debug!(url = %self.url, "请求远程汇率");
        let body: JsonValue = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let rates = parse_rates_response(&body)?;
        info!(currencies = rates.len(), "远程汇率获取成功");
        Ok(rates)
    }
}

/// 解析接口响应，只保留支持的币种
pub fn parse_rates_response(body: &JsonValue) -> CurrencyResult<RateTable> {
    if body.get("success").and_then(JsonValue::as_bool) != Some(true) {
        return Err(CurrencyError::InvalidResponse(format!(
            "success != true: {}",
            body.get("error").cloned().unwrap_or(JsonValue::Null)
        )));
    }

    let raw = body
        .get("rates")
        .and_then(JsonValue::as_object)
        .ok_or_else(|| CurrencyError::InvalidResponse("缺少 rates 字段".to_string()))?;

    let mut rates = RateTable::new();
    for currency in Currency::ALL {
        match raw.get(currency.as_str()).and_then(JsonValue::as_f64) {
            Some(rate) if rate > 0.0 => {
                rates.insert(currency, rate);
            }
            _ => {
                return Err(CurrencyError::InvalidResponse(format!(
                    "缺少币种 {}",
                    currency
                )))
            }
        }
    }
    Ok(rates)
}
