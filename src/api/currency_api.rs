// ==========================================
// B2B 交易平台 - 汇率 API
// ==========================================
// GET  /api/currency/rates   → {success, base, rates}
// POST /api/currency/convert → {success, original_amount, original_currency,
//                               converted_amount, target_currency, formatted}
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::currency::{format_price, SharedConverter, BASE_CURRENCY};
use crate::domain::types::Currency;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesResponse {
    pub success: bool,
    pub base: String,
    pub rates: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertRequest {
    pub amount: f64,
    pub from_currency: String,
    pub to_currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub success: bool,
    pub original_amount: f64,
    pub original_currency: String,
    pub converted_amount: f64,
    pub target_currency: String,
    /// 目标币种不受支持时为 None
    pub formatted: Option<String>,
}

pub struct CurrencyApi {
    converter: Arc<SharedConverter>,
}

impl CurrencyApi {
    pub fn new(converter: Arc<SharedConverter>) -> Self {
        Self { converter }
    }

    pub fn converter(&self) -> &SharedConverter {
        &self.converter
    }

    /// 当前汇率（缓存 → 远程 → 内置）
    pub async fn rates(&self) -> RatesResponse {
        let rates = self.converter.rates().await;
        RatesResponse {
            success: true,
            base: BASE_CURRENCY.as_str().to_string(),
            rates: rates
                .into_iter()
                .map(|(currency, rate)| (currency.as_str().to_string(), rate))
                .collect(),
        }
    }

    /// 金额换算
    ///
    /// # 返回
    /// - Err(InvalidInput): amount <= 0 或非有限数
    pub async fn convert(&self, request: ConvertRequest) -> ApiResult<ConvertResponse> {
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(ApiError::InvalidInput(
                "Amount must be greater than 0".to_string(),
            ));
        }

        let converted = self
            .converter
            .convert(request.amount, &request.from_currency, &request.to_currency)
            .await;

        Ok(ConvertResponse {
            success: true,
            original_amount: request.amount,
            original_currency: request.from_currency.to_uppercase(),
            converted_amount: converted,
            target_currency: request.to_currency.to_uppercase(),
            formatted: Currency::from_code(&request.to_currency)
                .map(|currency| format_price(converted, currency)),
        })
    }
}
