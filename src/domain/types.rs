// ==========================================
// B2B 交易平台 - 领域类型定义
// ==========================================
// 职责: 状态枚举 / 供应商类型 / 支付方式 / 币种
// 约定: 数据库与 JSON 中统一使用 SCREAMING_SNAKE_CASE 代码，
//       表格中使用俄文标签（导入时两者均可识别）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 公司状态 (Company Status)
// ==========================================
// 审核流程: DRAFT → PENDING → {APPROVED, REJECTED}，APPROVED → BANNED
// 不做状态转换合法性校验，管理员可直接覆写
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanyStatus {
    Draft,    // 草稿
    Pending,  // 待审核
    Approved, // 已通过
    Rejected, // 已驳回
    Banned,   // 已封禁
}

impl CompanyStatus {
    /// 转换为代码 (用于数据库存储)
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyStatus::Draft => "DRAFT",
            CompanyStatus::Pending => "PENDING",
            CompanyStatus::Approved => "APPROVED",
            CompanyStatus::Rejected => "REJECTED",
            CompanyStatus::Banned => "BANNED",
        }
    }

    /// 从代码解析
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "DRAFT" => Some(CompanyStatus::Draft),
            "PENDING" => Some(CompanyStatus::Pending),
            "APPROVED" => Some(CompanyStatus::Approved),
            "REJECTED" => Some(CompanyStatus::Rejected),
            "BANNED" => Some(CompanyStatus::Banned),
            _ => None,
        }
    }

    /// 表格标签
    pub fn label(&self) -> &'static str {
        match self {
            CompanyStatus::Draft => "Черновик",
            CompanyStatus::Pending => "На модерации",
            CompanyStatus::Approved => "Одобрено",
            CompanyStatus::Rejected => "Отклонено",
            CompanyStatus::Banned => "Заблокировано",
        }
    }

    /// 从表格值解析（俄文标签或代码）
    pub fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        match value {
            "Черновик" => Some(CompanyStatus::Draft),
            "На модерации" => Some(CompanyStatus::Pending),
            "Одобрено" => Some(CompanyStatus::Approved),
            "Отклонено" => Some(CompanyStatus::Rejected),
            "Заблокировано" => Some(CompanyStatus::Banned),
            other => Self::from_code(other),
        }
    }
}

impl fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 审核状态 (Review / Tender / Action)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "PENDING",
            ModerationStatus::Approved => "APPROVED",
            ModerationStatus::Rejected => "REJECTED",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PENDING" => Some(ModerationStatus::Pending),
            "APPROVED" => Some(ModerationStatus::Approved),
            "REJECTED" => Some(ModerationStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 供应商类型 (Supplier Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplierType {
    Dealer,              // 经销商
    Manufacturer,        // 生产商
    TradeRepresentative, // 贸易代表
}

impl SupplierType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupplierType::Dealer => "DEALER",
            SupplierType::Manufacturer => "MANUFACTURER",
            SupplierType::TradeRepresentative => "TRADE_REPRESENTATIVE",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "DEALER" => Some(SupplierType::Dealer),
            "MANUFACTURER" => Some(SupplierType::Manufacturer),
            "TRADE_REPRESENTATIVE" => Some(SupplierType::TradeRepresentative),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SupplierType::Dealer => "Дилер",
            SupplierType::Manufacturer => "Производитель",
            SupplierType::TradeRepresentative => "Торговый представитель",
        }
    }

    /// 从表格值解析（俄文标签或代码）
    pub fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        match value {
            "Дилер" => Some(SupplierType::Dealer),
            "Производитель" => Some(SupplierType::Manufacturer),
            "Торговый представитель" => Some(SupplierType::TradeRepresentative),
            other => Self::from_code(other),
        }
    }
}

impl Default for SupplierType {
    fn default() -> Self {
        SupplierType::Dealer
    }
}

// ==========================================
// 支付方式 (Payment Method)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
    Crypto,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Transfer => "TRANSFER",
            PaymentMethod::Crypto => "CRYPTO",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "CASH" => Some(PaymentMethod::Cash),
            "CARD" => Some(PaymentMethod::Card),
            "TRANSFER" => Some(PaymentMethod::Transfer),
            "CRYPTO" => Some(PaymentMethod::Crypto),
            _ => None,
        }
    }
}

// ==========================================
// 币种 (Currency)
// ==========================================
// 汇率基准: USD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Kzt,
    Rub,
    Usd,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Kzt, Currency::Rub, Currency::Usd];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Kzt => "KZT",
            Currency::Rub => "RUB",
            Currency::Usd => "USD",
        }
    }

    /// 从代码解析（忽略大小写与首尾空白）
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "KZT" => Some(Currency::Kzt),
            "RUB" => Some(Currency::Rub),
            "USD" => Some(Currency::Usd),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Kzt => "₸",
            Currency::Rub => "₽",
            Currency::Usd => "$",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Kzt
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
