// ==========================================
// B2B 交易平台 - 汇率缓存
// ==========================================
// 缓存内容: 以 USD 为基准的汇率表 + 获取时间
// 过期策略: now - fetched_at < ttl 时有效
// 实现:
// - InMemoryRateStore: 进程内（RwLock）
// - SqliteRateStore: currency_rates 表（供一次性刷新命令与服务进程共享）
// ==========================================

use crate::currency::error::{CurrencyError, CurrencyResult};
use crate::db::TS_FORMAT;
use crate::domain::types::Currency;
use chrono::{Duration, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};

/// 汇率表: 1 USD = rate 单位目标币种
pub type RateTable = BTreeMap<Currency, f64>;

/// 基准币种
pub const BASE_CURRENCY: Currency = Currency::Usd;

#[derive(Debug, Clone, PartialEq)]
pub struct CachedRates {
    pub rates: RateTable,
    pub fetched_at: NaiveDateTime,
}

impl CachedRates {
    pub fn is_fresh(&self, now: NaiveDateTime, ttl: Duration) -> bool {
        now - self.fetched_at < ttl
    }
}

pub trait RateStore: Send + Sync {
    /// 读取未过期的汇率表
    fn get(&self, now: NaiveDateTime) -> CurrencyResult<Option<RateTable>>;

    /// 写入汇率表
    fn put(&self, rates: &RateTable, fetched_at: NaiveDateTime) -> CurrencyResult<()>;

    /// 清空缓存
    fn clear(&self) -> CurrencyResult<()>;
}

impl<T: RateStore + ?Sized> RateStore for Arc<T> {
    fn get(&self, now: NaiveDateTime) -> CurrencyResult<Option<RateTable>> {
        (**self).get(now)
    }

    fn put(&self, rates: &RateTable, fetched_at: NaiveDateTime) -> CurrencyResult<()> {
        (**self).put(rates, fetched_at)
    }

    fn clear(&self) -> CurrencyResult<()> {
        (**self).clear()
    }
}

/// 把配置中的秒数转换为有效期
pub fn ttl_from_secs(ttl_secs: u64) -> CurrencyResult<Duration> {
    i64::try_from(ttl_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or(CurrencyError::InvalidTtl(ttl_secs))
}

// ==========================================
// InMemoryRateStore
// ==========================================
pub struct InMemoryRateStore {
    ttl: Duration,
    entry: RwLock<Option<CachedRates>>,
}

impl InMemoryRateStore {
    pub fn new(ttl_secs: u64) -> CurrencyResult<Self> {
        Ok(Self {
            ttl: ttl_from_secs(ttl_secs)?,
            entry: RwLock::new(None),
        })
    }
}

impl RateStore for InMemoryRateStore {
    fn get(&self, now: NaiveDateTime) -> CurrencyResult<Option<RateTable>> {
        let entry = self
            .entry
            .read()
            .map_err(|e| CurrencyError::Store(e.to_string()))?;
        Ok(entry
            .as_ref()
            .filter(|cached| cached.is_fresh(now, self.ttl))
            .map(|cached| cached.rates.clone()))
    }

    fn put(&self, rates: &RateTable, fetched_at: NaiveDateTime) -> CurrencyResult<()> {
        let mut entry = self
            .entry
            .write()
            .map_err(|e| CurrencyError::Store(e.to_string()))?;
        *entry = Some(CachedRates {
            rates: rates.clone(),
            fetched_at,
        });
        Ok(())
    }

    fn clear(&self) -> CurrencyResult<()> {
        let mut entry = self
            .entry
            .write()
            .map_err(|e| CurrencyError::Store(e.to_string()))?;
        *entry = None;
        Ok(())
    }
}

// ==========================================
// SqliteRateStore
// ==========================================
pub struct SqliteRateStore {
    conn: Arc<Mutex<Connection>>,
    ttl: Duration,
}

impl SqliteRateStore {
    pub fn new(conn: Arc<Mutex<Connection>>, ttl_secs: u64) -> CurrencyResult<Self> {
        Ok(Self {
            conn,
            ttl: ttl_from_secs(ttl_secs)?,
        })
    }

    /// 读取缓存（不论是否过期）
    pub fn load(&self) -> CurrencyResult<Option<CachedRates>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| CurrencyError::Store(e.to_string()))?;
        let row = conn
            .query_row(
                "SELECT rates_json, fetched_at FROM currency_rates WHERE base = ?1",
                params![BASE_CURRENCY.as_str()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((rates_json, fetched_at)) => {
                let rates: RateTable = serde_json::from_str(&rates_json)?;
                let fetched_at = NaiveDateTime::parse_from_str(&fetched_at, TS_FORMAT)
                    .map_err(|e| CurrencyError::Store(e.to_string()))?;
                Ok(Some(CachedRates { rates, fetched_at }))
            }
        }
    }
}

impl RateStore for SqliteRateStore {
    fn get(&self, now: NaiveDateTime) -> CurrencyResult<Option<RateTable>> {
        Ok(self
            .load()?
            .filter(|cached| cached.is_fresh(now, self.ttl))
            .map(|cached| cached.rates))
    }

    fn put(&self, rates: &RateTable, fetched_at: NaiveDateTime) -> CurrencyResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| CurrencyError::Store(e.to_string()))?;
        conn.execute(
            "INSERT INTO currency_rates (base, rates_json, fetched_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(base) DO UPDATE SET rates_json = ?2, fetched_at = ?3",
            params![
                BASE_CURRENCY.as_str(),
                serde_json::to_string(rates)?,
                fetched_at.format(TS_FORMAT).to_string(),
            ],
        )?;
        Ok(())
    }

    fn clear(&self) -> CurrencyResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| CurrencyError::Store(e.to_string()))?;
        conn.execute(
            "DELETE FROM currency_rates WHERE base = ?1",
            params![BASE_CURRENCY.as_str()],
        )?;
        Ok(())
    }
}
