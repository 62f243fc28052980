// ==========================================
// B2B 交易平台 - 审核服务
// ==========================================
// 审核对象: 公司 / 评价 / 招标 / 商品 / 促销活动
// 规则:
// - 只接受 APPROVED / REJECTED，其余值 → InvalidStatus
// - 不校验状态转换合法性（管理员可覆写任意状态）
// - 评价状态变化后全量重算公司评分（已通过评价的算术平均）
// - 商品审核即上下架 (is_active)
// - 活动审核后重算其关联商品的 on_sale
// ==========================================

use crate::domain::review::mean_rating;
use crate::domain::types::{CompanyStatus, ModerationStatus};
use crate::domain::{Company, Product, Promotion, Review, Tender};
use crate::repository::error::RepositoryError;
use crate::repository::{
    CompanyRepository, ProductRepository, PromotionRepository, ReviewRepository, TenderRepository,
};
use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{info, instrument};

/// 审核错误类型
#[derive(Error, Debug)]
pub enum ModerationError {
    #[error("Invalid status")]
    InvalidStatus(String),

    #[error("未知审核对象: {0}")]
    UnknownKind(String),

    #[error("记录未找到: {kind} id={id}")]
    NotFound { kind: ModerationKind, id: i64 },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type ModerationResult<T> = Result<T, ModerationError>;

/// 审核对象类别（路径段）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationKind {
    Companies,
    Reviews,
    Tenders,
    Products,
    Actions,
}

impl ModerationKind {
    pub fn from_path(segment: &str) -> ModerationResult<Self> {
        match segment {
            "companies" => Ok(ModerationKind::Companies),
            "reviews" => Ok(ModerationKind::Reviews),
            "tenders" => Ok(ModerationKind::Tenders),
            "products" => Ok(ModerationKind::Products),
            "actions" => Ok(ModerationKind::Actions),
            other => Err(ModerationError::UnknownKind(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationKind::Companies => "companies",
            ModerationKind::Reviews => "reviews",
            ModerationKind::Tenders => "tenders",
            ModerationKind::Products => "products",
            ModerationKind::Actions => "actions",
        }
    }
}

impl fmt::Display for ModerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 审核对象（响应体直接序列化实体）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModeratedItem {
    Company(Company),
    Review(Review),
    Tender(Tender),
    Product(Product),
    Action(Promotion),
}

/// 解析审核请求中的状态值
pub fn parse_decision(raw: &str) -> ModerationResult<ModerationStatus> {
    match ModerationStatus::from_code(raw) {
        Some(status @ (ModerationStatus::Approved | ModerationStatus::Rejected)) => Ok(status),
        _ => Err(ModerationError::InvalidStatus(raw.to_string())),
    }
}

pub struct ModerationService {
    companies: CompanyRepository,
    reviews: ReviewRepository,
    tenders: TenderRepository,
    products: ProductRepository,
    promotions: PromotionRepository,
}

impl ModerationService {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            companies: CompanyRepository::new(conn.clone()),
            reviews: ReviewRepository::new(conn.clone()),
            tenders: TenderRepository::new(conn.clone()),
            products: ProductRepository::new(conn.clone()),
            promotions: PromotionRepository::new(conn),
        }
    }

    /// 待审核列表（新到旧）
    ///
    /// 公司/评价/招标/活动: status = PENDING；商品: is_active = false
    pub fn list_pending(&self, kind: ModerationKind) -> ModerationResult<Vec<ModeratedItem>> {
        let items = match kind {
            ModerationKind::Companies => self
                .companies
                .list_by_status(CompanyStatus::Pending)?
                .into_iter()
                .map(ModeratedItem::Company)
                .collect(),
            ModerationKind::Reviews => self
                .reviews
                .list_by_status(ModerationStatus::Pending)?
                .into_iter()
                .map(ModeratedItem::Review)
                .collect(),
            ModerationKind::Tenders => self
                .tenders
                .list_by_status(ModerationStatus::Pending)?
                .into_iter()
                .map(ModeratedItem::Tender)
                .collect(),
            ModerationKind::Products => self
                .products
                .list_inactive()?
                .into_iter()
                .map(ModeratedItem::Product)
                .collect(),
            ModerationKind::Actions => self
                .promotions
                .list_by_status(ModerationStatus::Pending)?
                .into_iter()
                .map(ModeratedItem::Action)
                .collect(),
        };
        Ok(items)
    }

    /// 写入审核结果
    ///
    /// # 参数
    /// - kind: 审核对象类别
    /// - id: 记录 id
    /// - raw_status: 请求体中的 status 字段
    /// - now: 当前时间（判断活动是否在有效期内）
    ///
    /// # 返回
    /// 更新后的实体
    #[instrument(skip(self))]
    pub fn set_status(
        &self,
        kind: ModerationKind,
        id: i64,
        raw_status: &str,
        now: NaiveDateTime,
    ) -> ModerationResult<ModeratedItem> {
        let decision = parse_decision(raw_status)?;
        let not_found = || ModerationError::NotFound { kind, id };

        let item = match kind {
            ModerationKind::Companies => {
                self.companies.find_by_id(id)?.ok_or_else(not_found)?;
                let status = match decision {
                    ModerationStatus::Approved => CompanyStatus::Approved,
                    _ => CompanyStatus::Rejected,
                };
                self.companies.update_status(id, status)?;
                ModeratedItem::Company(self.companies.find_by_id(id)?.ok_or_else(not_found)?)
            }
            ModerationKind::Reviews => {
                let review = self.reviews.find_by_id(id)?.ok_or_else(not_found)?;
                self.reviews.update_status(id, decision)?;
                self.recompute_company_rating(review.company_id)?;
                ModeratedItem::Review(self.reviews.find_by_id(id)?.ok_or_else(not_found)?)
            }
            ModerationKind::Tenders => {
                self.tenders.find_by_id(id)?.ok_or_else(not_found)?;
                self.tenders.update_status(id, decision)?;
                ModeratedItem::Tender(self.tenders.find_by_id(id)?.ok_or_else(not_found)?)
            }
            ModerationKind::Products => {
                self.products.find_by_id(id)?.ok_or_else(not_found)?;
                self.products
                    .set_active(id, decision == ModerationStatus::Approved)?;
                ModeratedItem::Product(self.products.find_by_id(id)?.ok_or_else(not_found)?)
            }
            ModerationKind::Actions => {
                self.promotions.find_by_id(id)?.ok_or_else(not_found)?;
                self.promotions.update_status(id, decision)?;
                let promotion = self.promotions.find_by_id(id)?.ok_or_else(not_found)?;
                self.sync_on_sale(&promotion, now)?;
                ModeratedItem::Action(promotion)
            }
        };

        info!(kind = %kind, id, status = %decision, "审核状态已更新");
        Ok(item)
    }

    /// 全量重算公司评分（无已通过评价时为 0）
    pub fn recompute_company_rating(&self, company_id: i64) -> ModerationResult<f64> {
        let ratings = self.reviews.approved_ratings(company_id)?;
        let rating = mean_rating(&ratings).unwrap_or(0.0);
        self.companies.update_rating(company_id, rating)?;
        info!(company_id, rating, approved_reviews = ratings.len(), "公司评分已重算");
        Ok(rating)
    }

    /// 按活动状态与有效期重算关联商品的 on_sale
    fn sync_on_sale(&self, promotion: &Promotion, now: NaiveDateTime) -> ModerationResult<()> {
        let active = promotion.puts_products_on_sale(now);
        for product_id in &promotion.product_ids {
            let on_sale = active
                || self
                    .promotions
                    .product_has_other_active(*product_id, promotion.id, &now)?;
            self.products.set_on_sale(&[*product_id], on_sale)?;
        }
        Ok(())
    }
}
