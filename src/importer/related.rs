// ==========================================
// B2B 交易平台 - 关联记录解析
// ==========================================
// 职责: 按显示名称查找 owner / 公司 / 分类 / 父分类
// 同名多条: 行级错误（分类可改用 slug 引用）
// 缺失时: auto_create 开启 → 创建最小占位记录并单独记 warn 日志
//         auto_create 关闭 → 行级错误
// ==========================================

use crate::domain::category::{slug_candidate, slugify, Category};
use crate::domain::company::Company;
use crate::domain::user::User;
use crate::importer::error::{ImportError, ImportResult, RelatedEntity, StorageContext};
use crate::importer::resource::ImportContext;
use crate::repository::error::RepositoryResult;
use crate::repository::{CategoryRepository, CompanyRepository, UserRepository};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// 兜底系统用户名
pub const SYSTEM_USERNAME: &str = "system";

pub struct RelatedResolver {
    users: UserRepository,
    companies: CompanyRepository,
    categories: CategoryRepository,
}

impl RelatedResolver {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            users: UserRepository::new(conn.clone()),
            companies: CompanyRepository::new(conn.clone()),
            categories: CategoryRepository::new(conn),
        }
    }

    // ==========================================
    // 用户
    // ==========================================

    /// 解析公司 owner（含 '@' 按邮箱，否则按用户名）
    pub fn resolve_owner(&self, ctx: &mut ImportContext, row: usize, value: &str) -> ImportResult<i64> {
        let found = if value.contains('@') {
            self.users.find_by_email(value).at_row(row)?
        } else {
            self.users.find_by_username(value).at_row(row)?
        };

        match found {
            Some(user) => Ok(user.id),
            None if ctx.auto_create => {
                warn!(row, owner = %value, "owner 不存在，改用系统用户");
                self.fallback_owner(ctx, row)
            }
            None => Err(ImportError::RelatedNotFound {
                row,
                entity: RelatedEntity::User,
                value: value.to_string(),
            }),
        }
    }

    /// 兜底 owner: 第一个超级用户；不存在且允许自动创建时新建 system 用户
    pub fn fallback_owner(&self, ctx: &mut ImportContext, row: usize) -> ImportResult<i64> {
        if let Some(user) = self.users.first_superuser().at_row(row)? {
            return Ok(user.id);
        }
        if !ctx.auto_create {
            return Err(ImportError::NoSystemUser(row));
        }

        // system 用户名可能已被非超级用户占用
        if let Some(user) = self.users.find_by_username(SYSTEM_USERNAME).at_row(row)? {
            return Ok(user.id);
        }

        let user = User {
            id: 0,
            username: SYSTEM_USERNAME.to_string(),
            email: String::new(),
            is_superuser: true,
            is_staff: true,
        };
        let id = self.users.insert(&user).at_row(row)?;
        ctx.auto_created += 1;
        warn!(
            row,
            entity = "user",
            user_id = id,
            auto_created = true,
            "自动创建系统用户"
        );
        Ok(id)
    }

    // ==========================================
    // 公司
    // ==========================================

    /// 按名称解析公司（同名多条时报错）
    pub fn resolve_company(&self, ctx: &mut ImportContext, row: usize, name: &str) -> ImportResult<i64> {
        let matches = self.companies.find_by_name(name).at_row(row)?;
        match matches.as_slice() {
            [company] => return Ok(company.id),
            [] => {}
            _ => {
                return Err(ImportError::AmbiguousReference {
                    row,
                    entity: RelatedEntity::Company,
                    value: name.to_string(),
                    count: matches.len(),
                })
            }
        }
        if !ctx.auto_create {
            return Err(ImportError::RelatedNotFound {
                row,
                entity: RelatedEntity::Company,
                value: name.to_string(),
            });
        }

        let owner_id = self.fallback_owner(ctx, row)?;
        let company = Company::new(name, owner_id, ctx.now);
        let id = self.companies.insert(&company).at_row(row)?;
        ctx.auto_created += 1;
        warn!(
            row,
            entity = "company",
            company_id = id,
            name = %name,
            auto_created = true,
            "自动创建公司"
        );
        Ok(id)
    }

    // ==========================================
    // 分类
    // ==========================================

    /// 解析分类（名称唯一命中优先，其次 slug）
    pub fn resolve_category(&self, ctx: &mut ImportContext, row: usize, value: &str) -> ImportResult<i64> {
        match self.find_category(row, value)? {
            Some(id) => Ok(id),
            None => self.create_missing_category(ctx, row, value),
        }
    }

    /// 解析父分类，规则同 resolve_category
    pub fn resolve_parent(&self, ctx: &mut ImportContext, row: usize, value: &str) -> ImportResult<i64> {
        self.resolve_category(ctx, row, value)
    }

    fn find_category(&self, row: usize, value: &str) -> ImportResult<Option<i64>> {
        let matches = self.categories.find_by_name(value).at_row(row)?;
        match matches.as_slice() {
            [category] => Ok(Some(category.id)),
            [] => Ok(self.categories.find_by_slug(value).at_row(row)?.map(|c| c.id)),
            _ => {
                // 同名时 slug 仍可唯一定位
                if let Some(category) = self.categories.find_by_slug(value).at_row(row)? {
                    return Ok(Some(category.id));
                }
                Err(ImportError::AmbiguousReference {
                    row,
                    entity: RelatedEntity::Category,
                    value: value.to_string(),
                    count: matches.len(),
                })
            }
        }
    }

    fn create_missing_category(
        &self,
        ctx: &mut ImportContext,
        row: usize,
        name: &str,
    ) -> ImportResult<i64> {
        if !ctx.auto_create {
            return Err(ImportError::RelatedNotFound {
                row,
                entity: RelatedEntity::Category,
                value: name.to_string(),
            });
        }

        let slug = self.unique_slug(&slugify(name), None).at_row(row)?;
        let category = Category::new(name, &slug, None);
        let id = self.categories.insert(&category).at_row(row)?;
        ctx.auto_created += 1;
        warn!(
            row,
            entity = "category",
            category_id = id,
            name = %name,
            slug = %slug,
            auto_created = true,
            "自动创建分类"
        );
        Ok(id)
    }

    /// 生成全局唯一 slug: base, base-1, base-2, ...
    ///
    /// # 参数
    /// - exclude_id: 更新已有记录时排除其自身
    pub fn unique_slug(&self, base: &str, exclude_id: Option<i64>) -> RepositoryResult<String> {
        let mut attempt = 0;
        loop {
            let candidate = slug_candidate(base, attempt);
            if !self.categories.slug_taken(&candidate, exclude_id)? {
                return Ok(candidate);
            }
            attempt += 1;
        }
    }
}
