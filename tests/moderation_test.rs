// ==========================================
// 审核流程集成测试
// ==========================================

mod test_helpers;

use b2b_marketplace::domain::{CompanyStatus, ModerationStatus, Product, Promotion};
use b2b_marketplace::moderation::{ModeratedItem, ModerationError, ModerationKind, ModerationService};
use b2b_marketplace::repository::{
    CompanyRepository, ProductRepository, PromotionRepository, ReviewRepository,
};
use chrono::Duration;
use test_helpers::{create_test_db, seed_admin, seed_company, seed_review, seed_user, shared_conn, test_now};

#[test]
fn test_review_approval_recomputes_company_rating() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    let admin = seed_admin(&conn);
    let company_id = seed_company(&conn, "Acme", admin);
    let authors: Vec<i64> = ["buyer1", "buyer2", "buyer3"]
        .iter()
        .map(|name| seed_user(&conn, name, false))
        .collect();

    // 每位作者对同一公司只能有一条评价
    seed_review(&conn, company_id, authors[0], 4, ModerationStatus::Approved);
    seed_review(&conn, company_id, authors[1], 5, ModerationStatus::Approved);
    let pending = seed_review(&conn, company_id, authors[2], 3, ModerationStatus::Pending);

    let service = ModerationService::new(conn.clone());
    assert_eq!(service.recompute_company_rating(company_id).unwrap(), 4.5);

    let item = service
        .set_status(ModerationKind::Reviews, pending, "APPROVED", test_now())
        .unwrap();
    match item {
        ModeratedItem::Review(review) => assert_eq!(review.status, ModerationStatus::Approved),
        other => panic!("unexpected item: {:?}", other),
    }

    let company = CompanyRepository::new(conn.clone())
        .find_by_id(company_id)
        .unwrap()
        .unwrap();
    assert_eq!(company.rating, 4.0);

    // 驳回后从平均值中移除
    service
        .set_status(ModerationKind::Reviews, pending, "REJECTED", test_now())
        .unwrap();
    let company = CompanyRepository::new(conn)
        .find_by_id(company_id)
        .unwrap()
        .unwrap();
    assert_eq!(company.rating, 4.5);
}

#[test]
fn test_invalid_status_changes_nothing() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    let admin = seed_admin(&conn);
    let buyer = seed_user(&conn, "buyer", false);
    let company_id = seed_company(&conn, "Acme", admin);
    let review = seed_review(&conn, company_id, buyer, 2, ModerationStatus::Pending);

    let service = ModerationService::new(conn.clone());
    for raw in ["PENDING", "approved", ""] {
        let err = service
            .set_status(ModerationKind::Reviews, review, raw, test_now())
            .unwrap_err();
        assert!(matches!(err, ModerationError::InvalidStatus(_)));
        assert_eq!(err.to_string(), "Invalid status");
    }

    let stored = ReviewRepository::new(conn)
        .find_by_id(review)
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ModerationStatus::Pending);
}

#[test]
fn test_missing_record_is_not_found() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);

    let err = ModerationService::new(conn)
        .set_status(ModerationKind::Companies, 999, "APPROVED", test_now())
        .unwrap_err();
    assert!(matches!(err, ModerationError::NotFound { id: 999, .. }));
}

#[test]
fn test_company_moderation_and_pending_list() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    let admin = seed_admin(&conn);
    let companies = CompanyRepository::new(conn.clone());

    let first = seed_company(&conn, "Acme", admin);
    let second = seed_company(&conn, "Beta", admin);
    companies.update_status(first, CompanyStatus::Pending).unwrap();
    companies.update_status(second, CompanyStatus::Pending).unwrap();

    let service = ModerationService::new(conn.clone());
    assert_eq!(service.list_pending(ModerationKind::Companies).unwrap().len(), 2);

    service
        .set_status(ModerationKind::Companies, first, "REJECTED", test_now())
        .unwrap();
    let pending = service.list_pending(ModerationKind::Companies).unwrap();
    assert_eq!(pending.len(), 1);
    assert!(matches!(&pending[0], ModeratedItem::Company(c) if c.id == second));

    let rejected = companies.find_by_id(first).unwrap().unwrap();
    assert_eq!(rejected.status, CompanyStatus::Rejected);
}

#[test]
fn test_product_moderation_toggles_active_flag() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    let admin = seed_admin(&conn);
    let company_id = seed_company(&conn, "Acme", admin);

    let products = ProductRepository::new(conn.clone());
    let mut product = Product::new(company_id, "Цемент М500", test_now());
    product.is_active = false;
    let product_id = products.insert(&product).unwrap();

    let service = ModerationService::new(conn.clone());
    assert_eq!(service.list_pending(ModerationKind::Products).unwrap().len(), 1);

    service
        .set_status(ModerationKind::Products, product_id, "APPROVED", test_now())
        .unwrap();
    assert!(products.find_by_id(product_id).unwrap().unwrap().is_active);
    assert!(service.list_pending(ModerationKind::Products).unwrap().is_empty());

    service
        .set_status(ModerationKind::Products, product_id, "REJECTED", test_now())
        .unwrap();
    assert!(!products.find_by_id(product_id).unwrap().unwrap().is_active);
}

#[test]
fn test_promotion_approval_puts_products_on_sale() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    let admin = seed_admin(&conn);
    let company_id = seed_company(&conn, "Acme", admin);

    let products = ProductRepository::new(conn.clone());
    let product_id = products
        .insert(&Product::new(company_id, "Арматура", test_now()))
        .unwrap();

    let promotion_id = PromotionRepository::new(conn.clone())
        .insert(&Promotion {
            id: 0,
            company_id,
            title: "Зимняя распродажа".to_string(),
            starts_at: test_now() - Duration::days(5),
            ends_at: test_now() + Duration::days(5),
            status: ModerationStatus::Pending,
            product_ids: vec![product_id],
            created_at: test_now(),
        })
        .unwrap();

    let service = ModerationService::new(conn.clone());
    assert_eq!(service.list_pending(ModerationKind::Actions).unwrap().len(), 1);

    service
        .set_status(ModerationKind::Actions, promotion_id, "APPROVED", test_now())
        .unwrap();
    assert!(products.find_by_id(product_id).unwrap().unwrap().on_sale);

    service
        .set_status(ModerationKind::Actions, promotion_id, "REJECTED", test_now())
        .unwrap();
    assert!(!products.find_by_id(product_id).unwrap().unwrap().on_sale);

    // 已过期的活动不会开启促销
    let expired = test_now() + Duration::days(30);
    service
        .set_status(ModerationKind::Actions, promotion_id, "APPROVED", expired)
        .unwrap();
    assert!(!products.find_by_id(product_id).unwrap().unwrap().on_sale);
}
