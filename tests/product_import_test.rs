// ==========================================
// 商品导入集成测试
// ==========================================

mod test_helpers;

use b2b_marketplace::importer::{ImportEngine, ImportOptions, ProductResource};
use b2b_marketplace::repository::{CategoryRepository, CompanyRepository, ProductRepository};
use b2b_marketplace::Currency;
use test_helpers::{build_xlsx, create_test_db, seed_admin, seed_company, shared_conn};

const HEADERS: &[&str] = &["Компания", "Название", "Цена", "Валюта", "Остаток", "Активен"];

fn options(auto_create: bool) -> ImportOptions {
    ImportOptions {
        auto_create,
        ..ImportOptions::default()
    }
}

#[test]
fn test_stock_quantity_maps_to_in_stock_flag() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    let admin = seed_admin(&conn);
    let company_id = seed_company(&conn, "Acme", admin);

    let engine = ImportEngine::new(ProductResource::new(conn.clone()));
    let bytes = build_xlsx(
        HEADERS,
        &[
            vec!["Acme", "Труба 57мм", "1 500,50", "KZT", "5", "да"],
            vec!["Acme", "Труба 89мм", "2000", "usd", "0", "нет"],
            vec!["Acme", "Труба 108мм", "", "", "", ""],
        ],
    );
    let report = engine.import_bytes("p.xlsx", &bytes, &options(false)).unwrap();
    assert_eq!(report.created, 3);
    assert!(report.errors.is_empty(), "{:?}", report.errors);

    let products = ProductRepository::new(conn.clone());
    let p57 = products
        .find_by_company_and_title(company_id, "Труба 57мм")
        .unwrap()
        .unwrap();
    assert!(p57.in_stock);
    assert!(p57.is_active);
    assert_eq!(p57.price, Some(1500.5));
    assert_eq!(p57.currency, Currency::Kzt);

    let p89 = products
        .find_by_company_and_title(company_id, "Труба 89мм")
        .unwrap()
        .unwrap();
    assert!(!p89.in_stock);
    assert!(!p89.is_active);
    assert_eq!(p89.currency, Currency::Usd);

    let p108 = products
        .find_by_company_and_title(company_id, "Труба 108мм")
        .unwrap()
        .unwrap();
    assert!(p108.in_stock);
    assert_eq!(p108.price, None);
}

#[test]
fn test_empty_stock_leaves_existing_flag_untouched() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    let admin = seed_admin(&conn);
    let company_id = seed_company(&conn, "Acme", admin);

    let engine = ImportEngine::new(ProductResource::new(conn.clone()));
    let out_of_stock = build_xlsx(HEADERS, &[vec!["Acme", "Цемент М500", "", "", "0", ""]]);
    engine.import_bytes("p.xlsx", &out_of_stock, &options(false)).unwrap();

    let untouched = build_xlsx(HEADERS, &[vec!["Acme", "Цемент М500", "", "", "", ""]]);
    let report = engine.import_bytes("p.xlsx", &untouched, &options(false)).unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.updated, 0);

    let product = ProductRepository::new(conn)
        .find_by_company_and_title(company_id, "Цемент М500")
        .unwrap()
        .unwrap();
    assert!(!product.in_stock);
}

#[test]
fn test_non_numeric_price_is_row_error() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    let admin = seed_admin(&conn);
    seed_company(&conn, "Acme", admin);

    let bytes = build_xlsx(
        HEADERS,
        &[
            vec!["Acme", "Кирпич", "дорого", "", "", ""],
            vec!["Acme", "Песок", "12.5", "", "", ""],
        ],
    );
    let report = ImportEngine::new(ProductResource::new(conn))
        .import_bytes("p.xlsx", &bytes, &options(false))
        .unwrap();

    assert_eq!(report.created, 1);
    assert_eq!(report.skipped, 1);
    assert!(report.errors[0].starts_with("Строка 2:"), "{}", report.errors[0]);
}

#[test]
fn test_unknown_company_depends_on_auto_create() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    seed_admin(&conn);

    let bytes = build_xlsx(
        &["Компания", "Название", "Категория"],
        &[vec!["Новая компания", "Арматура", "Металлопрокат"]],
    );
    let engine = ImportEngine::new(ProductResource::new(conn.clone()));

    let strict = engine.import_bytes("p.xlsx", &bytes, &options(false)).unwrap();
    assert_eq!(strict.created, 0);
    assert_eq!(strict.skipped, 1);
    assert_eq!(strict.errors.len(), 1);
    assert!(CompanyRepository::new(conn.clone())
        .find_first_by_name("Новая компания")
        .unwrap()
        .is_none());

    let lenient = engine.import_bytes("p.xlsx", &bytes, &options(true)).unwrap();
    assert_eq!(lenient.created, 1);
    assert!(lenient.errors.is_empty());

    let company = CompanyRepository::new(conn.clone())
        .find_first_by_name("Новая компания")
        .unwrap()
        .unwrap();
    let categories = CategoryRepository::new(conn.clone())
        .find_by_name("Металлопрокат")
        .unwrap();
    assert_eq!(categories.len(), 1);
    let category = &categories[0];
    let product = ProductRepository::new(conn)
        .find_by_company_and_title(company.id, "Арматура")
        .unwrap()
        .unwrap();
    assert_eq!(product.category_id, Some(category.id));
}

#[test]
fn test_company_name_shared_by_two_records_is_row_error() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    let admin = seed_admin(&conn);
    seed_company(&conn, "Acme", admin);
    seed_company(&conn, "Acme", admin);

    let bytes = build_xlsx(HEADERS, &[vec!["Acme", "Кирпич", "", "", "", ""]]);
    let report = ImportEngine::new(ProductResource::new(conn.clone()))
        .import_bytes("p.xlsx", &bytes, &options(true))
        .unwrap();

    assert_eq!(report.created, 0);
    assert_eq!(report.skipped, 1);
    assert!(report.errors[0].starts_with("Строка 2:"), "{}", report.errors[0]);
    assert!(report.errors[0].contains("Acme"), "{}", report.errors[0]);
    // 不自动创建第三家同名公司
    assert_eq!(CompanyRepository::new(conn).find_by_name("Acme").unwrap().len(), 2);
}

#[test]
fn test_missing_required_product_column_is_fatal() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);

    let bytes = build_xlsx(&["Название"], &[vec!["Арматура"]]);
    let err = ImportEngine::new(ProductResource::new(conn))
        .import_bytes("p.xlsx", &bytes, &options(true))
        .unwrap_err();
    assert!(err.is_request_fatal());
}
