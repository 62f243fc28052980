// ==========================================
// 导出 → 再导入 集成测试
// ==========================================

mod test_helpers;

use b2b_marketplace::exporter::{
    category_template, company_template, product_template, Exporter, INSTRUCTIONS_SHEET,
};
use b2b_marketplace::importer::{
    CategoryResource, CompanyResource, ImportEngine, ImportOptions, ProductResource,
};
use b2b_marketplace::repository::{CategoryRepository, CompanyRepository, ProductRepository};
use test_helpers::{build_xlsx, create_test_db, read_xlsx, seed_admin, sheet_names, shared_conn};

fn auto() -> ImportOptions {
    ImportOptions {
        auto_create: true,
        ..ImportOptions::default()
    }
}

#[test]
fn test_exported_data_reimports_without_changes() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    seed_admin(&conn);

    // ===== 准备数据 =====
    let categories = build_xlsx(
        &["Название", "Родитель", "Активна"],
        &[
            vec!["Строительные материалы", "", ""],
            vec!["Цемент", "Строительные материалы", ""],
            vec!["Архив", "", "нет"],
        ],
    );
    let companies = build_xlsx(
        &[
            "Название",
            "Номера телефонов",
            "Город",
            "Контакты",
            "Юр. информация",
            "Способы оплаты",
            "Категории",
        ],
        &[
            vec![
                "ТОО \"Строй Альянс\"",
                "+7-777-100-20-30; +7-705-200-40-50",
                "Алматы",
                r#"{"email": "sales@stroyalliance.kz", "social_links": {"telegram": "https://t.me/stroy"}}"#,
                r#"{"inn": "123456789012", "legal_name": "ТОО Строй Альянс"}"#,
                r#"["CASH", "TRANSFER"]"#,
                "Цемент | Строительные материалы",
            ],
            vec!["ИП Ахметов", "", "Шымкент", "", "", "", ""],
        ],
    );
    let products = build_xlsx(
        &["Компания", "Название", "Категория", "Цена", "Валюта", "Остаток"],
        &[
            vec!["ТОО \"Строй Альянс\"", "Цемент М500", "Цемент", "2 450,75", "KZT", "120"],
            vec!["ИП Ахметов", "Кирпич", "", "", "USD", "0"],
        ],
    );

    let category_engine = ImportEngine::new(CategoryResource::new(conn.clone()));
    let company_engine = ImportEngine::new(CompanyResource::new(conn.clone()));
    let product_engine = ImportEngine::new(ProductResource::new(conn.clone()));

    assert_eq!(category_engine.import_bytes("c.xlsx", &categories, &auto()).unwrap().created, 3);
    assert_eq!(company_engine.import_bytes("c.xlsx", &companies, &auto()).unwrap().created, 2);
    assert_eq!(product_engine.import_bytes("p.xlsx", &products, &auto()).unwrap().created, 2);

    // ===== 导出后原样导入 =====
    let exporter = Exporter::new(conn.clone());

    let exported = exporter.export_categories().unwrap();
    let report = category_engine.import_bytes("categories_export.xlsx", &exported, &auto()).unwrap();
    assert_eq!((report.created, report.updated, report.skipped), (0, 0, 3), "{:?}", report.errors);

    let exported = exporter.export_companies().unwrap();
    let report = company_engine.import_bytes("companies_export.xlsx", &exported, &auto()).unwrap();
    assert_eq!((report.created, report.updated, report.skipped), (0, 0, 2), "{:?}", report.errors);

    let exported = exporter.export_products().unwrap();
    let report = product_engine.import_bytes("products_export.xlsx", &exported, &auto()).unwrap();
    assert_eq!((report.created, report.updated, report.skipped), (0, 0, 2), "{:?}", report.errors);
}

#[test]
fn test_namesake_categories_keep_their_links_through_export() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    seed_admin(&conn);

    let categories = build_xlsx(&["Название"], &[vec!["Трубы"], vec!["Трубы"]]);
    ImportEngine::new(CategoryResource::new(conn.clone()))
        .import_bytes("c.xlsx", &categories, &auto())
        .unwrap();
    let namesakes = CategoryRepository::new(conn.clone()).find_by_name("Трубы").unwrap();
    assert_eq!(namesakes.len(), 2);
    let second = &namesakes[1];
    assert_eq!(second.slug, "трубы-1");

    // 同名分类只能通过 slug 引用
    let products = build_xlsx(
        &["Компания", "Название", "Категория"],
        &[vec!["Acme", "Труба 57x3", "трубы-1"]],
    );
    let product_engine = ImportEngine::new(ProductResource::new(conn.clone()));
    let report = product_engine.import_bytes("p.xlsx", &products, &auto()).unwrap();
    assert_eq!(report.created, 1, "{:?}", report.errors);

    let companies = build_xlsx(
        &["Название", "Категории"],
        &[vec!["Acme", "трубы-1"]],
    );
    let company_engine = ImportEngine::new(CompanyResource::new(conn.clone()));
    let report = company_engine.import_bytes("c.xlsx", &companies, &auto()).unwrap();
    assert_eq!(report.errors, Vec::<String>::new());

    let company = CompanyRepository::new(conn.clone())
        .find_first_by_name("Acme")
        .unwrap()
        .unwrap();
    assert_eq!(company.category_ids, vec![second.id]);

    let exporter = Exporter::new(conn.clone());
    let exported = exporter.export_products().unwrap();
    let rows = read_xlsx(&exported, "Products");
    let col = rows[0].iter().position(|h| h == "Категория").unwrap();
    assert_eq!(rows[1][col], "трубы-1");

    let report = product_engine
        .import_bytes("products_export.xlsx", &exported, &auto())
        .unwrap();
    assert_eq!((report.created, report.updated, report.skipped), (0, 0, 1), "{:?}", report.errors);

    let exported = exporter.export_companies().unwrap();
    let report = company_engine
        .import_bytes("companies_export.xlsx", &exported, &auto())
        .unwrap();
    assert_eq!((report.created, report.updated, report.skipped), (0, 0, 1), "{:?}", report.errors);

    let product = ProductRepository::new(conn.clone())
        .find_by_company_and_title(company.id, "Труба 57x3")
        .unwrap()
        .unwrap();
    assert_eq!(product.category_id, Some(second.id));
    let company = CompanyRepository::new(conn).find_by_id(company.id).unwrap().unwrap();
    assert_eq!(company.category_ids, vec![second.id]);
}

#[test]
fn test_namesake_category_by_name_is_row_error() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    seed_admin(&conn);

    let categories = build_xlsx(&["Название"], &[vec!["Трубы"], vec!["Трубы"]]);
    ImportEngine::new(CategoryResource::new(conn.clone()))
        .import_bytes("c.xlsx", &categories, &auto())
        .unwrap();

    let products = build_xlsx(
        &["Компания", "Название", "Категория"],
        &[vec!["Acme", "Труба 57x3", "Трубы"]],
    );
    let report = ImportEngine::new(ProductResource::new(conn.clone()))
        .import_bytes("p.xlsx", &products, &auto())
        .unwrap();
    assert_eq!(report.created, 0);
    assert_eq!(report.skipped, 1);
    assert!(report.errors[0].starts_with("Строка 2:"), "{}", report.errors[0]);
    // 不再自动创建第三个同名分类
    assert_eq!(CategoryRepository::new(conn).find_by_name("Трубы").unwrap().len(), 2);
}

#[test]
fn test_company_export_layout() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    seed_admin(&conn);

    let companies = build_xlsx(
        &["Название", "Номера телефонов", "Статус"],
        &[vec!["Acme", "+7 700 000 00 00", "Черновик"]],
    );
    ImportEngine::new(CompanyResource::new(conn.clone()))
        .import_bytes("c.xlsx", &companies, &ImportOptions::default())
        .unwrap();

    let bytes = Exporter::new(conn).export_companies().unwrap();
    assert_eq!(sheet_names(&bytes), vec!["Companies".to_string()]);

    let rows = read_xlsx(&bytes, "Companies");
    assert_eq!(rows.len(), 2);
    let headers = &rows[0];
    assert_eq!(headers[1], "Название");
    assert_eq!(headers.last().map(String::as_str), Some("Дата создания"));

    let col = |name: &str| headers.iter().position(|h| h == name).unwrap();
    let data = &rows[1];
    assert_eq!(data[col("Название")], "Acme");
    assert_eq!(data[col("Номера телефонов")], "+7 700 000 00 00");
    assert_eq!(data[col("Статус")], "Черновик");
    assert_eq!(data[col("Владелец")], "admin");

    let contacts: serde_json::Value = serde_json::from_str(&data[col("Контакты")]).unwrap();
    assert_eq!(contacts["phone"], "+7 700 000 00 00");
    assert_eq!(contacts["phones"], serde_json::json!(["+7 700 000 00 00"]));
}

#[test]
fn test_templates_have_instructions_sheet() {
    for (bytes, data_sheet) in [
        (company_template().unwrap(), "Companies"),
        (product_template().unwrap(), "Products"),
        (category_template().unwrap(), "Categories"),
    ] {
        let names = sheet_names(&bytes);
        assert_eq!(names, vec![data_sheet.to_string(), INSTRUCTIONS_SHEET.to_string()]);

        let data = read_xlsx(&bytes, data_sheet);
        assert!(data.len() >= 2, "{} template has no sample rows", data_sheet);

        let instructions = read_xlsx(&bytes, INSTRUCTIONS_SHEET);
        assert!(instructions.len() > 1);
    }
}

#[test]
fn test_product_template_imports_cleanly_with_auto_create() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    seed_admin(&conn);

    let bytes = product_template().unwrap();
    let report = ImportEngine::new(ProductResource::new(conn))
        .import_bytes("sample_products_import.xlsx", &bytes, &auto())
        .unwrap();
    assert!(report.created > 0);
    assert!(report.errors.is_empty(), "{:?}", report.errors);
}
