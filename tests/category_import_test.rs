// ==========================================
// 分类导入集成测试
// ==========================================

mod test_helpers;

use b2b_marketplace::importer::{CategoryResource, ImportEngine, ImportOptions};
use b2b_marketplace::repository::CategoryRepository;
use test_helpers::{build_xlsx, create_test_db, shared_conn};

#[test]
fn test_duplicate_names_get_distinct_slugs_and_reimport_is_idempotent() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);

    let bytes = build_xlsx(&["Название"], &[vec!["Трубы"], vec!["Трубы"]]);
    let engine = ImportEngine::new(CategoryResource::new(conn.clone()));

    let first = engine
        .import_bytes("c.xlsx", &bytes, &ImportOptions::default())
        .unwrap();
    assert_eq!(first.created, 2);

    let mut slugs: Vec<String> = CategoryRepository::new(conn.clone())
        .list_all()
        .unwrap()
        .into_iter()
        .map(|c| c.slug)
        .collect();
    slugs.sort();
    assert_eq!(slugs, vec!["трубы".to_string(), "трубы-1".to_string()]);

    let second = engine
        .import_bytes("c.xlsx", &bytes, &ImportOptions::default())
        .unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 0);
    assert_eq!(second.skipped, 2);
    assert_eq!(CategoryRepository::new(conn).list_all().unwrap().len(), 2);
}

#[test]
fn test_parent_resolved_by_name_and_slug() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);

    let bytes = build_xlsx(
        &["Название", "Slug", "Родитель", "Активна"],
        &[
            vec!["Металлопрокат", "metal", "", ""],
            vec!["Трубы", "", "Металлопрокат", ""],
            vec!["Арматура", "", "metal", "нет"],
        ],
    );
    let report = ImportEngine::new(CategoryResource::new(conn.clone()))
        .import_bytes("c.xlsx", &bytes, &ImportOptions::default())
        .unwrap();
    assert_eq!(report.created, 3);
    assert!(report.errors.is_empty(), "{:?}", report.errors);

    let repo = CategoryRepository::new(conn);
    let metal = repo.find_by_slug("metal").unwrap().unwrap();
    let pipes = repo.find_by_slug("трубы").unwrap().unwrap();
    let rebar = repo.find_by_slug("арматура").unwrap().unwrap();
    assert_eq!(pipes.parent_id, Some(metal.id));
    assert_eq!(rebar.parent_id, Some(metal.id));
    assert!(pipes.is_active);
    assert!(!rebar.is_active);
}

#[test]
fn test_self_parent_is_row_error() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    let engine = ImportEngine::new(CategoryResource::new(conn.clone()));

    let create = build_xlsx(&["Название"], &[vec!["Трубы"]]);
    engine
        .import_bytes("c.xlsx", &create, &ImportOptions::default())
        .unwrap();

    let self_parent = build_xlsx(&["Название", "Родитель"], &[vec!["Трубы", "Трубы"]]);
    let report = engine
        .import_bytes("c.xlsx", &self_parent, &ImportOptions::default())
        .unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("Строка 2:"));

    let pipes = CategoryRepository::new(conn)
        .find_by_slug("трубы")
        .unwrap()
        .unwrap();
    assert_eq!(pipes.parent_id, None);
}

#[test]
fn test_explicit_slug_change_stays_unique() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    let engine = ImportEngine::new(CategoryResource::new(conn.clone()));

    let create = build_xlsx(
        &["Название", "Slug"],
        &[vec!["Трубы", "pipes"], vec!["Цемент", "cement"]],
    );
    engine
        .import_bytes("c.xlsx", &create, &ImportOptions::default())
        .unwrap();
    let cement = CategoryRepository::new(conn.clone())
        .find_by_slug("cement")
        .unwrap()
        .unwrap();

    // 按 ID 匹配，新 slug 与已有记录冲突 → 追加序号
    let id = cement.id.to_string();
    let rename = build_xlsx(&["ID", "Название", "Slug"], &[vec![id.as_str(), "Цемент", "pipes"]]);
    let report = engine
        .import_bytes("c.xlsx", &rename, &ImportOptions::default())
        .unwrap();
    assert_eq!(report.updated, 1);

    let updated = CategoryRepository::new(conn)
        .find_by_id(cement.id)
        .unwrap()
        .unwrap();
    assert_eq!(updated.slug, "pipes-1");
}

#[test]
fn test_english_header_aliases_are_accepted() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);

    let bytes = build_xlsx(&["name", "parent"], &[vec!["Root", ""], vec!["Leaf", "Root"]]);
    let report = ImportEngine::new(CategoryResource::new(conn.clone()))
        .import_bytes("c.xlsx", &bytes, &ImportOptions::default())
        .unwrap();
    assert_eq!(report.created, 2);

    let repo = CategoryRepository::new(conn);
    let root = repo.find_by_slug("root").unwrap().unwrap();
    let leaf = repo.find_by_slug("leaf").unwrap().unwrap();
    assert_eq!(leaf.parent_id, Some(root.id));
}
