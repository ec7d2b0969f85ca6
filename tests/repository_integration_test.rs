// ==========================================
// ItemRepository 集成测试
// ==========================================
// 测试目标: 验证幂等写入、事务边界与运行审计
// ==========================================

mod test_helpers;

use chrono::{Duration, Utc};
use feed_importer::repository::{ItemRepository, ItemRepositoryImpl};
use feed_importer::{logging, ImportRun, ImportStatus};
use test_helpers::{create_test_db, make_item};

#[tokio::test]
async fn test_upsert_batch_empty_is_noop() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().expect("Failed to create test db");
    let repo = ItemRepositoryImpl::new(&db_path).expect("Failed to create repo");

    let count = repo.upsert_batch(&[]).await.unwrap();

    assert_eq!(count, 0);
    assert_eq!(repo.count_items().await.unwrap(), 0);
}

#[tokio::test]
async fn test_upsert_batch_inserts_all_rows() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().expect("Failed to create test db");
    let repo = ItemRepositoryImpl::new(&db_path).expect("Failed to create repo");

    let items = vec![
        make_item("4006381333931", "A", "1.00", 1),
        make_item("12345678", "B", "2.00", 2),
        make_item("123456789012", "C", "3.00", 3),
    ];

    let count = repo.upsert_batch(&items).await.unwrap();

    assert_eq!(count, 3);
    assert_eq!(repo.count_items().await.unwrap(), 3);
}

#[tokio::test]
async fn test_upsert_same_gtin_twice_keeps_one_row_with_latest_values() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().expect("Failed to create test db");
    let repo = ItemRepositoryImpl::new(&db_path).expect("Failed to create repo");

    repo.upsert(&make_item("4006381333931", "Erste", "9.99", 5))
        .await
        .unwrap();
    repo.upsert(&make_item("4006381333931", "Zweite", "19.99", 8))
        .await
        .unwrap();

    // 恰好一行,且为第二次写入的值
    assert_eq!(repo.count_items().await.unwrap(), 1);

    let item = repo.find_by_gtin("4006381333931").await.unwrap().unwrap();
    assert_eq!(item.title, "Zweite");
    assert_eq!(item.price, "19.99");
    assert_eq!(item.stock, 8);
}

#[tokio::test]
async fn test_find_by_gtin_returns_none_for_unknown_key() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().expect("Failed to create test db");
    let repo = ItemRepositoryImpl::new(&db_path).expect("Failed to create repo");

    let found = repo.find_by_gtin("99999999").await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_find_by_gtin_roundtrips_all_fields() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().expect("Failed to create test db");
    let repo = ItemRepositoryImpl::new(&db_path).expect("Failed to create repo");

    let item = make_item("12345678", "Schraube", "2.50", 42);
    repo.upsert(&item).await.unwrap();

    let found = repo.find_by_gtin("12345678").await.unwrap().unwrap();
    assert_eq!(found, item);
}

#[tokio::test]
async fn test_insert_and_list_recent_runs() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().expect("Failed to create test db");
    let repo = ItemRepositoryImpl::new(&db_path).expect("Failed to create repo");

    let older = ImportRun {
        run_id: "run-older".to_string(),
        file_name: Some("feed_a.csv".to_string()),
        status: ImportStatus::Success,
        processed: 10,
        imported: 10,
        skipped: 0,
        dry_run: false,
        errors_json: None,
        started_at: Utc::now() - Duration::minutes(5),
        elapsed_ms: 120,
    };
    let newer = ImportRun {
        run_id: "run-newer".to_string(),
        file_name: Some("feed_b.csv".to_string()),
        status: ImportStatus::PartialFailure,
        processed: 8,
        imported: 6,
        skipped: 2,
        dry_run: false,
        errors_json: Some("{\"2\":[\"x\"]}".to_string()),
        started_at: Utc::now(),
        elapsed_ms: 95,
    };

    repo.insert_run(older).await.unwrap();
    repo.insert_run(newer).await.unwrap();

    // 按开始时间倒序
    let runs = repo.recent_runs(10).await.unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].run_id, "run-newer");
    assert_eq!(runs[0].status, ImportStatus::PartialFailure);
    assert_eq!(runs[0].skipped, 2);
    assert_eq!(runs[1].run_id, "run-older");

    // limit 生效
    let runs = repo.recent_runs(1).await.unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_id, "run-newer");
}
