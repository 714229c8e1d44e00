//! Integration tests for the `items` repository.
//!
//! Exercises the bulk replace-all protocol against a real database:
//! - Round-trip and ordering
//! - Idempotence of repeated syncs
//! - Rollback when an insert fails mid-sync

use devsnippet_core::category::Category;
use devsnippet_core::item::Item;
use devsnippet_db::repositories::ItemRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_item(id: &str, category: Category, updated_at: i64) -> Item {
    Item {
        id: id.to_string(),
        title: format!("Item {id}"),
        content: format!("content of {id}"),
        description: None,
        category,
        tags: vec![],
        created_at: 1_700_000_000_000,
        updated_at,
        language: None,
        registry_path: None,
        registry_name: None,
        registry_type: None,
    }
}

fn sample_items() -> Vec<Item> {
    let mut code = new_item("code", Category::Code, 1_700_000_000_300);
    code.language = Some("typescript".into());
    code.tags = vec!["react".into(), "hooks".into(), "performance".into()];
    code.description = Some("Custom hook".into());

    let mut reg = new_item("reg", Category::Registry, 1_700_000_000_100);
    reg.registry_path = Some(r"HKEY_LOCAL_MACHINE\SOFTWARE\Policies".into());
    reg.registry_name = Some("@".into());
    reg.registry_type = Some("REG_DWORD".into());
    // Category-foreign field must survive the round-trip.
    reg.language = Some("python".into());

    let prompt = new_item("prompt", Category::Prompt, 1_700_000_000_200);

    vec![reg, code, prompt]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_then_list_round_trips(pool: PgPool) {
    let items = sample_items();
    let inserted = ItemRepo::replace_all(&pool, &items).await.unwrap();
    assert_eq!(inserted, 3);

    let listed = ItemRepo::list_all(&pool).await.unwrap();

    // Ordered by updated_at descending.
    let ids: Vec<&str> = listed.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["code", "prompt", "reg"]);

    for original in &items {
        let stored = listed.iter().find(|i| i.id == original.id).unwrap();
        assert_eq!(stored, original);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tags_keep_order(pool: PgPool) {
    let mut item = new_item("t", Category::Note, 1);
    item.tags = vec!["zeta".into(), "alpha".into(), "mid".into()];
    ItemRepo::replace_all(&pool, &[item]).await.unwrap();

    let listed = ItemRepo::list_all(&pool).await.unwrap();
    assert_eq!(listed[0].tags, ["zeta", "alpha", "mid"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_is_idempotent(pool: PgPool) {
    let items = sample_items();
    ItemRepo::replace_all(&pool, &items).await.unwrap();
    let first = ItemRepo::list_all(&pool).await.unwrap();

    ItemRepo::replace_all(&pool, &items).await.unwrap();
    let second = ItemRepo::list_all(&pool).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(ItemRepo::count(&pool).await.unwrap(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_with_subset_drops_missing_rows(pool: PgPool) {
    let items = sample_items();
    ItemRepo::replace_all(&pool, &items).await.unwrap();
    ItemRepo::replace_all(&pool, &items[..1]).await.unwrap();

    let listed = ItemRepo::list_all(&pool).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "reg");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_replace_clears_store(pool: PgPool) {
    ItemRepo::replace_all(&pool, &sample_items()).await.unwrap();
    let inserted = ItemRepo::replace_all(&pool, &[]).await.unwrap();

    assert_eq!(inserted, 0);
    assert!(ItemRepo::list_all(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_insert_rolls_back(pool: PgPool) {
    let before = sample_items();
    ItemRepo::replace_all(&pool, &before).await.unwrap();

    // Duplicate primary key makes the bulk insert fail after the delete ran.
    let bad = vec![
        new_item("dup", Category::Note, 5),
        new_item("dup", Category::Note, 6),
    ];
    let result = ItemRepo::replace_all(&pool, &bad).await;
    assert!(result.is_err(), "duplicate ids must fail the sync");

    let after = ItemRepo::list_all(&pool).await.unwrap();
    assert_eq!(after.len(), 3, "previous state must be preserved");
    assert!(after.iter().all(|i| i.id != "dup"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_title_violates_check_and_rolls_back(pool: PgPool) {
    ItemRepo::replace_all(&pool, &sample_items()).await.unwrap();

    let mut blank = new_item("blank", Category::Prompt, 1);
    blank.title = String::new();
    let result = ItemRepo::replace_all(&pool, &[new_item("ok", Category::Prompt, 2), blank]).await;
    assert!(result.is_err());

    assert_eq!(ItemRepo::count(&pool).await.unwrap(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_ids(pool: PgPool) {
    ItemRepo::replace_all(&pool, &sample_items()).await.unwrap();

    let found = ItemRepo::find_by_ids(&pool, &["reg".to_string(), "code".to_string(), "nope".to_string()])
        .await
        .unwrap();
    let ids: Vec<&str> = found.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["code", "reg"]);

    assert!(ItemRepo::find_by_ids(&pool, &[]).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_check(pool: PgPool) {
    devsnippet_db::health_check(&pool).await.unwrap();
}
