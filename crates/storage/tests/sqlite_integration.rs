use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_roundtrips_values() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("stats.games_count").await.unwrap(), None);

    repo.set("stats.games_count", "3").await.unwrap();
    repo.set("stats.games_count", "4").await.unwrap();
    assert_eq!(
        repo.get("stats.games_count").await.unwrap().as_deref(),
        Some("4")
    );
}

#[tokio::test]
async fn sqlite_set_many_writes_batch() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_batch?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.set_many(&[
        ("stats.correct_answers_total", "7".to_string()),
        ("stats.questions_total", "10".to_string()),
        ("stats.games_count", "1".to_string()),
    ])
    .await
    .unwrap();

    assert_eq!(
        repo.get("stats.correct_answers_total").await.unwrap().as_deref(),
        Some("7")
    );
    assert_eq!(
        repo.get("stats.questions_total").await.unwrap().as_deref(),
        Some("10")
    );
    assert_eq!(repo.get("stats.games_count").await.unwrap().as_deref(), Some("1"));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.set("k", "v").await.unwrap();
    repo.migrate().await.expect("second migrate");
    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn storage_sqlite_wires_key_values() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.key_values.set("hello", "world").await.unwrap();
    assert_eq!(
        storage.key_values.get("hello").await.unwrap().as_deref(),
        Some("world")
    );
}
