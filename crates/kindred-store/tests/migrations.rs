use kindred_store::migrate::latest_version;
use kindred_store::{Store, StoreErrorKind};
use tempfile::TempDir;

#[test]
fn migrations_apply_once() {
    let store = Store::open_in_memory().expect("open in memory");
    assert_eq!(store.schema_version().expect("version before"), 0);
    store.migrate().expect("migrate");
    store.migrate().expect("migrate again");

    let version: i64 = store
        .connection()
        .query_row("SELECT version FROM kindred_schema LIMIT 1;", [], |row| {
            row.get(0)
        })
        .expect("schema version");
    assert_eq!(version, latest_version());
    assert_eq!(store.schema_version().expect("version"), latest_version());
}

#[test]
fn refuses_databases_from_newer_builds() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
        .connection()
        .execute("UPDATE kindred_schema SET version = 99;", [])
        .expect("bump version");

    let err = store.migrate().unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Migration);
}

#[test]
fn on_disk_database_survives_reopen() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("kindred.sqlite3");
    {
        let store = Store::open(&path).expect("open");
        store.migrate().expect("migrate");
        store
            .users()
            .upsert(1_700_000_000, "ada@example.com", Some("Ada"))
            .expect("user");
    }

    let store = Store::open(&path).expect("reopen");
    store.migrate().expect("migrate");
    let user = store
        .users()
        .find_by_email("ADA@example.com")
        .expect("find")
        .expect("user present");
    assert_eq!(user.name.as_deref(), Some("Ada"));
}
