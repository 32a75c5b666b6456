use enlist_core::EmailAddress;
use enlist_store::error::StoreErrorKind;
use enlist_store::Store;
use tempfile::TempDir;

fn email(raw: &str) -> EmailAddress {
    EmailAddress::parse(raw).expect("valid email")
}

#[test]
fn insert_then_find_by_email() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    let now = 1_700_000_000;

    let created = store
        .participants()
        .insert(now, &email("Ada@Example.com"), Some("meetup"))
        .expect("insert")
        .expect("new participant");
    assert_eq!(created.email.as_str(), "ada@example.com");

    let found = store
        .participants()
        .find_by_email(&email("ada@example.com"))
        .expect("find")
        .expect("participant");
    assert_eq!(found, created);
    assert_eq!(found.source.as_deref(), Some("meetup"));
}

#[test]
fn insert_ignores_existing_email() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    let now = 1_700_000_000;

    let first = store
        .participants()
        .insert(now, &email("ada@example.com"), None)
        .expect("insert");
    assert!(first.is_some());

    let second = store
        .participants()
        .insert(now + 10, &email("ADA@example.com "), Some("other"))
        .expect("insert again");
    assert!(second.is_none());
    assert_eq!(store.participants().count().expect("count"), 1);
    assert!(store
        .participants()
        .exists_by_email(&email("ada@example.com"))
        .expect("exists"));
}

#[test]
fn list_orders_by_creation_then_email() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    store
        .participants()
        .insert(20, &email("zed@example.com"), None)
        .expect("insert");
    store
        .participants()
        .insert(10, &email("bob@example.com"), None)
        .expect("insert");
    store
        .participants()
        .insert(10, &email("amy@example.com"), None)
        .expect("insert");

    let emails: Vec<String> = store
        .participants()
        .list()
        .expect("list")
        .into_iter()
        .map(|participant| participant.email.to_string())
        .collect();
    assert_eq!(
        emails,
        vec!["amy@example.com", "bob@example.com", "zed@example.com"]
    );
}

#[test]
fn participants_persist_across_reopen() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("enlist.sqlite3");
    {
        let store = Store::open(&path).expect("open");
        store.migrate().expect("migrate");
        store
            .participants()
            .insert(1, &email("ada@example.com"), None)
            .expect("insert");
    }

    let store = Store::open(&path).expect("reopen");
    store.migrate().expect("migrate");
    assert_eq!(store.participants().count().expect("count"), 1);
}

#[test]
fn read_only_open_reports_unmigrated_schema_without_upgrading() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("enlist.sqlite3");
    Store::open(&path).expect("create");

    let store = Store::open_read_only(&path).expect("open read only");
    let err = store.ensure_migrated().unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Migration);
    assert_eq!(store.schema_version().expect("version"), 0);
}

#[test]
fn read_only_open_lists_but_cannot_insert() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("enlist.sqlite3");
    {
        let store = Store::open(&path).expect("open");
        store.migrate().expect("migrate");
        store
            .participants()
            .insert(1, &email("ada@example.com"), None)
            .expect("insert");
    }

    let store = Store::open_read_only(&path).expect("open read only");
    store.ensure_migrated().expect("current schema");
    assert_eq!(store.participants().list().expect("list").len(), 1);
    assert!(store
        .participants()
        .insert(2, &email("grace@example.com"), None)
        .is_err());
}

#[test]
fn read_only_open_requires_existing_file() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("missing.sqlite3");
    assert!(Store::open_read_only(&path).is_err());
    assert!(!path.exists());
}
