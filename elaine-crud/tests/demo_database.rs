//! Integration tests for the demo database lifecycle

use elaine_crud::config::DemoSettings;
use elaine_crud::demo::{DemoDatabase, DemoProcess, DemoTasks, MIGRATOR, RESOURCES};
use elaine_crud::error::ElaineError;
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    n
}

#[tokio::test]
async fn test_setup_creates_migrates_and_seeds() {
    let dir = TempDir::new().unwrap();
    let db = DemoDatabase::new(dir.path().join("db/development.sqlite3"));
    assert!(!db.exists());

    let report = db.setup().await.unwrap();
    assert!(report.created);
    assert_eq!(report.migrations_applied, MIGRATOR.iter().count());
    assert!(db.exists());

    let pool = db.connect().await.unwrap();
    for resource in RESOURCES {
        assert!(count(&pool, resource.table).await > 0, "{} is empty", resource.table);
    }
    assert!(count(&pool, "book_tags").await > 0);
    pool.close().await;
}

#[tokio::test]
async fn test_setup_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let db = DemoDatabase::new(dir.path().join("demo.sqlite3"));

    db.setup().await.unwrap();
    let pool = db.connect().await.unwrap();
    let books = count(&pool, "books").await;
    pool.close().await;

    let again = db.setup().await.unwrap();
    assert!(!again.created);
    assert_eq!(again.migrations_applied, 0);

    let pool = db.connect().await.unwrap();
    assert_eq!(count(&pool, "books").await, books);
    pool.close().await;
}

#[tokio::test]
async fn test_unique_isbn_and_rfid() {
    let dir = TempDir::new().unwrap();
    let db = DemoDatabase::new(dir.path().join("demo.sqlite3"));
    db.setup().await.unwrap();
    let pool = db.connect().await.unwrap();

    let duplicate_isbn = sqlx::query(
        "INSERT INTO books (title, isbn, author_id, library_id) VALUES ('Copycat', '978-0547773742', 1, 1)",
    )
    .execute(&pool)
    .await;
    assert!(duplicate_isbn.is_err());

    let duplicate_rfid = sqlx::query(
        "INSERT INTO book_copies (rfid, book_id, library_id) VALUES ('RFID-0001', 1, 1)",
    )
    .execute(&pool)
    .await;
    assert!(duplicate_rfid.is_err());

    pool.close().await;
}

#[tokio::test]
async fn test_foreign_keys_are_enforced() {
    let dir = TempDir::new().unwrap();
    let db = DemoDatabase::new(dir.path().join("demo.sqlite3"));
    db.setup().await.unwrap();
    let pool = db.connect().await.unwrap();

    let orphan = sqlx::query(
        "INSERT INTO loans (loaned_on, due_on, member_id, book_copy_id) VALUES ('2024-01-01', '2024-01-15', 999, 1)",
    )
    .execute(&pool)
    .await;
    assert!(orphan.is_err());

    pool.close().await;
}

#[tokio::test]
async fn test_resource_foreign_keys_match_schema() {
    let dir = TempDir::new().unwrap();
    let db = DemoDatabase::new(dir.path().join("demo.sqlite3"));
    db.setup().await.unwrap();
    let pool = db.connect().await.unwrap();

    for resource in RESOURCES {
        let rows: Vec<(String,)> = sqlx::query_as(&format!(
            "SELECT \"from\" FROM pragma_foreign_key_list('{}')",
            resource.table
        ))
        .fetch_all(&pool)
        .await
        .unwrap();
        let mut columns: Vec<String> = rows.into_iter().map(|(c,)| c).collect();
        columns.sort();

        let mut expected: Vec<String> = resource
            .foreign_keys
            .iter()
            .map(ToString::to_string)
            .collect();
        expected.sort();

        assert_eq!(columns, expected, "foreign keys of {}", resource.table);
    }

    pool.close().await;
}

#[tokio::test]
async fn test_reset_rebuilds_from_scratch() {
    let dir = TempDir::new().unwrap();
    let db = DemoDatabase::new(dir.path().join("demo.sqlite3"));
    db.setup().await.unwrap();

    let pool = db.connect().await.unwrap();
    sqlx::query("INSERT INTO tags (name) VALUES ('scratch')")
        .execute(&pool)
        .await
        .unwrap();
    let with_scratch = count(&pool, "tags").await;
    pool.close().await;

    let report = db.reset().await.unwrap();
    assert!(report.created);

    let pool = db.connect().await.unwrap();
    assert_eq!(count(&pool, "tags").await, with_scratch - 1);
    pool.close().await;
}

#[test]
fn test_drop_missing_database_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let db = DemoDatabase::new(dir.path().join("never-created.sqlite3"));
    assert!(!db.drop_database().unwrap());
}

#[test]
fn test_in_memory_url_is_rejected() {
    let settings = DemoSettings {
        database_url: "sqlite::memory:".to_string(),
        ..DemoSettings::default()
    };
    let err = DemoTasks::new("/engine", &settings).database().unwrap_err();
    assert!(matches!(err, ElaineError::Config(_)));
}

#[cfg(unix)]
#[test]
fn test_dbconsole_paths_survive_relative_root() {
    let dir = TempDir::new_in(".").unwrap();
    let cwd = std::env::current_dir().unwrap();
    let root = dir.path().strip_prefix(&cwd).unwrap();
    assert!(root.is_relative());

    let database = dir.path().join("spec/dummy/db/development.sqlite3");
    std::fs::create_dir_all(database.parent().unwrap()).unwrap();
    std::fs::write(&database, "").unwrap();

    // Runs from the app directory, so both paths must be absolute
    let settings = DemoSettings {
        dbconsole_command: ["test", "-f", "{database_path}"].map(String::from).to_vec(),
        ..DemoSettings::default()
    };
    let tasks = DemoTasks::new(root, &settings);
    tasks.run(DemoProcess::DbConsole).unwrap();

    let settings = DemoSettings {
        dbconsole_command: ["test", "-d", "{app_dir}"].map(String::from).to_vec(),
        ..DemoSettings::default()
    };
    DemoTasks::new(root, &settings)
        .run(DemoProcess::DbConsole)
        .unwrap();
}
