use std::path::Path;

use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

const CREATE_ITEMS_TABLE: &str = r#"
    CREATE TABLE items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        price REAL NOT NULL,
        create_date TEXT NOT NULL
    );
"#;

/// Открывает SQLite файл (создаёт при необходимости) и готовит схему.
///
/// Вызывается один раз при старте; соединение передаётся в состояние роутера.
pub async fn initialize_database(db_file: &Path) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Opening database: {}", absolute_path.display());
    let conn = connect(&db_url).await?;
    ensure_schema(&conn).await?;
    Ok(conn)
}

pub async fn connect(db_url: &str) -> anyhow::Result<DatabaseConnection> {
    Ok(Database::connect(db_url).await?)
}

/// Создаёт таблицу `items`, если её ещё нет
pub async fn ensure_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    let check_items_table = r#"
        SELECT name FROM sqlite_master
        WHERE type='table' AND name='items';
    "#;
    let existing = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            check_items_table.to_string(),
        ))
        .await?;

    if existing.is_empty() {
        tracing::info!("Creating items table");
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            CREATE_ITEMS_TABLE.to_string(),
        ))
        .await?;
    }

    Ok(())
}
