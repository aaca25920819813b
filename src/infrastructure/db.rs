use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Cascades on readers rely on SQLite enforcing foreign keys
    execute(&db, "PRAGMA foreign_keys = ON").await?;

    create_tables(&db).await?;

    Ok(db)
}

/// Drop every table and create them again empty.
pub async fn reset_db(db: &DatabaseConnection) -> Result<(), DbErr> {
    tracing::warn!("Resetting database: dropping readers, books and items");
    for table in ["items", "books", "readers"] {
        execute(db, &format!("DROP TABLE IF EXISTS {}", table)).await?;
    }
    create_tables(db).await
}

async fn execute(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        sql.to_owned(),
    ))
    .await?;
    Ok(())
}

async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Ids and reader_id keep SQLite's plain rowid integers; AUTOINCREMENT
    // cannot hand out scaled values.
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS readers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            create_dt TEXT NOT NULL,
            update_dt TEXT NOT NULL,
            name TEXT NOT NULL
        )
        "#,
    )
    .await?;

    // release_year holds a fixed-point value scaled by 10^4
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            create_dt TEXT NOT NULL,
            update_dt TEXT NOT NULL,
            reader_id INTEGER,
            name TEXT NOT NULL,
            author TEXT NOT NULL,
            release_year INTEGER NOT NULL,
            FOREIGN KEY (reader_id) REFERENCES readers(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            create_dt TEXT NOT NULL,
            update_dt TEXT NOT NULL,
            reader_id INTEGER,
            name TEXT NOT NULL,
            FOREIGN KEY (reader_id) REFERENCES readers(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    execute(
        db,
        "CREATE INDEX IF NOT EXISTS idx_books_reader_id ON books(reader_id)",
    )
    .await?;
    execute(
        db,
        "CREATE INDEX IF NOT EXISTS idx_items_reader_id ON items(reader_id)",
    )
    .await?;

    Ok(())
}
