use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use tokio::fs;

pub const MIGRATIONS_DIR: &str = "migrations";

/// Create a SeaORM connection. Statement logging is left to `RUST_LOG`.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url);
    options.sqlx_logging(false);
    let conn = Database::connect(options)
        .await
        .context("failed to connect to the database")?;
    Ok(conn)
}

/// Applies every `migrations/*.sql` file in filename order. Files are written to be re-runnable.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    let backend = conn.get_database_backend();
    for file in migration_files(Path::new(MIGRATIONS_DIR)).await? {
        tracing::info!(file = %file.display(), "applying migration");
        let sql = fs::read_to_string(&file)
            .await
            .with_context(|| format!("failed to read {}", file.display()))?;
        for statement in split_statements(&sql) {
            conn.execute(Statement::from_string(backend, statement))
                .await
                .with_context(|| format!("migration {} failed", file.display()))?;
        }
    }

    Ok(())
}

async fn migration_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("missing migrations directory {}", dir.display()))?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Postgres prepared statements hold a single command, so each file is split on `;`.
fn split_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .map(|stmt| format!("{stmt};"))
        .collect()
}
