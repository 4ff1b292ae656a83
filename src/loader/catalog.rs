//! Catalog of managed tables backed by SQLite

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::path::Path;

use super::table::Table;

/// Destination for loaded tables
#[async_trait]
pub trait Catalog {
    /// Replace the named table, contents and schema, with `table`
    async fn save_as_table(&self, name: &str, table: &Table, source: &str) -> Result<()>;
}

const METADATA_TABLE: &str = "_catalog_tables";

pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    /// Open (or create) a catalog file
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create catalog directory: {}", parent.display())
                })?;
            }
        }

        let database_url = format!("sqlite://{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&database_url)
            .await
            .with_context(|| format!("Failed to open catalog: {}", path.display()))?;

        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&pool)
            .await
            .context("Failed to enable WAL mode")?;

        log::debug!("Opened catalog: {}", path.display());
        Self::with_pool(pool).await
    }

    /// In-memory catalog for tests. A single connection keeps every query on the same database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory catalog")?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                name TEXT PRIMARY KEY,
                source TEXT NOT NULL,
                row_count INTEGER NOT NULL,
                column_count INTEGER NOT NULL,
                loaded_at TEXT NOT NULL
            )
            "#,
            METADATA_TABLE
        ))
        .execute(&pool)
        .await
        .context("Failed to create catalog metadata table")?;

        Ok(Self { pool })
    }

    /// Names of the managed tables, sorted
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(&format!(
            "SELECT name FROM {} ORDER BY name",
            METADATA_TABLE
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list catalog tables")?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Column names of a table in declaration order
    pub async fn table_columns(&self, name: &str) -> Result<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM pragma_table_info(?) ORDER BY cid")
                .bind(name)
                .fetch_all(&self.pool)
                .await
                .with_context(|| format!("Failed to read schema of '{}'", name))?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Read a whole table back, rows in insertion order
    pub async fn read_table(&self, name: &str) -> Result<Table> {
        use sqlx::Row;

        let columns = self.table_columns(name).await?;
        if columns.is_empty() {
            anyhow::bail!("Table '{}' not found", name);
        }

        let rows = sqlx::query(&format!("SELECT * FROM {} ORDER BY rowid", quote_ident(name)))
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to read table '{}'", name))?;

        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            let mut record = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                let value: Option<String> = row.try_get(i)?;
                record.push(value.unwrap_or_default());
            }
            values.push(record);
        }

        Ok(Table::new(columns, values))
    }
}

#[async_trait]
impl Catalog for SqliteCatalog {
    async fn save_as_table(&self, name: &str, table: &Table, source: &str) -> Result<()> {
        if table.columns.is_empty() {
            anyhow::bail!("Cannot save table '{}' without columns", name);
        }

        let mut tx = self.pool.begin().await.context("Failed to start transaction")?;
        let ident = quote_ident(name);
        let column_list = table
            .columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");

        sqlx::query(&format!("DROP TABLE IF EXISTS {}", ident))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to drop table '{}'", name))?;
        create_table(&mut tx, name, table).await?;

        let placeholders = vec!["?"; table.columns.len()].join(", ");
        let insert = format!("INSERT INTO {} ({}) VALUES ({})", ident, column_list, placeholders);
        for row in &table.rows {
            let mut query = sqlx::query(&insert);
            for value in row {
                query = query.bind(value);
            }
            query
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to insert into '{}'", name))?;
        }

        sqlx::query(&format!(
            r#"
            INSERT OR REPLACE INTO {} (name, source, row_count, column_count, loaded_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
            METADATA_TABLE
        ))
        .bind(name)
        .bind(source)
        .bind(table.row_count() as i64)
        .bind(table.columns.len() as i64)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to record table '{}'", name))?;

        tx.commit().await.context("Failed to commit table write")?;

        log::info!(
            "Saved table '{}' ({} rows, {} columns)",
            name,
            table.row_count(),
            table.column_count()
        );
        Ok(())
    }
}

async fn create_table(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    name: &str,
    table: &Table,
) -> Result<()> {
    let columns = table
        .columns
        .iter()
        .map(|c| format!("{} TEXT", quote_ident(c)))
        .collect::<Vec<_>>()
        .join(", ");

    sqlx::query(&format!("CREATE TABLE {} ({})", quote_ident(name), columns))
        .execute(&mut **tx)
        .await
        .with_context(|| format!("Failed to create table '{}'", name))?;
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
