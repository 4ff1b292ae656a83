//! CSV to managed table loading
//!
//! Each mapping is an independent read, clean, overwrite pipeline. One failing
//! file never rolls back or blocks the others.

pub mod catalog;
pub mod source;
pub mod table;

pub use catalog::{Catalog, SqliteCatalog};
pub use source::read_csv;
pub use table::{Table, clean_column_name, clean_column_names};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A source file (relative to the file store root) and the table it becomes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMapping {
    pub source: PathBuf,
    pub table: String,
}

impl TableMapping {
    pub fn new(source: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            table: table.into(),
        }
    }
}

pub fn default_table_mappings() -> Vec<TableMapping> {
    vec![
        TableMapping::new("Files/csv/clientes_totales.csv", "dimClientes"),
        TableMapping::new("Files/csv/detalle_pedido.csv", "fact_detalle_pedido"),
        TableMapping::new("Files/csv/facturas.csv", "fact_facturas"),
        TableMapping::new("Files/csv/territorios_venta.csv", "dimTerritorios"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub table: String,
    pub rows: usize,
    pub columns: Vec<String>,
}

/// Outcome of one pipeline
#[derive(Debug)]
pub struct LoadOutcome {
    pub mapping: TableMapping,
    pub result: Result<LoadReport>,
}

/// Read one CSV, clean its header and overwrite the mapped table
pub async fn load_table<C: Catalog + ?Sized>(
    catalog: &C,
    root: &Path,
    mapping: &TableMapping,
) -> Result<LoadReport> {
    let path = root.join(&mapping.source);
    log::info!("Loading {} into {}", path.display(), mapping.table);

    let table = clean_column_names(read_csv(&path)?)?;
    let source = mapping.source.to_string_lossy();
    catalog
        .save_as_table(&mapping.table, &table, &source)
        .await?;

    Ok(LoadReport {
        table: mapping.table.clone(),
        rows: table.row_count(),
        columns: table.columns,
    })
}

/// Run every pipeline in order, collecting each outcome
pub async fn load_all<C: Catalog + ?Sized>(
    catalog: &C,
    root: &Path,
    mappings: &[TableMapping],
) -> Vec<LoadOutcome> {
    let mut outcomes = Vec::with_capacity(mappings.len());

    for mapping in mappings {
        let result = load_table(catalog, root, mapping).await;
        if let Err(e) = &result {
            log::error!("Loading {} failed: {:#}", mapping.table, e);
        }
        outcomes.push(LoadOutcome {
            mapping: mapping.clone(),
            result,
        });
    }

    outcomes
}
