//! In-memory tables read from CSV

use anyhow::Result;

/// Header plus string rows. Every value is kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Same rows under a new header of the same width
    pub fn with_columns(self, columns: Vec<String>) -> Result<Self> {
        if columns.len() != self.columns.len() {
            anyhow::bail!(
                "Cannot rename {} columns to {} names",
                self.columns.len(),
                columns.len()
            );
        }
        Ok(Self {
            columns,
            rows: self.rows,
        })
    }
}

/// Trim a column name and replace interior spaces with underscores
pub fn clean_column_name(name: &str) -> String {
    name.trim().replace(' ', "_")
}

/// Rename every column with `clean_column_name`.
///
/// Names that collide after cleaning are left as they are.
pub fn clean_column_names(table: Table) -> Result<Table> {
    let columns = table.columns.iter().map(|c| clean_column_name(c)).collect();
    table.with_columns(columns)
}
