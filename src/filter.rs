//! Glob-style name filters applied to a schema table before layout.

use crate::schema::{ColumnMetadataRow, SchemaTable};
use glob::{Pattern, PatternError};

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: PatternError,
    },
    #[error("No {subject} match the pattern '{pattern}'.")]
    NoMatch {
        subject: &'static str,
        pattern: String,
    },
}

/// Optional patterns; unset ones do not filter.
#[derive(Debug, Clone, Default)]
pub struct NameFilters {
    /// Matched against `Catalog.Database.Table`.
    pub qualified: Option<String>,
    pub database: Option<String>,
    pub table: Option<String>,
}

impl NameFilters {
    pub fn is_empty(&self) -> bool {
        self.qualified.is_none() && self.database.is_none() && self.table.is_none()
    }
}

fn qualified_name(row: &ColumnMetadataRow) -> String {
    row.table_key().qualified_name()
}

/// Keep rows whose `subject` matches `pattern`. Errors if nothing is left.
fn retain_matching(
    table: SchemaTable,
    pattern: &str,
    subject: &'static str,
    key: impl Fn(&ColumnMetadataRow) -> String,
) -> Result<SchemaTable, FilterError> {
    let compiled = Pattern::new(pattern).map_err(|source| FilterError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let before = table.len();
    let rows: Vec<ColumnMetadataRow> = table
        .rows
        .into_iter()
        .filter(|row| compiled.matches(&key(row)))
        .collect();

    tracing::info!(pattern, subject, kept = rows.len(), of = before, "applied name filter");

    if rows.is_empty() {
        return Err(FilterError::NoMatch {
            subject,
            pattern: pattern.to_string(),
        });
    }
    Ok(SchemaTable::new(rows))
}

pub fn apply_filters(table: SchemaTable, filters: &NameFilters) -> Result<SchemaTable, FilterError> {
    let mut table = table;
    if let Some(pattern) = &filters.database {
        table = retain_matching(table, pattern, "databases", |r| r.database.clone())?;
    }
    if let Some(pattern) = &filters.table {
        table = retain_matching(table, pattern, "tables", |r| r.table.clone())?;
    }
    if let Some(pattern) = &filters.qualified {
        table = retain_matching(table, pattern, "tables", qualified_name)?;
    }
    Ok(table)
}
