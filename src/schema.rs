//! Normalized column metadata: the contract every schema source hands to the
//! layout engine.

use std::collections::HashMap;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SchemaError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Row {row}: empty {field}")]
    EmptyField { row: usize, field: &'static str },
    #[error("Row {row}: column order must be positive, got {order}")]
    InvalidColumnOrder { row: usize, order: i64 },
}

/// The eleven named fields of the metadata contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Catalog,
    Database,
    Table,
    Owner,
    CreationDate,
    Column,
    Type,
    ColumnOrder,
    SourceTable,
    IsPrimaryKey,
    IsForeignKey,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Catalog,
        Field::Database,
        Field::Table,
        Field::Owner,
        Field::CreationDate,
        Field::Column,
        Field::Type,
        Field::ColumnOrder,
        Field::SourceTable,
        Field::IsPrimaryKey,
        Field::IsForeignKey,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Catalog => "Catalog",
            Field::Database => "Database",
            Field::Table => "Table",
            Field::Owner => "Owner",
            Field::CreationDate => "Creation_Date",
            Field::Column => "Column",
            Field::Type => "Type",
            Field::ColumnOrder => "Column_Order",
            Field::SourceTable => "Source_Table",
            Field::IsPrimaryKey => "Is_Primary_Key",
            Field::IsForeignKey => "Is_Foreign_Key",
        }
    }

    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        Self::ALL.into_iter().find(|f| f.name() == header)
    }

    pub fn is_required(self) -> bool {
        matches!(self, Field::Table | Field::Column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnMetadataRow {
    pub catalog: String,
    pub database: String,
    pub table: String,
    pub owner: String,
    pub creation_date: String,
    pub column: String,
    pub typ: String,
    pub column_order: i64,
    pub source_table: String,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
}

impl ColumnMetadataRow {
    pub fn table_key(&self) -> TableKey<'_> {
        TableKey {
            catalog: &self.catalog,
            database: &self.database,
            table: &self.table,
        }
    }
}

/// Identity of a table: the (Catalog, Database, Table) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableKey<'a> {
    pub catalog: &'a str,
    pub database: &'a str,
    pub table: &'a str,
}

impl TableKey<'_> {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}.{}", self.catalog, self.database, self.table)
    }
}

/// Ordered sequence of column metadata rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaTable {
    pub rows: Vec<ColumnMetadataRow>,
}

impl SchemaTable {
    pub fn new(rows: Vec<ColumnMetadataRow>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Distinct table triples in first-encountered order.
    pub fn table_keys(&self) -> Vec<TableKey<'_>> {
        let mut seen = std::collections::HashSet::new();
        self.rows
            .iter()
            .map(ColumnMetadataRow::table_key)
            .filter(|key| seen.insert(*key))
            .collect()
    }

    /// Check the structure the layout engine relies on.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for (i, row) in self.rows.iter().enumerate() {
            let row_no = i + 1;
            if row.table.is_empty() {
                return Err(SchemaError::EmptyField {
                    row: row_no,
                    field: Field::Table.name(),
                });
            }
            if row.column.is_empty() {
                return Err(SchemaError::EmptyField {
                    row: row_no,
                    field: Field::Column.name(),
                });
            }
            if row.column_order < 1 {
                return Err(SchemaError::InvalidColumnOrder {
                    row: row_no,
                    order: row.column_order,
                });
            }
        }
        Ok(())
    }
}

/// Turns raw string records into typed rows, applying the defaulting and
/// coercion rules once, before the engine runs.
pub struct Normalizer {
    index: HashMap<Field, usize>,
    rows: Vec<ColumnMetadataRow>,
    seen_per_table: HashMap<(String, String, String), i64>,
}

impl Normalizer {
    pub fn new<S: AsRef<str>>(headers: &[S]) -> Result<Self, SchemaError> {
        let mut index = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            if let Some(field) = Field::from_header(header.as_ref()) {
                index.entry(field).or_insert(i);
            }
        }

        if let Some(missing) = Field::ALL
            .into_iter()
            .find(|f| f.is_required() && !index.contains_key(f))
        {
            return Err(SchemaError::MissingField(missing.name()));
        }

        Ok(Self {
            index,
            rows: Vec::new(),
            seen_per_table: HashMap::new(),
        })
    }

    pub fn has_field(&self, field: Field) -> bool {
        self.index.contains_key(&field)
    }

    pub fn push<S: AsRef<str>>(&mut self, record: &[S]) {
        let text = |field: Field| -> String {
            self.index
                .get(&field)
                .and_then(|&i| record.get(i))
                .map(|s| s.as_ref().to_string())
                .unwrap_or_default()
        };

        let catalog = text(Field::Catalog);
        let database = text(Field::Database);
        let table = text(Field::Table);

        let position = self
            .seen_per_table
            .entry((catalog.clone(), database.clone(), table.clone()))
            .or_insert(0);
        *position += 1;

        let column_order = coerce_int(&text(Field::ColumnOrder))
            .filter(|n| *n > 0)
            .unwrap_or(*position);

        let row = ColumnMetadataRow {
            owner: text(Field::Owner),
            creation_date: text(Field::CreationDate),
            column: text(Field::Column),
            typ: text(Field::Type),
            column_order,
            source_table: text(Field::SourceTable),
            is_primary_key: coerce_flag(&text(Field::IsPrimaryKey)),
            is_foreign_key: coerce_flag(&text(Field::IsForeignKey)),
            catalog,
            database,
            table,
        };
        self.rows.push(row);
    }

    pub fn finish(self) -> SchemaTable {
        SchemaTable::new(self.rows)
    }
}

/// Numeric text truncated to an integer; `None` when not numeric.
pub fn coerce_int(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
}

/// A flag is set only when its integer value is exactly 1.
pub fn coerce_flag(value: &str) -> bool {
    coerce_int(value) == Some(1)
}
