//! Metadata CSV: one row per (table, column) with the eleven-field header.

use std::io::Read;
use std::path::PathBuf;

use super::{SchemaSource, SourceError};
use crate::schema::{Normalizer, SchemaTable};

pub struct MetadataCsvSource {
    path: PathBuf,
}

impl MetadataCsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SchemaSource for MetadataCsvSource {
    fn load(&self) -> Result<SchemaTable, SourceError> {
        tracing::info!(path = %self.path.display(), "reading metadata CSV");
        let file = std::fs::File::open(&self.path).map_err(|source| SourceError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        read_metadata(file)
    }
}

/// Parse metadata CSV from any reader.
pub fn read_metadata<R: Read>(reader: R) -> Result<SchemaTable, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut normalizer = Normalizer::new(&headers)?;
    if !normalizer.has_field(crate::schema::Field::ColumnOrder) {
        tracing::debug!("no Column_Order header, using encounter order");
    }

    for result in reader.records() {
        let record = result?;
        let fields: Vec<&str> = record.iter().collect();
        normalizer.push(&fields);
    }

    let table = normalizer.finish();
    tracing::debug!(rows = table.len(), "parsed metadata rows");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaError;
    use std::io::Write;

    const SAMPLE: &str = "\
Catalog,Database,Table,Owner,Creation_Date,Column,Type,Column_Order,Source_Table,Is_Primary_Key,Is_Foreign_Key
cat,db,users,,,email,VARCHAR,2,,0,0
cat,db,users,,,id,INT,1,,1,0
cat,db,orders,,,user_id,INT,2,,,1
";

    #[test]
    fn test_read_full_contract() {
        let table = read_metadata(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        let id = &table.rows[1];
        assert_eq!(id.column, "id");
        assert_eq!(id.column_order, 1);
        assert!(id.is_primary_key);
        assert!(table.rows[2].is_foreign_key);
        assert!(!table.rows[2].is_primary_key);
    }

    #[test]
    fn test_missing_table_header() {
        let err = read_metadata("Catalog,Column\nc,id\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            SourceError::Schema(SchemaError::MissingField("Table"))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let table = MetadataCsvSource::new(file.path()).load().unwrap();
        assert_eq!(table.table_keys().len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = MetadataCsvSource::new("/nonexistent/metadata.csv")
            .load()
            .unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
