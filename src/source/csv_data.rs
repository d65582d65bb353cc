//! Raw CSV data: one file becomes one table, column types are inferred
//! from a sample of rows.

use std::io::Read;
use std::path::{Path, PathBuf};

use super::{SchemaSource, SourceError};
use crate::schema::{ColumnMetadataRow, SchemaTable};

pub const DEFAULT_SAMPLE_SIZE: usize = 10_000;

/// Cell values treated as missing during inference.
const MISSING: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferredType {
    Int,
    Decimal,
    Varchar,
}

impl InferredType {
    pub fn as_str(self) -> &'static str {
        match self {
            InferredType::Int => "INT",
            InferredType::Decimal => "DECIMAL",
            InferredType::Varchar => "VARCHAR",
        }
    }
}

pub struct CsvDataSource {
    path: PathBuf,
    sample_size: usize,
}

impl CsvDataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }
}

/// The table is named after the file, extension included.
fn table_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl SchemaSource for CsvDataSource {
    fn load(&self) -> Result<SchemaTable, SourceError> {
        tracing::info!(
            path = %self.path.display(),
            sample_size = self.sample_size,
            "inferring schema from CSV data"
        );
        let file = std::fs::File::open(&self.path).map_err(|source| SourceError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        infer_schema(file, &table_name(&self.path), self.sample_size)
    }
}

fn is_missing(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || MISSING.contains(&value)
}

fn is_integer(value: &str) -> bool {
    let digits = value.trim();
    let digits = digits.strip_prefix(['+', '-']).unwrap_or(digits);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_decimal(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok()
}

/// Blank headers (such as a leading index column) get a positional name.
fn column_name(index: usize, header: &str) -> String {
    if header.trim().is_empty() {
        format!("Unnamed: {index}")
    } else {
        header.to_string()
    }
}

/// Narrowest type that fits every non-missing value.
pub fn infer_type<'a>(values: impl IntoIterator<Item = &'a str>) -> InferredType {
    let mut seen = false;
    let mut all_int = true;
    let mut all_decimal = true;

    for value in values.into_iter().filter(|v| !is_missing(v)) {
        seen = true;
        if all_int && !is_integer(value) {
            all_int = false;
        }
        if all_decimal && !is_decimal(value) {
            all_decimal = false;
            break;
        }
    }

    match (seen, all_int, all_decimal) {
        (true, true, _) => InferredType::Int,
        (true, false, true) => InferredType::Decimal,
        _ => InferredType::Varchar,
    }
}

pub fn infer_schema<R: Read>(
    reader: R,
    table: &str,
    sample_size: usize,
) -> Result<SchemaTable, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, name)| column_name(i, name))
        .collect();
    if headers.is_empty() {
        return Err(SourceError::Empty(table.to_string()));
    }

    let mut samples: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in reader.records().take(sample_size) {
        let record = result?;
        for (i, column) in samples.iter_mut().enumerate() {
            if let Some(value) = record.get(i) {
                column.push(value.to_string());
            }
        }
    }

    let rows = headers
        .iter()
        .zip(&samples)
        .enumerate()
        .map(|(i, (name, values))| {
            let typ = infer_type(values.iter().map(String::as_str));
            tracing::debug!(column = %name, typ = typ.as_str(), "inferred column type");
            ColumnMetadataRow {
                table: table.to_string(),
                column: name.clone(),
                typ: typ.as_str().to_string(),
                column_order: i as i64 + 1,
                ..Default::default()
            }
        })
        .collect();

    Ok(SchemaTable::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_infer_int() {
        assert_eq!(infer_type(["1", "-2", "+30", ""]), InferredType::Int);
    }

    #[test]
    fn test_infer_decimal() {
        assert_eq!(infer_type(["1", "2.5", "NA"]), InferredType::Decimal);
        assert_eq!(infer_type(["1e3"]), InferredType::Decimal);
    }

    #[test]
    fn test_infer_varchar() {
        assert_eq!(infer_type(["1", "two"]), InferredType::Varchar);
        assert_eq!(infer_type(["", "NULL"]), InferredType::Varchar);
        assert_eq!(infer_type(Vec::<&str>::new()), InferredType::Varchar);
    }

    #[test]
    fn test_infer_schema_columns() {
        let data = "id,price,name\n1,9.99,widget\n2,10,gadget\n";
        let table = infer_schema(data.as_bytes(), "items.csv", DEFAULT_SAMPLE_SIZE).unwrap();

        let types: Vec<&str> = table.rows.iter().map(|r| r.typ.as_str()).collect();
        assert_eq!(types, vec!["INT", "DECIMAL", "VARCHAR"]);
        let orders: Vec<i64> = table.rows.iter().map(|r| r.column_order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert!(table.rows.iter().all(|r| r.table == "items.csv" && r.catalog.is_empty()));
        assert!(table.rows.iter().all(|r| !r.is_primary_key && !r.is_foreign_key));
    }

    #[test]
    fn test_infer_treats_none_as_missing() {
        assert_eq!(infer_type(["None", "3", "<NA>", "n/a"]), InferredType::Int);
        assert_eq!(infer_type(["-nan", "1.5", "#N/A N/A"]), InferredType::Decimal);
    }

    #[test]
    fn test_blank_header_gets_positional_name() {
        let data = ",id,name\n0,1,ann\n1,2,bob\n";
        let table = infer_schema(data.as_bytes(), "people.csv", DEFAULT_SAMPLE_SIZE).unwrap();

        let names: Vec<&str> = table.rows.iter().map(|r| r.column.as_str()).collect();
        assert_eq!(names, vec!["Unnamed: 0", "id", "name"]);
        assert_eq!(table.rows[0].typ, "INT");

        let xml = crate::generate(&table, &crate::config::LayoutConfig::flat()).unwrap();
        assert!(xml.contains(r#"value="Unnamed: 0 : INT""#));
    }

    #[test]
    fn test_sample_size_limits_rows() {
        let data = "code\n1\n2\nX\n";
        let table = infer_schema(data.as_bytes(), "codes.csv", 2).unwrap();
        assert_eq!(table.rows[0].typ, "INT");
    }

    #[test]
    fn test_load_uses_file_name_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "name,age").unwrap();
        writeln!(file, "ann,31").unwrap();

        let table = CsvDataSource::new(&path).load().unwrap();
        assert_eq!(table.rows[0].table, "people.csv");
        assert_eq!(table.rows[1].typ, "INT");
    }
}
