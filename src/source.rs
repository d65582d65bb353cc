//! Schema acquisition. Each source produces a normalized [`SchemaTable`].

#[cfg(feature = "postgres")]
pub mod catalog;
pub mod csv_data;
pub mod metadata_csv;

use crate::schema::{SchemaError, SchemaTable};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid metadata: {0}")]
    Schema(#[from] SchemaError),
    #[error("{0} is empty")]
    Empty(String),
    #[error("Missing credential: {0}")]
    Credentials(&'static str),
    #[cfg(feature = "postgres")]
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),
}

/// Anything that can produce a schema table.
pub trait SchemaSource {
    fn load(&self) -> Result<SchemaTable, SourceError>;
}

#[cfg(feature = "postgres")]
pub use catalog::{CatalogConfig, CatalogSource};
pub use csv_data::CsvDataSource;
pub use metadata_csv::MetadataCsvSource;
