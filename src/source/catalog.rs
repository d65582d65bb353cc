//! Live PostgreSQL catalog read through `information_schema`.

use std::collections::HashMap;
use std::path::Path;

use tokio_postgres::{Client, NoTls};

use super::{SchemaSource, SourceError};
use crate::schema::{ColumnMetadataRow, SchemaTable};

const COLUMNS_QUERY: &str = "
SELECT
    c.table_catalog::text,
    c.table_schema::text,
    c.table_name::text,
    c.column_name::text,
    c.data_type::text,
    c.ordinal_position::int4,
    EXISTS (
        SELECT 1
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage kcu
            ON tc.constraint_schema = kcu.constraint_schema
            AND tc.constraint_name = kcu.constraint_name
            AND tc.table_schema = kcu.table_schema
            AND tc.table_name = kcu.table_name
        WHERE tc.constraint_type = 'PRIMARY KEY'
            AND kcu.table_schema = c.table_schema
            AND kcu.table_name = c.table_name
            AND kcu.column_name = c.column_name
    ) AS is_primary_key,
    EXISTS (
        SELECT 1
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage kcu
            ON tc.constraint_schema = kcu.constraint_schema
            AND tc.constraint_name = kcu.constraint_name
            AND tc.table_schema = kcu.table_schema
            AND tc.table_name = kcu.table_name
        WHERE tc.constraint_type = 'FOREIGN KEY'
            AND kcu.table_schema = c.table_schema
            AND kcu.table_name = c.table_name
            AND kcu.column_name = c.column_name
    ) AS is_foreign_key
FROM information_schema.columns c
JOIN information_schema.tables t
    ON t.table_schema = c.table_schema
    AND t.table_name = c.table_name
WHERE t.table_type = 'BASE TABLE'
    AND c.table_schema NOT IN ('pg_catalog', 'information_schema')
    AND c.table_schema NOT LIKE 'pg_toast%'
ORDER BY c.table_schema, c.table_name, c.ordinal_position";

/// Connection settings, normally taken from the standard `PG*` variables.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl CatalogConfig {
    /// Process environment first, then `.env` in the working directory.
    pub fn from_env() -> Result<Self, SourceError> {
        Self::from_env_file(Path::new(".env"))
    }

    pub fn from_env_file(path: &Path) -> Result<Self, SourceError> {
        let file = dotenv_vars(path);
        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| file.get(key).cloned()))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SourceError> {
        let user = lookup("PGUSER").ok_or(SourceError::Credentials("PGUSER"))?;
        let password = lookup("PGPASSWORD").ok_or(SourceError::Credentials("PGPASSWORD"))?;
        let port = lookup("PGPORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(5432);

        Ok(Self {
            host: lookup("PGHOST").unwrap_or_else(|| "localhost".to_string()),
            port,
            database: lookup("PGDATABASE").unwrap_or_else(|| "postgres".to_string()),
            user,
            password,
        })
    }

    fn connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            self.host, self.port, self.database, self.user, self.password
        )
    }
}

/// Variables declared in a dotenv file. A missing file declares none.
fn dotenv_vars(path: &Path) -> HashMap<String, String> {
    match dotenvy::from_path_iter(path) {
        Ok(iter) => iter.filter_map(Result::ok).collect(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no dotenv file");
            HashMap::new()
        }
    }
}

/// One catalog row as returned by the columns query.
#[derive(Debug, Clone)]
pub struct CatalogColumn {
    pub catalog: String,
    pub schema: String,
    pub table: String,
    pub column: String,
    pub data_type: String,
    pub ordinal_position: i32,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
}

impl From<CatalogColumn> for ColumnMetadataRow {
    fn from(c: CatalogColumn) -> Self {
        ColumnMetadataRow {
            catalog: c.catalog,
            database: c.schema,
            table: c.table,
            column: c.column,
            typ: c.data_type,
            column_order: i64::from(c.ordinal_position),
            is_primary_key: c.is_primary_key,
            is_foreign_key: c.is_foreign_key,
            ..Default::default()
        }
    }
}

pub struct CatalogSource {
    config: CatalogConfig,
}

impl CatalogSource {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }

    async fn fetch(&self) -> Result<Vec<CatalogColumn>, SourceError> {
        let (client, connection) =
            tokio_postgres::connect(&self.config.connection_string(), NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "catalog connection error");
            }
        });

        query_columns(&client).await
    }
}

async fn query_columns(client: &Client) -> Result<Vec<CatalogColumn>, SourceError> {
    let rows = client.query(COLUMNS_QUERY, &[]).await?;

    Ok(rows
        .iter()
        .map(|row| CatalogColumn {
            catalog: row.get(0),
            schema: row.get(1),
            table: row.get(2),
            column: row.get(3),
            data_type: row.get(4),
            ordinal_position: row.get(5),
            is_primary_key: row.get(6),
            is_foreign_key: row.get(7),
        })
        .collect())
}

pub fn to_schema_table(columns: Vec<CatalogColumn>) -> SchemaTable {
    SchemaTable::new(columns.into_iter().map(ColumnMetadataRow::from).collect())
}

impl SchemaSource for CatalogSource {
    fn load(&self) -> Result<SchemaTable, SourceError> {
        tracing::info!(
            host = %self.config.host,
            port = self.config.port,
            database = %self.config.database,
            "reading database catalog"
        );
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| SourceError::Io {
                path: "tokio runtime".to_string(),
                source,
            })?;

        let columns = runtime.block_on(self.fetch())?;
        tracing::debug!(columns = columns.len(), "fetched catalog columns");
        Ok(to_schema_table(columns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config =
            CatalogConfig::from_lookup(lookup(&[("PGUSER", "app"), ("PGPASSWORD", "secret")]))
                .unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.database, "postgres");
    }

    #[test]
    fn test_config_requires_credentials() {
        let err = CatalogConfig::from_lookup(lookup(&[("PGUSER", "app")])).unwrap_err();
        assert!(matches!(err, SourceError::Credentials("PGPASSWORD")));
    }

    #[test]
    fn test_dotenv_file_supplies_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "PGUSER=app\nPGPASSWORD=\"s3cret\"\n# comment\nPGPORT=6543\n").unwrap();

        let vars = dotenv_vars(&path);
        assert_eq!(vars.get("PGPASSWORD").map(String::as_str), Some("s3cret"));

        let config = CatalogConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
        assert_eq!(config.user, "app");
        assert_eq!(config.port, 6543);
    }

    #[test]
    fn test_missing_dotenv_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(dotenv_vars(&dir.path().join(".env")).is_empty());
    }

    #[test]
    fn test_key_lookups_stay_within_one_table() {
        assert_eq!(
            COLUMNS_QUERY.matches("AND tc.table_name = kcu.table_name").count(),
            2
        );
    }

    #[test]
    fn test_catalog_rows_map_to_metadata() {
        let columns = vec![CatalogColumn {
            catalog: "shop".to_string(),
            schema: "public".to_string(),
            table: "orders".to_string(),
            column: "id".to_string(),
            data_type: "integer".to_string(),
            ordinal_position: 1,
            is_primary_key: true,
            is_foreign_key: false,
        }];
        let table = to_schema_table(columns);
        let row = &table.rows[0];
        assert_eq!(row.table_key().qualified_name(), "shop.public.orders");
        assert_eq!(row.typ, "integer");
        assert_eq!(row.column_order, 1);
        assert!(row.is_primary_key);
        assert_eq!(row.owner, "");
    }
}
