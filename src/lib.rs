pub mod config;
pub mod drawio;
pub mod filter;
pub mod ir;
pub mod layout;
pub mod measure;
pub mod schema;
pub mod source;

use wasm_bindgen::prelude::*;

use config::{LayoutConfig, LayoutStrategy};
use drawio::{DrawioRenderer, RenderError};
use ir::DiagramIR;
use layout::LayoutEngine;
use schema::{SchemaError, SchemaTable};

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Input contract violation: {0}")]
    Input(#[from] SchemaError),
    #[error("Serialization failure: {0}")]
    Render(#[from] RenderError),
}

/// Lay out every table in `table` and serialize the result as a draw.io
/// document. Nothing is returned unless the whole document was built.
pub fn generate(table: &SchemaTable, config: &LayoutConfig) -> Result<String, GenerateError> {
    table.validate()?;

    let ir = DiagramIR::from_schema(table);
    tracing::info!(
        tables = ir.tables.len(),
        strategy = config.strategy.as_str(),
        "generating diagram"
    );

    let layout = LayoutEngine::new(config.clone()).layout(&ir);
    Ok(DrawioRenderer.render(&layout)?)
}

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Render metadata CSV text to a draw.io document
#[wasm_bindgen(js_name = "metadataCsvToDrawio")]
pub fn render_metadata_csv(csv: &str, layout: Option<String>) -> Result<String, String> {
    let strategy = match layout.as_deref() {
        Some(name) => {
            LayoutStrategy::from_str(name).ok_or_else(|| format!("Unknown layout: {name}"))?
        }
        None => LayoutStrategy::default(),
    };

    let table = source::metadata_csv::read_metadata(csv.as_bytes()).map_err(|e| e.to_string())?;
    generate(&table, &LayoutConfig::for_strategy(strategy)).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::ColumnMetadataRow;

    fn column(table: &str, name: &str, typ: &str, order: i64, pk: bool, fk: bool) -> ColumnMetadataRow {
        ColumnMetadataRow {
            catalog: "cat".to_string(),
            database: "db".to_string(),
            table: table.to_string(),
            column: name.to_string(),
            typ: typ.to_string(),
            column_order: order,
            is_primary_key: pk,
            is_foreign_key: fk,
            ..Default::default()
        }
    }

    fn users() -> SchemaTable {
        SchemaTable::new(vec![
            column("users", "email", "VARCHAR", 2, false, false),
            column("users", "id", "INT", 1, true, false),
        ])
    }

    fn mx_cells(xml: &str) -> Vec<&str> {
        xml.lines()
            .map(str::trim_start)
            .filter(|l| l.starts_with("<mxCell "))
            .collect()
    }

    fn attr<'a>(element: &'a str, name: &str) -> Option<&'a str> {
        let key = format!(r#" {name}=""#);
        let start = element.find(&key)? + key.len();
        let len = element[start..].find('"')?;
        Some(&element[start..start + len])
    }

    #[test]
    fn test_generate_is_deterministic() {
        for config in [LayoutConfig::flat(), LayoutConfig::structured()] {
            let first = generate(&users(), &config).unwrap();
            let second = generate(&users(), &config).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_ids_unique_and_anchors_first() {
        let mut schema = users();
        schema.rows.push(column("orders", "id", "INT", 1, true, false));
        for config in [LayoutConfig::flat(), LayoutConfig::structured()] {
            let xml = generate(&schema, &config).unwrap();
            let ids: Vec<&str> = mx_cells(&xml)
                .iter()
                .map(|c| attr(c, "id").unwrap())
                .collect();
            assert_eq!(&ids[..2], &["0", "1"]);
            let unique: std::collections::HashSet<&&str> = ids.iter().collect();
            assert_eq!(unique.len(), ids.len());

            let cells = mx_cells(&xml);
            assert_eq!(attr(cells[0], "parent"), None);
            assert_eq!(attr(cells[1], "parent"), Some("0"));
        }
    }

    #[test]
    fn test_flat_users_scenario() {
        let xml = generate(&users(), &LayoutConfig::flat()).unwrap();
        let cells = mx_cells(&xml);
        let tables: Vec<&&str> = cells.iter().filter(|c| attr(c, "parent") == Some("1")).collect();
        assert_eq!(tables.len(), 1);
        assert_eq!(attr(tables[0], "value"), Some("cat.db.users"));

        let table_id = attr(tables[0], "id").unwrap();
        let columns: Vec<&&str> = cells
            .iter()
            .filter(|c| attr(c, "parent") == Some(table_id))
            .collect();
        assert_eq!(columns.len(), 2);
        assert_eq!(attr(columns[0], "value"), Some("id : INT"));
        assert!(attr(columns[0], "style").unwrap().contains("fontStyle=1;"));
        assert_eq!(attr(columns[1], "value"), Some("email : VARCHAR"));
        assert!(!attr(columns[1], "style").unwrap().contains("fontStyle"));
    }

    #[test]
    fn test_structured_row_count_matches_columns() {
        let mut schema = users();
        schema.rows.push(column("orders", "id", "INT", 1, true, false));
        let xml = generate(&schema, &LayoutConfig::structured()).unwrap();
        let cells = mx_cells(&xml);

        let tables: Vec<&str> = cells
            .iter()
            .filter(|c| attr(c, "parent") == Some("1"))
            .map(|c| attr(c, "id").unwrap())
            .collect();
        let rows_under = |id: &str| cells.iter().filter(|c| attr(c, "parent") == Some(id)).count();
        assert_eq!(rows_under(tables[0]), 2);
        assert_eq!(rows_under(tables[1]), 1);
    }

    #[test]
    fn test_generate_rejects_contract_violation() {
        let mut schema = users();
        schema.rows[0].column_order = 0;
        assert!(matches!(
            generate(&schema, &LayoutConfig::default()),
            Err(GenerateError::Input(SchemaError::InvalidColumnOrder { row: 1, order: 0 }))
        ));
    }

    #[test]
    fn test_single_column_table_renders_box() {
        let schema = SchemaTable::new(vec![column("t", "only", "", 1, false, false)]);
        let xml = generate(&schema, &LayoutConfig::flat()).unwrap();
        assert!(xml.contains(r#"value="only : ""#));
        assert!(xml.contains(r#"width="180" height="56""#));
    }

    #[test]
    fn test_render_metadata_csv_export() {
        let csv = "Catalog,Database,Table,Column,Type,Column_Order,Is_Primary_Key,Is_Foreign_Key\n\
                   c,d,t,id,INT,1,1,0\n";
        let xml = render_metadata_csv(csv, Some("flat".to_string())).unwrap();
        assert!(xml.contains("c.d.t"));
        assert!(render_metadata_csv(csv, Some("radial".to_string())).is_err());
    }
}
