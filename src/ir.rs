use crate::schema::{ColumnMetadataRow, SchemaTable};

#[derive(Debug, Clone)]
pub struct DiagramIR {
    pub tables: Vec<TableIR>,
}

#[derive(Debug, Clone)]
pub struct TableIR {
    pub catalog: String,
    pub database: String,
    pub name: String,
    pub columns: Vec<ColumnIR>,
}

#[derive(Debug, Clone)]
pub struct ColumnIR {
    pub name: String,
    pub typ: String,
    pub is_pk: bool,
    pub is_fk: bool,
}

/// Key marker shown for a column. Primary key wins when both flags are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMarker {
    Primary,
    Foreign,
    None,
}

impl KeyMarker {
    pub fn label(self) -> &'static str {
        match self {
            KeyMarker::Primary => "PK",
            KeyMarker::Foreign => "FK",
            KeyMarker::None => "",
        }
    }
}

impl ColumnIR {
    pub fn marker(&self) -> KeyMarker {
        if self.is_pk {
            KeyMarker::Primary
        } else if self.is_fk {
            KeyMarker::Foreign
        } else {
            KeyMarker::None
        }
    }
}

impl TableIR {
    /// `Catalog.Database.Table`, unescaped.
    pub fn label(&self) -> String {
        format!("{}.{}.{}", self.catalog, self.database, self.name)
    }
}

impl DiagramIR {
    pub fn from_schema(schema: &SchemaTable) -> Self {
        let tables = schema
            .table_keys()
            .into_iter()
            .map(|key| {
                let mut rows: Vec<&ColumnMetadataRow> = schema
                    .rows
                    .iter()
                    .filter(|r| r.table_key() == key)
                    .collect();
                // stable: ties keep source order
                rows.sort_by_key(|r| r.column_order);

                TableIR {
                    catalog: key.catalog.to_string(),
                    database: key.database.to_string(),
                    name: key.table.to_string(),
                    columns: rows
                        .into_iter()
                        .map(|r| ColumnIR {
                            name: r.column.clone(),
                            typ: r.typ.clone(),
                            is_pk: r.is_primary_key,
                            is_fk: r.is_foreign_key,
                        })
                        .collect(),
                }
            })
            .collect();

        DiagramIR { tables }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(table: &str, column: &str, order: i64) -> ColumnMetadataRow {
        ColumnMetadataRow {
            catalog: "cat".to_string(),
            database: "db".to_string(),
            table: table.to_string(),
            column: column.to_string(),
            typ: "INT".to_string(),
            column_order: order,
            ..Default::default()
        }
    }

    #[test]
    fn test_ir_groups_by_triple() {
        let mut other_db = row("users", "id", 1);
        other_db.database = "other".to_string();
        let schema = SchemaTable::new(vec![row("users", "id", 1), other_db, row("users", "name", 2)]);
        let ir = DiagramIR::from_schema(&schema);

        assert_eq!(ir.tables.len(), 2);
        assert_eq!(ir.tables[0].label(), "cat.db.users");
        assert_eq!(ir.tables[0].columns.len(), 2);
        assert_eq!(ir.tables[1].label(), "cat.other.users");
    }

    #[test]
    fn test_ir_sorts_columns_stably() {
        let schema = SchemaTable::new(vec![
            row("t", "c", 3),
            row("t", "a", 1),
            row("t", "b1", 2),
            row("t", "b2", 2),
        ]);
        let ir = DiagramIR::from_schema(&schema);
        let names: Vec<&str> = ir.tables[0].columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b1", "b2", "c"]);
    }

    #[test]
    fn test_marker_precedence() {
        let mut col = ColumnIR {
            name: "id".to_string(),
            typ: String::new(),
            is_pk: true,
            is_fk: true,
        };
        assert_eq!(col.marker(), KeyMarker::Primary);
        col.is_pk = false;
        assert_eq!(col.marker(), KeyMarker::Foreign);
        col.is_fk = false;
        assert_eq!(col.marker().label(), "");
    }
}
