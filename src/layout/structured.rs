//! Structured strategy: a table shape whose rows hold a key indicator cell
//! and a column-name cell.

use crate::config::LayoutConfig;
use crate::drawio::escape_html;
use crate::ir::{ColumnIR, KeyMarker, TableIR};
use crate::measure::TextMetrics;

use super::engine::{CellSink, TableLayout};
use super::style::{FONT_BOLD, FONT_UNDERLINE, Style};
use super::types::{CellId, Geometry};

const HEADER_HEIGHT: f64 = 30.0;
const ROW_HEIGHT: f64 = 30.0;
const INDICATOR_WIDTH: f64 = 60.0;

pub struct StructuredLayout<'a> {
    config: &'a LayoutConfig,
    metrics: TextMetrics,
}

fn title_html(label: &str) -> String {
    format!(
        r#"<span style="text-wrap: nowrap;">{}</span>"#,
        escape_html(label)
    )
}

/// Shared by both cells of a row: borderless, unfilled, not connectable.
fn partial_rectangle() -> Style {
    Style::new()
        .set("shape", "partialRectangle")
        .set("connectable", 0)
        .set("fillColor", "none")
        .set("top", 0)
        .set("left", 0)
        .set("bottom", 0)
        .set("right", 0)
}

impl<'a> StructuredLayout<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self {
            config,
            metrics: TextMetrics::default(),
        }
    }

    fn table_style(&self) -> String {
        Style::new()
            .set("shape", "table")
            .set("startSize", HEADER_HEIGHT)
            .set("container", 1)
            .set("collapsible", 1)
            .set("childLayout", "tableLayout")
            .set("fixedRows", 1)
            .set("rowLines", 0)
            .set("fontStyle", FONT_BOLD)
            .set("align", "center")
            .set("resizeLast", 1)
            .set("html", 1)
            .set("whiteSpace", "wrap")
            .set("fontSize", self.config.title_font_size)
            .build()
    }

    fn row_style() -> String {
        Style::new()
            .set("shape", "tableRow")
            .set("horizontal", 0)
            .set("startSize", 0)
            .set("swimlaneHead", 0)
            .set("swimlaneBody", 0)
            .set("fillColor", "none")
            .set("collapsible", 0)
            .set("dropTarget", 0)
            .set("points", "[[0,0.5],[1,0.5]]")
            .set("portConstraint", "eastwest")
            .set("top", 0)
            .set("left", 0)
            .set("right", 0)
            .set("bottom", 0)
            .set("html", 1)
            .build()
    }

    fn indicator_style() -> String {
        partial_rectangle()
            .set("fontStyle", FONT_BOLD)
            .set("overflow", "hidden")
            .set("html", 1)
            .set("whiteSpace", "wrap")
            .build()
    }

    fn name_style(&self, marker: KeyMarker) -> String {
        partial_rectangle()
            .set("align", "left")
            .set("spacingLeft", 6)
            .set_if(marker == KeyMarker::Primary, "fontStyle", FONT_BOLD)
            .set_if(marker == KeyMarker::Foreign, "fontStyle", FONT_UNDERLINE)
            .set("overflow", "hidden")
            .set("html", 1)
            .set("whiteSpace", "wrap")
            .set("fontSize", self.config.column_font_size)
            .build()
    }

    fn emit_row(&self, sink: &mut CellSink, table_id: CellId, column: &ColumnIR, y: f64, width: f64) {
        let row_id = sink.vertex(
            table_id,
            String::new(),
            Self::row_style(),
            Geometry::sized(width, ROW_HEIGHT).with_y(y),
        );

        let marker = column.marker();
        sink.vertex(
            row_id,
            marker.label().to_string(),
            Self::indicator_style(),
            Geometry::sized(INDICATOR_WIDTH, ROW_HEIGHT).with_alternate_bounds(),
        );
        sink.vertex(
            row_id,
            escape_html(&column.name),
            self.name_style(marker),
            Geometry::sized(width - INDICATOR_WIDTH, ROW_HEIGHT)
                .with_x(INDICATOR_WIDTH)
                .with_alternate_bounds(),
        );
    }
}

impl TableLayout for StructuredLayout<'_> {
    fn box_size(&self, table: &TableIR) -> (f64, f64) {
        let height = HEADER_HEIGHT + table.columns.len() as f64 * ROW_HEIGHT;
        let mut width = self.config.table_width;

        if self.config.fit_to_content {
            let title = self
                .metrics
                .fit_width(&table.label(), self.config.title_font_size);
            let widest_name = table
                .columns
                .iter()
                .map(|c| {
                    INDICATOR_WIDTH + self.metrics.fit_width(&c.name, self.config.column_font_size)
                })
                .fold(0.0, f64::max);
            width = width.max(title).max(widest_name);
        }

        (width, height)
    }

    fn emit(&self, sink: &mut CellSink, table: &TableIR, geometry: Geometry) {
        let width = geometry.width;
        let table_id = sink.vertex(
            CellId::CANVAS,
            title_html(&table.label()),
            self.table_style(),
            geometry,
        );

        for (i, column) in table.columns.iter().enumerate() {
            let y = HEADER_HEIGHT + i as f64 * ROW_HEIGHT;
            self.emit_row(sink, table_id, column, y, width);
        }
    }
}
