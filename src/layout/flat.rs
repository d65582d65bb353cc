//! Flat strategy: a swimlane box with one stacked text cell per column.

use crate::config::LayoutConfig;
use crate::drawio::escape_html;
use crate::ir::{KeyMarker, TableIR};
use crate::measure::TextMetrics;

use super::engine::{CellSink, TableLayout};
use super::style::{FONT_BOLD, FONT_UNDERLINE, Style};
use super::types::{CellId, Geometry};

const HEADER_HEIGHT: f64 = 30.0;
const ROW_HEIGHT: f64 = 26.0;

pub struct FlatLayout<'a> {
    config: &'a LayoutConfig,
    metrics: TextMetrics,
}

impl<'a> FlatLayout<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self {
            config,
            metrics: TextMetrics::default(),
        }
    }

    fn table_style(&self) -> String {
        Style::new()
            .flag("swimlane")
            .set("fontStyle", FONT_BOLD)
            .set("childLayout", "stackLayout")
            .set("horizontal", 1)
            .set("startSize", HEADER_HEIGHT)
            .set("horizontalStack", 0)
            .set("resizeParent", 1)
            .set("resizeParentMax", 0)
            .set("resizeLast", 0)
            .set("collapsible", 0)
            .set("html", 1)
            .set("fontSize", self.config.title_font_size)
            .build()
    }

    fn column_style(&self, marker: KeyMarker) -> String {
        Style::new()
            .flag("text")
            .set("html", 1)
            .set("align", "left")
            .set("spacingLeft", 4)
            .set_if(marker == KeyMarker::Primary, "fontStyle", FONT_BOLD)
            .set_if(marker == KeyMarker::Foreign, "fontStyle", FONT_UNDERLINE)
            .set("fontSize", self.config.column_font_size)
            .build()
    }
}

fn column_label(name: &str, typ: &str) -> String {
    format!("{name} : {typ}")
}

impl TableLayout for FlatLayout<'_> {
    fn box_size(&self, table: &TableIR) -> (f64, f64) {
        let height = HEADER_HEIGHT + table.columns.len() as f64 * ROW_HEIGHT;
        let mut width = self.config.table_width;

        if self.config.fit_to_content {
            let title = self
                .metrics
                .fit_width(&table.label(), self.config.title_font_size);
            let widest_column = table
                .columns
                .iter()
                .map(|c| {
                    self.metrics
                        .fit_width(&column_label(&c.name, &c.typ), self.config.column_font_size)
                })
                .fold(0.0, f64::max);
            width = width.max(title).max(widest_column);
        }

        (width, height)
    }

    fn emit(&self, sink: &mut CellSink, table: &TableIR, geometry: Geometry) {
        let width = geometry.width;
        let table_id = sink.vertex(
            CellId::CANVAS,
            escape_html(&table.label()),
            self.table_style(),
            geometry,
        );

        for (i, column) in table.columns.iter().enumerate() {
            sink.vertex(
                table_id,
                escape_html(&column_label(&column.name, &column.typ)),
                self.column_style(column.marker()),
                Geometry::at(0.0, HEADER_HEIGHT + i as f64 * ROW_HEIGHT, width, ROW_HEIGHT),
            );
        }
    }
}
