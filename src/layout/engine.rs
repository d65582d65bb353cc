//! Layout engine core implementation.

use crate::config::{LayoutConfig, LayoutStrategy};
use crate::ir::{DiagramIR, TableIR};

use super::flat::FlatLayout;
use super::placement::GridPlacement;
use super::structured::StructuredLayout;
use super::types::{Cell, CellId, Geometry, IdAllocator, Layout};

/// Accumulates cells for one layout call. IDs come from its own counter,
/// so separate calls never share state.
pub struct CellSink {
    ids: IdAllocator,
    cells: Vec<Cell>,
}

impl Default for CellSink {
    fn default() -> Self {
        Self {
            ids: IdAllocator::default(),
            cells: Vec::new(),
        }
    }
}

impl CellSink {
    pub fn vertex(
        &mut self,
        parent: CellId,
        value: String,
        style: String,
        geometry: Geometry,
    ) -> CellId {
        let id = self.ids.allocate();
        self.cells.push(Cell {
            id,
            value: Some(value),
            style: Some(style),
            parent: Some(parent),
            vertex: true,
            geometry: Some(geometry),
        });
        id
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }
}

/// One way of drawing a table.
pub trait TableLayout {
    /// Width and height of the table box.
    fn box_size(&self, table: &TableIR) -> (f64, f64);

    /// Emit the table cell (parented to the canvas) and its descendants.
    fn emit(&self, sink: &mut CellSink, table: &TableIR, geometry: Geometry);
}

/// Layout engine configuration and computation.
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            config: LayoutConfig::default(),
        }
    }
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Compute layout for the given diagram.
    pub fn layout(&self, ir: &DiagramIR) -> Layout {
        match self.config.strategy {
            LayoutStrategy::Flat => self.layout_with(&FlatLayout::new(&self.config), ir),
            LayoutStrategy::Structured => {
                self.layout_with(&StructuredLayout::new(&self.config), ir)
            }
        }
    }

    fn layout_with(&self, strategy: &dyn TableLayout, ir: &DiagramIR) -> Layout {
        let mut sink = CellSink::default();
        let mut grid = GridPlacement::new(&self.config);

        for table in &ir.tables {
            let (width, height) = strategy.box_size(table);
            let (x, y) = grid.place(width, height);
            tracing::debug!(
                table = %table.label(),
                columns = table.columns.len(),
                x,
                y,
                "placing table"
            );
            strategy.emit(&mut sink, table, Geometry::at(x, y, width, height));
        }

        let mut cells = Vec::from(Cell::anchors());
        cells.extend(sink.into_cells());

        Layout {
            cells,
            canvas: grid.canvas(),
        }
    }
}
