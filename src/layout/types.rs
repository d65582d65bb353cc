//! Data structures for the positioned diagram document.

use std::fmt;

/// Identifier of a cell. 0 and 1 are the canvas anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u32);

impl CellId {
    pub const ROOT: CellId = CellId(0);
    pub const CANVAS: CellId = CellId(1);
    /// First ID handed out for visual cells.
    pub const FIRST_VERTEX: CellId = CellId(2);
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic ID source owned by a single layout call.
#[derive(Debug)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next: CellId::FIRST_VERTEX.0,
        }
    }
}

impl IdAllocator {
    pub fn allocate(&mut self) -> CellId {
        let id = CellId(self.next);
        self.next += 1;
        id
    }
}

/// Position and size relative to the parent cell. `None` offsets are left
/// for the consumer to inherit.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: f64,
    pub height: f64,
    /// Emit an `alternateBounds` rectangle of the same size.
    pub alternate_bounds: bool,
}

impl Geometry {
    pub fn at(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width,
            height,
            alternate_bounds: false,
        }
    }

    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            x: None,
            y: None,
            width,
            height,
            alternate_bounds: false,
        }
    }

    pub fn with_x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    pub fn with_alternate_bounds(mut self) -> Self {
        self.alternate_bounds = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub id: CellId,
    /// Display text, already HTML-escaped. `None` for the anchors.
    pub value: Option<String>,
    pub style: Option<String>,
    pub parent: Option<CellId>,
    pub vertex: bool,
    pub geometry: Option<Geometry>,
}

impl Cell {
    pub fn anchors() -> [Cell; 2] {
        [
            Cell {
                id: CellId::ROOT,
                value: None,
                style: None,
                parent: None,
                vertex: false,
                geometry: None,
            },
            Cell {
                id: CellId::CANVAS,
                value: None,
                style: None,
                parent: Some(CellId::ROOT),
                vertex: false,
                geometry: None,
            },
        ]
    }
}

/// Canvas size hints written on the graph model element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub dx: f64,
    pub dy: f64,
    pub page_width: f64,
    pub page_height: f64,
}

/// The complete layout result: cells in emission order.
#[derive(Debug, Clone)]
pub struct Layout {
    pub cells: Vec<Cell>,
    pub canvas: Canvas,
}

impl Layout {
    pub fn children(&self, parent: CellId) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(move |c| c.parent == Some(parent))
    }

    /// Top-level table cells, in placement order.
    pub fn tables(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.children(CellId::CANVAS)
    }
}
