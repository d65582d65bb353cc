//! Diagram layout: turns the table IR into a flat list of positioned,
//! styled cells.

mod engine;
mod flat;
mod placement;
mod structured;
pub mod style;
pub mod types;

pub use engine::{CellSink, LayoutEngine, TableLayout};
pub use flat::FlatLayout;
pub use structured::StructuredLayout;
pub use types::{Canvas, Cell, CellId, Geometry, Layout};
