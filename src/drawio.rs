//! draw.io (mxGraph) serialization.

use crate::layout::{Cell, CellId, Geometry, Layout};
use std::collections::HashSet;
use std::fmt::Write;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RenderError {
    #[error("Anchor cells 0 and 1 must lead the document")]
    MissingAnchors,
    #[error("Duplicate cell id {0}")]
    DuplicateId(CellId),
    #[error("Cell {id} references parent {parent} before it is defined")]
    DanglingParent { id: CellId, parent: CellId },
    #[error("Cell {0} has no parent")]
    Orphan(CellId),
    #[error("Vertex {0} has no geometry")]
    MissingGeometry(CellId),
}

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Default)]
pub struct DrawioRenderer;

impl DrawioRenderer {
    pub fn render(&self, layout: &Layout) -> Result<String, RenderError> {
        validate(layout)?;

        let mut xml = String::new();
        let canvas = &layout.canvas;

        writeln!(&mut xml, "{XML_DECLARATION}").unwrap();
        writeln!(
            &mut xml,
            r#"<mxGraphModel dx="{}" dy="{}" grid="1" gridSize="10" guides="1" tooltips="1" connect="1" arrows="1" fold="1" page="1" pageScale="1" pageWidth="{}" pageHeight="{}" math="0" shadow="0">"#,
            canvas.dx, canvas.dy, canvas.page_width, canvas.page_height
        )
        .unwrap();
        writeln!(&mut xml, "  <root>").unwrap();

        for cell in &layout.cells {
            self.render_cell(&mut xml, cell);
        }

        writeln!(&mut xml, "  </root>").unwrap();
        writeln!(&mut xml, "</mxGraphModel>").unwrap();
        Ok(xml)
    }

    fn render_cell(&self, xml: &mut String, cell: &Cell) {
        write!(xml, r#"    <mxCell id="{}""#, cell.id).unwrap();
        if let Some(value) = &cell.value {
            write!(xml, r#" value="{}""#, escape_xml(value)).unwrap();
        }
        if let Some(style) = &cell.style {
            write!(xml, r#" style="{}""#, escape_xml(style)).unwrap();
        }
        if cell.vertex {
            xml.push_str(r#" vertex="1""#);
        }
        if let Some(parent) = cell.parent {
            write!(xml, r#" parent="{parent}""#).unwrap();
        }

        match &cell.geometry {
            None => xml.push_str(" />\n"),
            Some(geometry) => {
                xml.push_str(">\n");
                self.render_geometry(xml, geometry);
                xml.push_str("    </mxCell>\n");
            }
        }
    }

    fn render_geometry(&self, xml: &mut String, g: &Geometry) {
        xml.push_str("      <mxGeometry");
        if let Some(x) = g.x {
            write!(xml, r#" x="{x}""#).unwrap();
        }
        if let Some(y) = g.y {
            write!(xml, r#" y="{y}""#).unwrap();
        }
        write!(xml, r#" width="{}" height="{}" as="geometry""#, g.width, g.height).unwrap();

        if g.alternate_bounds {
            xml.push_str(">\n");
            writeln!(
                xml,
                r#"        <mxRectangle width="{}" height="{}" as="alternateBounds" />"#,
                g.width, g.height
            )
            .unwrap();
            xml.push_str("      </mxGeometry>\n");
        } else {
            xml.push_str(" />\n");
        }
    }
}

/// Structural checks a draw.io consumer enforces: the two anchors first,
/// unique IDs, and every other cell parented to an earlier cell.
pub fn validate(layout: &Layout) -> Result<(), RenderError> {
    let [root, canvas, rest @ ..] = layout.cells.as_slice() else {
        return Err(RenderError::MissingAnchors);
    };
    if root.id != CellId::ROOT
        || root.parent.is_some()
        || canvas.id != CellId::CANVAS
        || canvas.parent != Some(CellId::ROOT)
    {
        return Err(RenderError::MissingAnchors);
    }

    let mut seen: HashSet<CellId> = HashSet::from([CellId::ROOT, CellId::CANVAS]);
    for cell in rest {
        let parent = cell.parent.ok_or(RenderError::Orphan(cell.id))?;
        if !seen.contains(&parent) {
            return Err(RenderError::DanglingParent {
                id: cell.id,
                parent,
            });
        }
        if cell.vertex && cell.geometry.is_none() {
            return Err(RenderError::MissingGeometry(cell.id));
        }
        if !seen.insert(cell.id) {
            return Err(RenderError::DuplicateId(cell.id));
        }
    }
    Ok(())
}

/// Escape text for an attribute value.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape display text for cells rendered with `html=1`.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
