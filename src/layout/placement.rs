//! Grid placement of table boxes.

use crate::config::LayoutConfig;

use super::types::Canvas;

const PAGE_MARGIN: f64 = 100.0;
const MIN_PAGE_HEIGHT: f64 = 1100.0;

/// Places boxes left to right, each starting where the previous box plus
/// the gap ends. With `wrap_after` set, a new band starts below the tallest
/// box of the current one.
pub struct GridPlacement {
    origin_x: f64,
    origin_y: f64,
    gap: f64,
    wrap_after: Option<usize>,
    x: f64,
    y: f64,
    in_band: usize,
    band_height: f64,
    max_right: f64,
    max_bottom: f64,
}

impl GridPlacement {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            origin_x: config.origin_x,
            origin_y: config.origin_y,
            gap: config.table_gap,
            wrap_after: config.wrap_after.filter(|n| *n > 0),
            x: config.origin_x,
            y: config.origin_y,
            in_band: 0,
            band_height: 0.0,
            max_right: config.origin_x,
            max_bottom: config.origin_y,
        }
    }

    /// Reserve a box and return its top-left corner.
    pub fn place(&mut self, width: f64, height: f64) -> (f64, f64) {
        if self.wrap_after.is_some_and(|n| self.in_band == n) {
            self.x = self.origin_x;
            self.y += self.band_height + self.gap;
            self.in_band = 0;
            self.band_height = 0.0;
        }

        let pos = (self.x, self.y);

        self.x += width + self.gap;
        self.in_band += 1;
        self.band_height = self.band_height.max(height);
        self.max_right = self.max_right.max(pos.0 + width);
        self.max_bottom = self.max_bottom.max(pos.1 + height);

        pos
    }

    /// Canvas hints for everything placed so far.
    pub fn canvas(&self) -> Canvas {
        let dx = self.max_right + self.gap;
        let dy = self.max_bottom + self.origin_y;
        Canvas {
            dx,
            dy,
            page_width: dx + PAGE_MARGIN,
            page_height: (dy + PAGE_MARGIN).max(MIN_PAGE_HEIGHT),
        }
    }
}
