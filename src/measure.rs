use unicode_width::UnicodeWidthStr;

/// Rough text metrics for sizing boxes around labels. A display column is
/// assumed to be `char_ratio` times the font size wide.
pub struct TextMetrics {
    pub char_ratio: f64,
    pub padding_x: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_ratio: 0.6,
            padding_x: 12.0,
        }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str, font_size: u32) -> f64 {
        let columns = UnicodeWidthStr::width(text);
        (columns as f64 * f64::from(font_size) * self.char_ratio).ceil()
    }

    /// Width needed to show `text` plus horizontal padding on both sides.
    pub fn fit_width(&self, text: &str, font_size: u32) -> f64 {
        self.text_width(text, font_size) + self.padding_x * 2.0
    }
}
