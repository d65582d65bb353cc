//! Style strings: `key=value;` tokens concatenated in insertion order.

use std::fmt::Write;

#[derive(Debug, Clone, Default)]
pub struct Style {
    buf: String,
}

/// `fontStyle` bit flags.
pub const FONT_BOLD: u32 = 1;
pub const FONT_UNDERLINE: u32 = 4;

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bare token such as `swimlane` or `text`.
    pub fn flag(mut self, name: &str) -> Self {
        self.buf.push_str(name);
        self.buf.push(';');
        self
    }

    pub fn set(mut self, key: &str, value: impl std::fmt::Display) -> Self {
        let _ = write!(self.buf, "{key}={value};");
        self
    }

    pub fn set_if(self, cond: bool, key: &str, value: impl std::fmt::Display) -> Self {
        if cond { self.set(key, value) } else { self }
    }

    pub fn build(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_order_is_stable() {
        let style = Style::new()
            .flag("text")
            .set("html", 1)
            .set_if(true, "fontStyle", FONT_BOLD)
            .set_if(false, "fontStyle", FONT_UNDERLINE)
            .set("fontSize", 12)
            .build();
        assert_eq!(style, "text;html=1;fontStyle=1;fontSize=12;");
    }

    #[test]
    fn test_style_value_with_brackets() {
        let style = Style::new().set("points", "[[0,0.5],[1,0.5]]").build();
        assert_eq!(style, "points=[[0,0.5],[1,0.5]];");
    }
}
