//! Layout configuration. Every option is cosmetic: it changes geometry and
//! fonts, never which tables or columns are drawn.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// How a table and its columns are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStrategy {
    /// Swimlane box with one text line per column.
    Flat,
    /// Table shape with row cells split into a key indicator and a name.
    #[default]
    Structured,
}

impl LayoutStrategy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "flat" => Some(Self::Flat),
            "structured" | "table" => Some(Self::Structured),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Structured => "structured",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub strategy: LayoutStrategy,
    pub table_width: f64,
    /// Horizontal space between adjacent tables (also the vertical gap
    /// between wrapped bands).
    pub table_gap: f64,
    pub column_font_size: u32,
    pub title_font_size: u32,
    pub origin_x: f64,
    pub origin_y: f64,
    /// Start a new band of tables after this many.
    pub wrap_after: Option<usize>,
    /// Widen boxes whose labels do not fit `table_width`.
    pub fit_to_content: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::structured()
    }
}

impl LayoutConfig {
    pub fn structured() -> Self {
        Self {
            strategy: LayoutStrategy::Structured,
            table_width: 550.0,
            table_gap: 50.0,
            column_font_size: 12,
            title_font_size: 20,
            origin_x: 80.0,
            origin_y: 40.0,
            wrap_after: None,
            fit_to_content: false,
        }
    }

    pub fn flat() -> Self {
        Self {
            strategy: LayoutStrategy::Flat,
            table_width: 180.0,
            table_gap: 20.0,
            column_font_size: 12,
            title_font_size: 20,
            origin_x: 0.0,
            origin_y: 0.0,
            wrap_after: Some(4),
            fit_to_content: false,
        }
    }

    pub fn for_strategy(strategy: LayoutStrategy) -> Self {
        match strategy {
            LayoutStrategy::Flat => Self::flat(),
            LayoutStrategy::Structured => Self::structured(),
        }
    }

    /// Parse a JSON config. Missing keys fall back to the preset of the
    /// strategy it names (structured when it names none).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let overrides: Map<String, Value> = serde_json::from_str(json)?;
        let strategy = match overrides.get("strategy") {
            Some(value) => LayoutStrategy::deserialize(value)?,
            None => LayoutStrategy::default(),
        };

        let mut merged = serde_json::to_value(Self::for_strategy(strategy))?;
        if let Value::Object(base) = &mut merged {
            base.extend(overrides);
        }
        Ok(serde_json::from_value(merged)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }
}
