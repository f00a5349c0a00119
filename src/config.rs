//! Icon configuration.
//!
//! The host owns the configuration and hands a fresh [`IconConfig`] to the
//! widget on every edit. Nothing in this crate mutates a config it was given;
//! the `with_*` builders return a new value.

use serde::Deserialize;
use thiserror::Error;

use crate::types::{non_negative, Rgba};

/// Markup rendered when the host supplied none.
pub const DEFAULT_SVG_MARKUP: &str = r#"<svg viewBox="0 0 16 16"></svg>"#;

/// Icon edge length used in static mode when no size is configured.
pub const DEFAULT_ICON_SIZE: f32 = 50.0;

// =============================================================================
// Errors
// =============================================================================

/// Failure to load a persisted widget configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config parse failed: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Sizing Mode
// =============================================================================

/// How the icon's edge length is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizingMode {
    /// Follow the container: observe its size and fit the icon into it.
    #[default]
    Responsive,
    /// Ignore the container: size comes from the configuration alone.
    Static,
}

// =============================================================================
// IconConfig
// =============================================================================

/// Configuration of a single icon widget.
///
/// Deserializes from the persisted widget schema (camelCase keys, colors as
/// CSS strings). Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IconConfig {
    #[serde(rename = "svgCode", alias = "svgMarkup")]
    pub svg_markup: String,
    pub icon_color: Rgba,
    pub background_color: Rgba,
    pub stroke_color: Rgba,
    pub stroke_width: f32,
    pub icon_width: Option<f32>,
    pub icon_height: Option<f32>,
    pub padding: f32,
    pub margin: f32,
    pub border_radius: f32,
    #[serde(rename = "iconAlignment", alias = "alignment")]
    pub alignment: Option<String>,
    pub mode: SizingMode,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            svg_markup: DEFAULT_SVG_MARKUP.to_string(),
            icon_color: Rgba::BLACK,
            background_color: Rgba::TRANSPARENT,
            stroke_color: Rgba::TRANSPARENT,
            stroke_width: 0.0,
            icon_width: None,
            icon_height: None,
            padding: 0.0,
            margin: 0.0,
            border_radius: 0.0,
            alignment: None,
            mode: SizingMode::Responsive,
        }
    }
}

impl IconConfig {
    /// Load a config from the persisted JSON schema.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    // -------------------------------------------------------------------------
    // Sanitized accessors
    // -------------------------------------------------------------------------

    pub fn padding(&self) -> f32 {
        non_negative(self.padding)
    }

    pub fn margin(&self) -> f32 {
        non_negative(self.margin)
    }

    pub fn border_radius(&self) -> f32 {
        non_negative(self.border_radius)
    }

    pub fn stroke_width(&self) -> f32 {
        non_negative(self.stroke_width)
    }

    /// Configured width, if any. A present but unreasonable value reads as 0.
    pub fn icon_width(&self) -> Option<f32> {
        self.icon_width.map(non_negative)
    }

    /// Configured height, if any. A present but unreasonable value reads as 0.
    pub fn icon_height(&self) -> Option<f32> {
        self.icon_height.map(non_negative)
    }

    /// Alignment token, empty when absent.
    pub fn alignment_token(&self) -> &str {
        self.alignment.as_deref().unwrap_or("")
    }

    /// The smaller of the configured sides, or `None` when neither is set.
    pub fn desired_size(&self) -> Option<f32> {
        match (self.icon_width(), self.icon_height()) {
            (Some(w), Some(h)) => Some(w.min(h)),
            (Some(w), None) => Some(w),
            (None, Some(h)) => Some(h),
            (None, None) => None,
        }
    }

    // -------------------------------------------------------------------------
    // Builders
    // -------------------------------------------------------------------------

    pub fn with_svg_markup(mut self, markup: impl Into<String>) -> Self {
        self.svg_markup = markup.into();
        self
    }

    pub fn with_icon_size(mut self, width: Option<f32>, height: Option<f32>) -> Self {
        self.icon_width = width;
        self.icon_height = height;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_alignment(mut self, token: impl Into<String>) -> Self {
        self.alignment = Some(token.into());
        self
    }

    pub fn with_mode(mut self, mode: SizingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_colors(mut self, icon: Rgba, background: Rgba, stroke: Rgba) -> Self {
        self.icon_color = icon;
        self.background_color = background;
        self.stroke_color = stroke;
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
