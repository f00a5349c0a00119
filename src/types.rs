//! Core types for spark-icon.
//!
//! These are the values that flow between the observer, the layout
//! computation and the presentation layer.

use serde::{Deserialize, Deserializer};

// =============================================================================
// Container Box
// =============================================================================

/// Content-box size of the element hosting the icon, in pixels (or cells).
///
/// Negative, NaN and infinite inputs are clamped to 0 on construction, so a
/// `ContainerBox` is always a sane, non-negative size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerBox {
    pub width: f32,
    pub height: f32,
}

impl ContainerBox {
    /// Create a box, clamping both sides to `>= 0`.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: non_negative(width),
            height: non_negative(height),
        }
    }

    /// An element that has not been laid out yet (or is detached).
    pub const ZERO: Self = Self { width: 0.0, height: 0.0 };

    /// True when both sides are zero at once.
    ///
    /// A single zero side is a real (if empty) layout and is not degenerate.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Length of the shorter side.
    pub fn shorter_side(&self) -> f32 {
        self.width.min(self.height)
    }
}

impl From<(u16, u16)> for ContainerBox {
    fn from((width, height): (u16, u16)) -> Self {
        Self::new(width as f32, height as f32)
    }
}

/// Clamp a length to a finite, non-negative value.
pub(crate) fn non_negative(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

// =============================================================================
// Placement
// =============================================================================

/// Placement of the icon along one axis of its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Placement {
    Start,
    #[default]
    Center,
    End,
}

impl Placement {
    /// Offset from the start edge when `free_space` is left over on this axis.
    ///
    /// Negative free space (icon larger than the container) clamps to 0.
    pub fn offset(self, free_space: f32) -> f32 {
        let free = non_negative(free_space);
        match self {
            Placement::Start => 0.0,
            Placement::Center => free / 2.0,
            Placement::End => free,
        }
    }
}

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Alpha 255 = fully opaque, 0 = fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Transparent color. Also what `none` parses to.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Whether the color paints anything at all.
    pub fn is_visible(&self) -> bool {
        self.a > 0
    }

    /// Parse a CSS-style color string.
    ///
    /// Accepts `#rgb`, `#rrggbb` and `#rrggbbaa` (the `#` is optional),
    /// `rgb(r, g, b)` and `rgba(r, g, b, a)` with `a` in 0-1 or a percentage,
    /// and the keywords `transparent`, `none`, `black` and `white`.
    /// Keywords and function names are case-insensitive.
    ///
    /// ```
    /// use spark_icon::types::Rgba;
    ///
    /// assert_eq!(Rgba::parse("#000000"), Some(Rgba::BLACK));
    /// assert_eq!(Rgba::parse("f00"), Some(Rgba::rgb(255, 0, 0)));
    /// assert_eq!(Rgba::parse("none"), Some(Rgba::TRANSPARENT));
    /// assert_eq!(Rgba::parse("rgba(255, 0, 0, 0.5)"), Some(Rgba::new(255, 0, 0, 128)));
    /// assert!(Rgba::parse("chartreuse-ish").is_none());
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        let lower = input.trim().to_ascii_lowercase();
        match lower.as_str() {
            "" => None,
            "transparent" | "none" => Some(Self::TRANSPARENT),
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            color if color.starts_with("rgb") => rgb_function(color),
            color => hex_color(color),
        }
    }
}

/// `rrggbb[aa]` or the `rgb` shorthand, each digit doubled.
fn hex_color(color: &str) -> Option<Rgba> {
    let digits = color.strip_prefix('#').unwrap_or(color);
    let nibbles = digits
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8))
        .collect::<Option<Vec<u8>>>()?;

    let channels: Vec<u8> = match nibbles.len() {
        3 => nibbles.iter().map(|n| n * 0x11).collect(),
        6 | 8 => nibbles.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect(),
        _ => return None,
    };
    let alpha = channels.get(3).copied().unwrap_or(u8::MAX);
    Some(Rgba::new(channels[0], channels[1], channels[2], alpha))
}

/// `rgb(...)` / `rgba(...)` with comma, space or slash separators.
/// Channels are clamped to 0-255, alpha to 0-1.
fn rgb_function(color: &str) -> Option<Rgba> {
    let args = color
        .strip_prefix("rgba(")
        .or_else(|| color.strip_prefix("rgb("))?
        .strip_suffix(')')?;

    let parts: Vec<&str> = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();

    let number = |p: &str| p.parse::<f32>().ok().filter(|v| !v.is_nan());
    let channel = |p: &str| number(p).map(|v| v.round().clamp(0.0, 255.0) as u8);
    let alpha = |p: &str| {
        let fraction = match p.strip_suffix('%') {
            Some(percent) => number(percent)? / 100.0,
            None => number(p)?,
        };
        Some((fraction.clamp(0.0, 1.0) * 255.0).round() as u8)
    };

    match parts.as_slice() {
        &[r, g, b] => Some(Rgba::rgb(channel(r)?, channel(g)?, channel(b)?)),
        &[r, g, b, a] => Some(Rgba::new(channel(r)?, channel(g)?, channel(b)?, alpha(a)?)),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Rgba::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color `{raw}`")))
    }
}

// =============================================================================
// Tests
// =============================================================================
