//! Icon sizing.
//!
//! The icon is always square. In responsive mode its edge is the largest
//! square that fits the container after padding, capped by the configured
//! size. In static mode the container is ignored.

use crate::config::{IconConfig, DEFAULT_ICON_SIZE};
use crate::types::{non_negative, ContainerBox};

use super::alignment::AlignmentResult;

/// Edge length at which the icon renders.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizingResult {
    pub dimension: f32,
}

impl SizingResult {
    pub const fn new(dimension: f32) -> Self {
        Self { dimension }
    }

    /// Keep `previous` when a computation was skipped.
    pub fn retain(previous: Self, next: Option<Self>) -> Self {
        next.unwrap_or(previous)
    }
}

/// Largest square edge that fits the container's shorter side after
/// subtracting padding from both sides. Never negative.
pub fn available_size(container: ContainerBox, padding: f32) -> f32 {
    (container.shorter_side() - 2.0 * non_negative(padding)).max(0.0)
}

/// Fit the icon into `container`.
///
/// Returns `None` when the container is 0×0 (not laid out yet, or detached):
/// the caller keeps whatever it rendered before instead of collapsing.
///
/// ```
/// use spark_icon::config::IconConfig;
/// use spark_icon::layout::resolve_dimension;
/// use spark_icon::types::ContainerBox;
///
/// let config = IconConfig::default().with_padding(10.0);
/// let sizing = resolve_dimension(ContainerBox::new(200.0, 100.0), &config).unwrap();
/// assert_eq!(sizing.dimension, 80.0);
/// ```
pub fn resolve_dimension(container: ContainerBox, config: &IconConfig) -> Option<SizingResult> {
    if container.is_degenerate() {
        return None;
    }

    let available = available_size(container, config.padding());
    let dimension = match config.desired_size() {
        Some(desired) => available.min(desired),
        None => available,
    };

    Some(SizingResult::new(dimension))
}

/// Size from the configuration alone, for hosts that do not observe the
/// container. Falls back to [`DEFAULT_ICON_SIZE`].
pub fn resolve_static_dimension(config: &IconConfig) -> SizingResult {
    SizingResult::new(config.desired_size().unwrap_or(DEFAULT_ICON_SIZE))
}

// =============================================================================
// Placement
// =============================================================================

/// Where the icon square sits inside the container, relative to the
/// container's content-box origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IconRect {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// Position a sized icon inside the padded area of `container`.
pub fn place_icon(
    container: ContainerBox,
    sizing: SizingResult,
    alignment: AlignmentResult,
    padding: f32,
) -> IconRect {
    let padding = non_negative(padding);
    let inner_w = (container.width - 2.0 * padding).max(0.0);
    let inner_h = (container.height - 2.0 * padding).max(0.0);
    let size = sizing.dimension;

    IconRect {
        x: padding + alignment.justify.offset(inner_w - size),
        y: padding + alignment.align.offset(inner_h - size),
        size,
    }
}

// =============================================================================
// Tests
// =============================================================================
