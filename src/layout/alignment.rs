//! Alignment resolution.
//!
//! Maps an alignment token (`<vertical>-<horizontal>` or bare `center`) to a
//! two-axis placement. Total over every string: anything unrecognized falls
//! back to `Center` on the affected axis.

use taffy::{AlignItems, JustifyContent};

use crate::types::Placement;

/// Resolved placement of the icon inside its container.
///
/// `justify` is the horizontal (main) axis, `align` the vertical (cross) axis,
/// matching a row flex container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AlignmentResult {
    pub justify: Placement,
    pub align: Placement,
}

impl AlignmentResult {
    pub const CENTERED: Self = Self {
        justify: Placement::Center,
        align: Placement::Center,
    };

    /// Flex `justify-content` for a row container hosting the icon.
    pub fn justify_content(&self) -> JustifyContent {
        match self.justify {
            Placement::Start => JustifyContent::FlexStart,
            Placement::Center => JustifyContent::Center,
            Placement::End => JustifyContent::FlexEnd,
        }
    }

    /// Flex `align-items` for a row container hosting the icon.
    pub fn align_items(&self) -> AlignItems {
        match self.align {
            Placement::Start => AlignItems::FlexStart,
            Placement::Center => AlignItems::Center,
            Placement::End => AlignItems::FlexEnd,
        }
    }
}

fn vertical(token: &str) -> Placement {
    match token {
        "top" => Placement::Start,
        "bottom" => Placement::End,
        _ => Placement::Center,
    }
}

fn horizontal(token: &str) -> Placement {
    match token {
        "left" => Placement::Start,
        "right" => Placement::End,
        _ => Placement::Center,
    }
}

/// Resolve an alignment token.
///
/// The token is split on its first `-`; the left part is the vertical
/// placement, the rest the horizontal one. A missing side is centered.
///
/// ```
/// use spark_icon::layout::resolve_alignment;
/// use spark_icon::types::Placement;
///
/// let a = resolve_alignment("bottom-left");
/// assert_eq!(a.align, Placement::End);
/// assert_eq!(a.justify, Placement::Start);
///
/// assert_eq!(resolve_alignment("wobbly"), resolve_alignment("center"));
/// ```
pub fn resolve_alignment(token: &str) -> AlignmentResult {
    if token.is_empty() || token == "center" {
        return AlignmentResult::CENTERED;
    }

    let (v, h) = match token.split_once('-') {
        Some((v, h)) => (v, h),
        None => (token, ""),
    };

    AlignmentResult {
        justify: horizontal(h),
        align: vertical(v),
    }
}

// =============================================================================
// Tests
// =============================================================================
