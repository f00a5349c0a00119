//! Layout Module - Icon sizing and alignment
//!
//! Pure functions mapping a container box and an [`IconConfig`] to the
//! two values the presentation layer needs:
//!
//! 1. The icon's edge length ([`resolve_dimension`], [`resolve_static_dimension`])
//! 2. Its placement in the container ([`resolve_alignment`])
//!
//! No function here fails or holds state. Unreasonable inputs degrade to 0
//! or to centered.
//!
//! # Example
//!
//! ```
//! use spark_icon::config::IconConfig;
//! use spark_icon::layout::{resolve_alignment, resolve_dimension, place_icon};
//! use spark_icon::types::ContainerBox;
//!
//! let config = IconConfig::default().with_alignment("top-right");
//! let container = ContainerBox::new(120.0, 40.0);
//!
//! let sizing = resolve_dimension(container, &config).unwrap();
//! let alignment = resolve_alignment(config.alignment_token());
//! let rect = place_icon(container, sizing, alignment, config.padding());
//!
//! assert_eq!(sizing.dimension, 40.0);
//! assert_eq!((rect.x, rect.y), (80.0, 0.0));
//! ```
//!
//! [`IconConfig`]: crate::config::IconConfig

mod alignment;
mod sizing;

pub use alignment::{resolve_alignment, AlignmentResult};
pub use sizing::{
    available_size, place_icon, resolve_dimension, resolve_static_dimension, IconRect,
    SizingResult,
};
