//! # spark-icon
//!
//! Responsive SVG icon widget for reactive spark-tui hosts.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity and [Taffy](https://github.com/DioxusLabs/taffy)
//! for host layout.
//!
//! ## Architecture
//!
//! The widget renders one square icon inside a container whose size the host
//! controls, and keeps the icon's size and placement in sync with it:
//!
//! ```text
//! container resize → SizeObserver → resolve_dimension / resolve_alignment → RenderState
//! config edit      ─────────────────┘ (last observed box)
//! ```
//!
//! The SVG markup and colors are carried through untouched; turning them
//! into pixels is the presentation layer's job.
//!
//! ## Modules
//!
//! - [`types`] - Core types (ContainerBox, Placement, Rgba)
//! - [`config`] - Icon configuration and its JSON schema
//! - [`layout`] - Pure sizing and alignment computation
//! - [`observer`] - Size observer with element and window strategies
//! - [`host`] - Taffy-backed host elements
//! - [`widget`] - Mount / config / unmount lifecycle

pub mod config;
pub mod host;
pub mod layout;
pub mod observer;
pub mod types;
pub mod widget;

// Re-export commonly used items
pub use types::*;

pub use config::{ConfigError, IconConfig, SizingMode, DEFAULT_ICON_SIZE, DEFAULT_SVG_MARKUP};

pub use layout::{
    available_size, place_icon, resolve_alignment, resolve_dimension, resolve_static_dimension,
    AlignmentResult, IconRect, SizingResult,
};

pub use observer::{
    window, BoxCallback, Detach, HostElement, ResizeCapabilities, ResizeStrategy, SizeObserver,
};

pub use host::{HostError, TaffyElement, TaffyHost};

pub use widget::{IconWidget, RenderState};
