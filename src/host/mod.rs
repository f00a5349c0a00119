//! Hosts - Concrete element providers
//!
//! A [`TaffyHost`] lays out a tree with Taffy and hands out
//! [`TaffyElement`]s that the size observer can watch.

mod taffy_host;

pub use taffy_host::{HostError, TaffyElement, TaffyHost};
