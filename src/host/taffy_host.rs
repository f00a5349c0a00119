//! Taffy Host - A layout tree that can host icons
//!
//! Wraps a `TaffyTree` and publishes a box signal for every node an observer
//! watches, giving those nodes native per-element resize notifications.
//! Signals are set after the tree borrow is released, so observers may call
//! back into the host while handling a change.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{trace, warn};
use spark_signals::{signal, Signal};
use taffy::{AvailableSpace, Dimension, Layout, NodeId, Size, Style, TaffyError, TaffyTree};
use thiserror::Error;

use crate::observer::{window, HostElement};
use crate::types::ContainerBox;
use crate::widget::RenderState;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("Layout tree error: {0}")]
    Taffy(#[from] TaffyError),
}

/// Every node carries a unit context, cleared on removal. Taffy indexes its
/// node storage directly, so liveness is checked through the context before
/// any other tree access.
struct HostInner {
    tree: TaffyTree<()>,
    root: NodeId,
    viewport: ContainerBox,
    /// One signal per live node some element asked to watch.
    watched: HashMap<NodeId, Signal<ContainerBox>>,
}

impl HostInner {
    fn is_live(&self, node: NodeId) -> bool {
        self.tree.get_node_context(node).is_some()
    }

    fn live(&self, node: NodeId) -> Result<NodeId, TaffyError> {
        if self.is_live(node) {
            Ok(node)
        } else {
            Err(TaffyError::InvalidInputNode(node))
        }
    }

    /// Content box of a laid-out node: border box minus padding and border.
    /// Removed nodes measure as 0×0.
    fn content_box(&self, node: NodeId) -> Result<ContainerBox, TaffyError> {
        if !self.is_live(node) {
            return Ok(ContainerBox::ZERO);
        }
        content_box_of(&self.tree, node)
    }
}

fn content_box_of(tree: &TaffyTree<()>, node: NodeId) -> Result<ContainerBox, TaffyError> {
    let layout = tree.layout(node)?;
    let width = layout.size.width
        - layout.padding.left
        - layout.padding.right
        - layout.border.left
        - layout.border.right;
    let height = layout.size.height
        - layout.padding.top
        - layout.padding.bottom
        - layout.border.top
        - layout.border.bottom;
    Ok(ContainerBox::new(width, height))
}

/// Shared handle to a layout tree. Clones refer to the same tree.
#[derive(Clone)]
pub struct TaffyHost {
    inner: Rc<RefCell<HostInner>>,
}

impl TaffyHost {
    /// Create a host whose root fills the viewport.
    pub fn new() -> Result<Self, HostError> {
        let mut tree = TaffyTree::new();
        let root = tree.new_leaf_with_context(
            Style {
                size: Size {
                    width: Dimension::Percent(1.0),
                    height: Dimension::Percent(1.0),
                },
                ..Default::default()
            },
            (),
        )?;

        Ok(Self {
            inner: Rc::new(RefCell::new(HostInner {
                tree,
                root,
                viewport: ContainerBox::ZERO,
                watched: HashMap::new(),
            })),
        })
    }

    pub fn root(&self) -> NodeId {
        self.inner.borrow().root
    }

    pub fn viewport(&self) -> ContainerBox {
        self.inner.borrow().viewport
    }

    /// Append a new node under `parent`.
    pub fn add_node(&self, parent: NodeId, style: Style) -> Result<NodeId, HostError> {
        let mut inner = self.inner.borrow_mut();
        let parent = inner.live(parent)?;
        let node = inner.tree.new_leaf_with_context(style, ())?;
        inner.tree.add_child(parent, node)?;
        Ok(node)
    }

    pub fn set_style(&self, node: NodeId, style: Style) -> Result<(), HostError> {
        let mut inner = self.inner.borrow_mut();
        let node = inner.live(node)?;
        inner.tree.set_style(node, style)?;
        Ok(())
    }

    /// Remove a node. Elements still pointing at it measure as 0×0 and
    /// their observers are told so once.
    pub fn remove_node(&self, node: NodeId) -> Result<(), HostError> {
        let watched = {
            let mut inner = self.inner.borrow_mut();
            let node = inner.live(node)?;
            inner.tree.set_node_context(node, None)?;
            inner.tree.remove(node)?;
            inner.watched.remove(&node)
        };

        if let Some(sig) = watched {
            sig.set(ContainerBox::ZERO);
        }
        Ok(())
    }

    /// Lay the tree out in a `width`×`height` viewport and notify watchers.
    pub fn compute(&self, width: f32, height: f32) -> Result<(), HostError> {
        let updates = {
            let mut inner = self.inner.borrow_mut();
            let viewport = ContainerBox::new(width, height);
            inner.viewport = viewport;

            let root = inner.root;
            inner.tree.compute_layout(
                root,
                Size {
                    width: AvailableSpace::Definite(viewport.width),
                    height: AvailableSpace::Definite(viewport.height),
                },
            )?;

            let mut updates = Vec::with_capacity(inner.watched.len());
            for (node, sig) in &inner.watched {
                updates.push((sig.clone(), inner.content_box(*node)?));
            }
            updates
        };

        trace!("layout computed at {width}x{height}, {} watched node(s)", updates.len());
        for (sig, content_box) in updates {
            sig.set(content_box);
        }
        Ok(())
    }

    /// Lay out again at the current viewport (after style edits).
    pub fn recompute(&self) -> Result<(), HostError> {
        let viewport = self.viewport();
        self.compute(viewport.width, viewport.height)
    }

    /// Computed layout of a live node.
    pub fn layout(&self, node: NodeId) -> Result<Layout, HostError> {
        let inner = self.inner.borrow();
        let node = inner.live(node)?;
        Ok(*inner.tree.layout(node)?)
    }

    pub fn content_box(&self, node: NodeId) -> Result<ContainerBox, HostError> {
        Ok(self.inner.borrow().content_box(node)?)
    }

    /// Element for `node` with per-element resize notifications.
    pub fn element(&self, node: NodeId) -> TaffyElement {
        TaffyElement {
            host: self.clone(),
            node,
            notifications: true,
        }
    }

    /// Element for `node` that only offers measurement, so observers fall
    /// back to window resize events.
    pub fn element_without_notifications(&self, node: NodeId) -> TaffyElement {
        TaffyElement {
            host: self.clone(),
            node,
            notifications: false,
        }
    }

    /// Re-layout whenever the window resizes. Returns cleanup.
    ///
    /// Register this before mounting widgets so the layout is fresh by the
    /// time their window listeners re-measure.
    pub fn follow_window(&self) -> impl FnOnce() + use<> {
        let host = self.clone();
        window::on_resize(move |width, height| {
            if let Err(err) = host.compute(width as f32, height as f32) {
                warn!("layout after window resize failed: {err}");
            }
        })
    }

    /// Write an icon's render state into the tree: the icon leaf becomes a
    /// fixed square and the container places it with flex alignment.
    pub fn apply_render_state(
        &self,
        container: NodeId,
        icon: NodeId,
        state: &RenderState,
    ) -> Result<(), HostError> {
        let mut inner = self.inner.borrow_mut();
        let container = inner.live(container)?;
        let icon = inner.live(icon)?;

        let mut container_style = inner.tree.style(container)?.clone();
        container_style.justify_content = Some(state.alignment.justify_content());
        container_style.align_items = Some(state.alignment.align_items());
        inner.tree.set_style(container, container_style)?;

        let edge = state.sizing.dimension;
        let mut icon_style = inner.tree.style(icon)?.clone();
        icon_style.size = Size {
            width: Dimension::Length(edge),
            height: Dimension::Length(edge),
        };
        icon_style.flex_shrink = 0.0;
        inner.tree.set_style(icon, icon_style)?;

        Ok(())
    }

    fn watch(&self, node: NodeId) -> Signal<ContainerBox> {
        let mut inner = self.inner.borrow_mut();
        if let Some(sig) = inner.watched.get(&node) {
            return sig.clone();
        }
        if !inner.is_live(node) {
            return signal(ContainerBox::ZERO);
        }

        let current = inner.content_box(node).unwrap_or(ContainerBox::ZERO);
        let sig = signal(current);
        inner.watched.insert(node, sig.clone());
        sig
    }
}

// =============================================================================
// Taffy Element
// =============================================================================

/// A node of a [`TaffyHost`] seen as an icon's hosting element.
#[derive(Clone)]
pub struct TaffyElement {
    host: TaffyHost,
    node: NodeId,
    notifications: bool,
}

impl TaffyElement {
    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl HostElement for TaffyElement {
    fn measure(&self) -> ContainerBox {
        match self.host.content_box(self.node) {
            Ok(content_box) => content_box,
            Err(err) => {
                trace!("measuring {:?} failed ({err}); treating as detached", self.node);
                ContainerBox::ZERO
            }
        }
    }

    fn resize_signal(&self) -> Option<Signal<ContainerBox>> {
        self.notifications.then(|| self.host.watch(self.node))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use spark_signals::effect;
    use taffy::{LengthPercentage, Rect};

    fn padded_box(width: f32, height: f32, padding: f32) -> Style {
        Style {
            size: Size {
                width: Dimension::Length(width),
                height: Dimension::Length(height),
            },
            padding: Rect {
                left: LengthPercentage::Length(padding),
                right: LengthPercentage::Length(padding),
                top: LengthPercentage::Length(padding),
                bottom: LengthPercentage::Length(padding),
            },
            flex_shrink: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_root_fills_viewport() {
        let host = TaffyHost::new().unwrap();
        host.compute(80.0, 24.0).unwrap();

        let root = host.root();
        assert_eq!(host.content_box(root).unwrap(), ContainerBox::new(80.0, 24.0));
        assert_eq!(host.viewport(), ContainerBox::new(80.0, 24.0));
    }

    #[test]
    fn test_content_box_excludes_padding() {
        let host = TaffyHost::new().unwrap();
        let node = host.add_node(host.root(), padded_box(40.0, 20.0, 2.0)).unwrap();
        host.compute(80.0, 24.0).unwrap();

        let layout = host.layout(node).unwrap();
        assert_eq!(layout.size.width, 40.0);
        assert_eq!(host.content_box(node).unwrap(), ContainerBox::new(36.0, 16.0));
        assert_eq!(host.element(node).measure(), ContainerBox::new(36.0, 16.0));
    }

    #[test]
    fn test_watched_node_signal_follows_layout() {
        let host = TaffyHost::new().unwrap();
        let node = host
            .add_node(
                host.root(),
                Style {
                    size: Size {
                        width: Dimension::Percent(0.5),
                        height: Dimension::Percent(1.0),
                    },
                    ..Default::default()
                },
            )
            .unwrap();
        host.compute(80.0, 24.0).unwrap();

        let sig = host.element(node).resize_signal().expect("notifications enabled");
        assert_eq!(sig.get(), ContainerBox::new(40.0, 24.0));

        let runs = Rc::new(Cell::new(0));
        let runs_clone = runs.clone();
        let sig_clone = sig.clone();
        let _stop = effect(move || {
            let _ = sig_clone.get();
            runs_clone.set(runs_clone.get() + 1);
        });
        assert_eq!(runs.get(), 1);

        host.compute(120.0, 30.0).unwrap();
        assert_eq!(sig.get(), ContainerBox::new(60.0, 30.0));
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_element_without_notifications() {
        let host = TaffyHost::new().unwrap();
        let node = host.add_node(host.root(), padded_box(10.0, 10.0, 0.0)).unwrap();
        assert!(host.element_without_notifications(node).resize_signal().is_none());
        assert!(host.element(node).resize_signal().is_some());
    }

    #[test]
    fn test_removed_node_measures_zero() {
        let host = TaffyHost::new().unwrap();
        let node = host.add_node(host.root(), padded_box(10.0, 10.0, 0.0)).unwrap();
        host.compute(80.0, 24.0).unwrap();

        let element = host.element(node);
        let sig = element.resize_signal().unwrap();
        assert_eq!(sig.get(), ContainerBox::new(10.0, 10.0));

        host.remove_node(node).unwrap();
        assert_eq!(element.measure(), ContainerBox::ZERO);
        assert_eq!(sig.get(), ContainerBox::ZERO);
        assert!(host.layout(node).is_err());

        // Layout passes no longer touch it
        host.compute(100.0, 30.0).unwrap();
        assert_eq!(sig.get(), ContainerBox::ZERO);
    }

    #[test]
    fn test_removal_forgets_node() {
        let host = TaffyHost::new().unwrap();
        let node = host.add_node(host.root(), padded_box(10.0, 10.0, 0.0)).unwrap();
        host.compute(80.0, 24.0).unwrap();

        host.element(node).resize_signal().unwrap();
        assert_eq!(host.inner.borrow().watched.len(), 1);

        host.remove_node(node).unwrap();
        assert!(host.inner.borrow().watched.is_empty());

        // Watching a removed node does not bring an entry back
        let sig = host.element(node).resize_signal().unwrap();
        assert_eq!(sig.get(), ContainerBox::ZERO);
        assert!(host.inner.borrow().watched.is_empty());

        // A removed node is rejected instead of reaching into the tree
        assert!(host.remove_node(node).is_err());
        assert!(host.set_style(node, Style::default()).is_err());
        assert!(host.add_node(node, Style::default()).is_err());

        // Slots freed by removal are reused without reviving the old id
        let fresh = host.add_node(host.root(), padded_box(4.0, 4.0, 0.0)).unwrap();
        host.compute(80.0, 24.0).unwrap();
        assert_ne!(fresh, node);
        assert_eq!(host.content_box(fresh).unwrap(), ContainerBox::new(4.0, 4.0));
        assert_eq!(host.content_box(node).unwrap(), ContainerBox::ZERO);
    }

    #[test]
    fn test_follow_window() {
        window::reset_window_state();
        let host = TaffyHost::new().unwrap();
        let cleanup = host.follow_window();

        window::dispatch_resize(100, 40);
        assert_eq!(host.viewport(), ContainerBox::new(100.0, 40.0));

        cleanup();
        window::dispatch_resize(10, 10);
        assert_eq!(host.viewport(), ContainerBox::new(100.0, 40.0));
    }
}
