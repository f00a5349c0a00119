//! Size Observer - Watch a hosting element's content box
//!
//! Attaches to an element and calls back with its content box, once right
//! away and again on every size change, until detached.
//!
//! # Strategies
//!
//! The notification source is picked once, at attach time:
//!
//! ```text
//! element exposes a resize signal  → Element (spark-signals effect)
//! else window events available     → Window  (global listener, re-measures the element)
//! else                             → Inert   (never fires; last render stays)
//! ```
//!
//! Detaching unregisters the source (stops the effect or removes the
//! listener), so no callback can run afterwards.
//!
//! Callbacks run untracked: signals they read never trigger the observer.
//! The element effect lives under its own root, so an observer attached
//! inside another effect outlives that effect's re-runs.

pub mod window;

use std::rc::Rc;

use bitflags::bitflags;
use log::{debug, warn};
use spark_signals::{effect, effect_root, untrack, Signal};

use crate::types::ContainerBox;

// =============================================================================
// Host Element
// =============================================================================

/// An element the icon is hosted in, as seen by the observer.
///
/// The observer only reads from the element; it never resizes it.
pub trait HostElement {
    /// Current content box.
    fn measure(&self) -> ContainerBox;

    /// Per-element resize notifications, when the host provides them.
    ///
    /// The signal's value is the element's content box.
    fn resize_signal(&self) -> Option<Signal<ContainerBox>> {
        None
    }
}

// =============================================================================
// Capabilities
// =============================================================================

bitflags! {
    /// Resize notification mechanisms the runtime offers for an element.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ResizeCapabilities: u8 {
        const ELEMENT = 1 << 0;
        const WINDOW = 1 << 1;
    }
}

impl ResizeCapabilities {
    /// Probe the element and the window registry.
    pub fn detect(element: &dyn HostElement) -> Self {
        let mut caps = Self::empty();
        if element.resize_signal().is_some() {
            caps |= Self::ELEMENT;
        }
        if window::is_available() {
            caps |= Self::WINDOW;
        }
        caps
    }
}

/// Which notification source an observer ended up using.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeStrategy {
    Element,
    Window,
    Inert,
}

// =============================================================================
// Sources
// =============================================================================

/// Called with the element's content box.
pub type BoxCallback = Rc<dyn Fn(ContainerBox)>;

/// Unregisters a source. Running it is the only way to stop callbacks.
pub type Detach = Box<dyn FnOnce()>;

/// A resize notification mechanism.
trait ResizeSource {
    fn strategy(&self) -> ResizeStrategy;

    /// Register, deliver the initial measurement, return the unregistration.
    fn attach(self: Box<Self>, element: Rc<dyn HostElement>, callback: BoxCallback) -> Detach;
}

/// Native per-element notifications: an effect over the element's box signal.
struct ElementResize {
    signal: Signal<ContainerBox>,
}

impl ResizeSource for ElementResize {
    fn strategy(&self) -> ResizeStrategy {
        ResizeStrategy::Element
    }

    fn attach(self: Box<Self>, _element: Rc<dyn HostElement>, callback: BoxCallback) -> Detach {
        let signal = self.signal;
        // Effects run once on creation, which delivers the initial measurement.
        // Disposing the root disposes the child effect with it.
        let stop = effect_root(move || {
            let _child = effect(move || {
                let content_box = signal.get();
                untrack(|| callback(content_box));
            });
        });
        Box::new(stop)
    }
}

/// Window-level fallback: one global listener that re-measures the element.
struct WindowResize;

impl ResizeSource for WindowResize {
    fn strategy(&self) -> ResizeStrategy {
        ResizeStrategy::Window
    }

    fn attach(self: Box<Self>, element: Rc<dyn HostElement>, callback: BoxCallback) -> Detach {
        untrack(|| callback(element.measure()));

        let cleanup = window::on_resize(move |_, _| untrack(|| callback(element.measure())));
        Box::new(cleanup)
    }
}

/// No measurement capability at all.
struct NoResize;

impl ResizeSource for NoResize {
    fn strategy(&self) -> ResizeStrategy {
        ResizeStrategy::Inert
    }

    fn attach(self: Box<Self>, _element: Rc<dyn HostElement>, _callback: BoxCallback) -> Detach {
        Box::new(|| {})
    }
}

fn select_source(element: &dyn HostElement, caps: ResizeCapabilities) -> Box<dyn ResizeSource> {
    if caps.contains(ResizeCapabilities::ELEMENT) {
        if let Some(signal) = element.resize_signal() {
            return Box::new(ElementResize { signal });
        }
    }
    if caps.contains(ResizeCapabilities::WINDOW) {
        return Box::new(WindowResize);
    }
    Box::new(NoResize)
}

// =============================================================================
// Size Observer
// =============================================================================

/// Registration of a callback on one element.
///
/// Attached on construction, unattached after [`SizeObserver::detach`] or
/// drop. There is no re-attach: observe again with a new instance.
pub struct SizeObserver {
    strategy: ResizeStrategy,
    detach: Option<Detach>,
}

impl SizeObserver {
    /// Attach using whatever the runtime offers for this element.
    pub fn attach<F>(element: Rc<dyn HostElement>, callback: F) -> Self
    where
        F: Fn(ContainerBox) + 'static,
    {
        let caps = ResizeCapabilities::detect(element.as_ref());
        Self::attach_with(element, caps, callback)
    }

    /// Attach restricted to the given capabilities.
    pub fn attach_with<F>(
        element: Rc<dyn HostElement>,
        caps: ResizeCapabilities,
        callback: F,
    ) -> Self
    where
        F: Fn(ContainerBox) + 'static,
    {
        let source = select_source(element.as_ref(), caps);
        let strategy = source.strategy();

        match strategy {
            ResizeStrategy::Inert => {
                warn!("no resize notifications available; icon size will not follow its container")
            }
            _ => debug!("size observer attached ({strategy:?})"),
        }

        let detach = source.attach(element, Rc::new(callback));
        Self {
            strategy,
            detach: Some(detach),
        }
    }

    pub fn strategy(&self) -> ResizeStrategy {
        self.strategy
    }

    pub fn is_attached(&self) -> bool {
        self.detach.is_some()
    }

    /// Unregister. No callback runs after this returns.
    pub fn detach(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
            debug!("size observer detached ({:?})", self.strategy);
        }
    }
}

impl Drop for SizeObserver {
    fn drop(&mut self) {
        self.release();
    }
}

// =============================================================================
// Tests
// =============================================================================
