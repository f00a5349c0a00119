//! Window Module - Global window (terminal) resize state and listeners
//!
//! The fallback notification path for hosts that cannot report per-element
//! size changes. One global size signal plus a listener registry, fed by
//! crossterm resize events.
//!
//! # API
//!
//! - `window_size` / `window_size_signal` - Current window size
//! - `on_resize(handler)` - Subscribe to resize events, returns cleanup
//! - `dispatch_resize(w, h)` - Deliver a resize to every listener
//! - `route_event` / `pump_events` - Bridge from crossterm's event stream
//! - `detect` / `set_available` - Declare whether window events exist at all
//!
//! # Example
//!
//! ```ignore
//! use spark_icon::observer::window;
//! use std::time::Duration;
//!
//! window::detect();
//! let cleanup = window::on_resize(|w, h| println!("now {w}x{h}"));
//!
//! loop {
//!     window::pump_events(Duration::from_millis(16))?;
//! }
//! ```

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{poll, read, Event};
use crossterm::tty::IsTty;
use log::{debug, trace};
use spark_signals::{signal, Signal};

/// Handler for window resize events (new width, height).
pub type ResizeHandler = Rc<dyn Fn(u16, u16)>;

// =============================================================================
// STATE
// =============================================================================

struct ListenerRegistry {
    listeners: Vec<(usize, ResizeHandler)>,
    next_id: usize,
}

impl ListenerRegistry {
    fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn get(&self, id: usize) -> Option<ResizeHandler> {
        self.listeners
            .iter()
            .find(|(listener_id, _)| *listener_id == id)
            .map(|(_, handler)| Rc::clone(handler))
    }
}

thread_local! {
    static WINDOW_SIZE: Signal<(u16, u16)> = signal((80, 24));
    static AVAILABLE: Cell<bool> = const { Cell::new(true) };
    static REGISTRY: RefCell<ListenerRegistry> = RefCell::new(ListenerRegistry::new());
}

/// Current window size in cells.
pub fn window_size() -> (u16, u16) {
    WINDOW_SIZE.with(|s| s.get())
}

/// The window size signal for reactive tracking.
pub fn window_size_signal() -> Signal<(u16, u16)> {
    WINDOW_SIZE.with(|s| s.clone())
}

/// Whether this host delivers window resize events at all.
pub fn is_available() -> bool {
    AVAILABLE.with(|a| a.get())
}

/// Declare whether window resize events exist (false for headless hosts).
pub fn set_available(available: bool) {
    AVAILABLE.with(|a| a.set(available));
}

/// Detect the real terminal: availability from the tty check, size from
/// crossterm. Returns the availability.
pub fn detect() -> bool {
    let available = io::stdout().is_tty();
    set_available(available);

    if let Ok((width, height)) = crossterm::terminal::size() {
        WINDOW_SIZE.with(|s| s.set((width, height)));
    }

    debug!("window detection: available={available}, size={:?}", window_size());
    available
}

// =============================================================================
// LISTENERS
// =============================================================================

/// Subscribe to window resize events.
/// Returns cleanup function; once it runs the handler is never called again.
pub fn on_resize<F>(handler: F) -> impl FnOnce()
where
    F: Fn(u16, u16) + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.listeners.push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            reg.listeners.retain(|(listener_id, _)| *listener_id != id);
        });
    }
}

/// Number of registered resize listeners.
pub fn listener_count() -> usize {
    REGISTRY.with(|reg| reg.borrow().listeners.len())
}

/// Record a new window size and notify listeners in registration order.
///
/// Listeners may subscribe or unsubscribe from inside a handler. A listener
/// removed mid-dispatch is skipped. Returns how many handlers ran.
pub fn dispatch_resize(width: u16, height: u16) -> usize {
    WINDOW_SIZE.with(|s| s.set((width, height)));

    let ids: Vec<usize> = REGISTRY.with(|reg| {
        reg.borrow().listeners.iter().map(|(id, _)| *id).collect()
    });

    let mut invoked = 0;
    for id in ids {
        // Registry borrow is released before the handler runs
        let Some(handler) = REGISTRY.with(|reg| reg.borrow().get(id)) else {
            continue;
        };
        handler(width, height);
        invoked += 1;
    }

    trace!("window resize {width}x{height} delivered to {invoked} listener(s)");
    invoked
}

// =============================================================================
// CROSSTERM BRIDGE
// =============================================================================

/// Route a crossterm event. Returns true if it was a resize.
pub fn route_event(event: &Event) -> bool {
    match event {
        Event::Resize(width, height) => {
            dispatch_resize(*width, *height);
            true
        }
        _ => false,
    }
}

/// Drain pending crossterm events, waiting at most `timeout` for the first.
/// Returns the number of resize events routed.
pub fn pump_events(timeout: Duration) -> io::Result<usize> {
    let mut resizes = 0;
    let mut wait = timeout;

    while poll(wait)? {
        if route_event(&read()?) {
            resizes += 1;
        }
        wait = Duration::ZERO;
    }

    Ok(resizes)
}

/// Reset window state (for testing)
pub fn reset_window_state() {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.listeners.clear();
        reg.next_id = 0;
    });
    AVAILABLE.with(|a| a.set(true));
    WINDOW_SIZE.with(|s| s.set((80, 24)));
}

// =============================================================================
// TESTS
// =============================================================================
