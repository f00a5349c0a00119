//! Icon Widget - Lifecycle glue between the observer and the layout functions.
//!
//! The host drives the widget with three explicit calls, each returning the
//! render values to apply:
//!
//! ```text
//! on_mount(element)        → attach observer (responsive mode), initial measurement
//! on_config_changed(cfg)   → recompute with the last observed box
//! on_unmount()             → detach observer
//! ```
//!
//! Every recomputation is also published on a `Signal<RenderState>`, so a
//! presentation layer can follow it with an effect instead of polling.
//!
//! # Example
//!
//! ```ignore
//! let mut widget = IconWidget::new(config);
//! let state = widget.on_mount(host.element(container));
//!
//! let render = widget.render_signal();
//! let _stop = effect(move || apply(render.get()));
//!
//! widget.on_config_changed(new_config);
//! widget.on_unmount();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, trace};
use spark_signals::{signal, Signal};

use crate::config::{IconConfig, SizingMode};
use crate::layout::{
    place_icon, resolve_alignment, resolve_dimension, resolve_static_dimension, AlignmentResult,
    IconRect, SizingResult,
};
use crate::observer::{HostElement, ResizeStrategy, SizeObserver};
use crate::types::ContainerBox;

// =============================================================================
// Render State
// =============================================================================

/// The two values the presentation layer applies.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderState {
    pub sizing: SizingResult,
    pub alignment: AlignmentResult,
}

struct WidgetState {
    config: IconConfig,
    last_box: Option<ContainerBox>,
    current: RenderState,
}

impl WidgetState {
    fn new(config: IconConfig) -> Self {
        let mut state = Self {
            config,
            last_box: None,
            current: RenderState::default(),
        };
        state.recompute();
        state
    }

    fn observe(&mut self, content_box: ContainerBox) -> RenderState {
        self.last_box = Some(content_box);
        self.recompute()
    }

    fn recompute(&mut self) -> RenderState {
        let alignment = resolve_alignment(self.config.alignment_token());
        let sizing = match self.config.mode {
            SizingMode::Static => resolve_static_dimension(&self.config),
            SizingMode::Responsive => match self.last_box {
                Some(content_box) => {
                    let next = resolve_dimension(content_box, &self.config);
                    if next.is_none() {
                        debug!("container is 0x0, keeping previous icon size");
                    }
                    SizingResult::retain(self.current.sizing, next)
                }
                None => self.current.sizing,
            },
        };

        self.current = RenderState { sizing, alignment };
        trace!("icon render state: {:?}", self.current);
        self.current
    }
}

// =============================================================================
// Icon Widget
// =============================================================================

/// One icon hosted in one element.
pub struct IconWidget {
    state: Rc<RefCell<WidgetState>>,
    render: Signal<RenderState>,
    element: Option<Rc<dyn HostElement>>,
    observer: Option<SizeObserver>,
}

impl IconWidget {
    pub fn new(config: IconConfig) -> Self {
        let state = WidgetState::new(config);
        let render = signal(state.current);
        Self {
            state: Rc::new(RefCell::new(state)),
            render,
            element: None,
            observer: None,
        }
    }

    /// Mount into `element`. In responsive mode this attaches the size
    /// observer, which measures the element right away.
    ///
    /// Mounting an already mounted widget unmounts it first.
    pub fn on_mount<E>(&mut self, element: E) -> RenderState
    where
        E: HostElement + 'static,
    {
        if self.is_mounted() {
            debug!("icon widget mounted twice, remounting");
            self.on_unmount();
        }

        self.element = Some(Rc::new(element));
        self.sync_observer();
        self.publish()
    }

    /// Take a new configuration. Sizing uses the last observed box; a mode
    /// change attaches or detaches the observer.
    pub fn on_config_changed(&mut self, config: IconConfig) -> RenderState {
        self.state.borrow_mut().config = config;
        self.sync_observer();
        self.publish()
    }

    /// Detach from the element. Idempotent.
    pub fn on_unmount(&mut self) -> RenderState {
        if let Some(observer) = self.observer.take() {
            observer.detach();
        }
        self.element = None;
        self.render_state()
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn render_state(&self) -> RenderState {
        self.state.borrow().current
    }

    /// Signal updated on every recomputation.
    pub fn render_signal(&self) -> Signal<RenderState> {
        self.render.clone()
    }

    pub fn config(&self) -> IconConfig {
        self.state.borrow().config.clone()
    }

    pub fn last_box(&self) -> Option<ContainerBox> {
        self.state.borrow().last_box
    }

    pub fn is_mounted(&self) -> bool {
        self.element.is_some()
    }

    /// Strategy of the attached observer, if any.
    pub fn observer_strategy(&self) -> Option<ResizeStrategy> {
        self.observer.as_ref().map(SizeObserver::strategy)
    }

    /// Icon square inside the last observed box.
    pub fn icon_rect(&self) -> Option<IconRect> {
        let state = self.state.borrow();
        let content_box = state.last_box?;
        Some(place_icon(
            content_box,
            state.current.sizing,
            state.current.alignment,
            state.config.padding(),
        ))
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn sync_observer(&mut self) {
        let responsive = self.state.borrow().config.mode == SizingMode::Responsive;

        match (self.element.clone(), responsive) {
            (Some(element), true) if self.observer.is_none() => {
                let callback = self.box_callback();
                self.observer = Some(SizeObserver::attach(element, callback));
            }
            (_, false) => {
                if let Some(observer) = self.observer.take() {
                    observer.detach();
                }
            }
            _ => {}
        }
    }

    fn box_callback(&self) -> impl Fn(ContainerBox) + 'static {
        let state = Rc::clone(&self.state);
        let render = self.render.clone();
        move |content_box| {
            let next = state.borrow_mut().observe(content_box);
            render.set(next);
        }
    }

    fn publish(&self) -> RenderState {
        let next = self.state.borrow_mut().recompute();
        self.render.set(next);
        next
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::window;
    use crate::types::Placement;
    use spark_signals::effect;
    use std::cell::Cell;

    /// Element measured from a cell the test controls; window fallback only.
    struct CellElement(Rc<Cell<ContainerBox>>);

    impl HostElement for CellElement {
        fn measure(&self) -> ContainerBox {
            self.0.get()
        }
    }

    /// Element with native notifications.
    struct SignalElement(Signal<ContainerBox>);

    impl HostElement for SignalElement {
        fn measure(&self) -> ContainerBox {
            self.0.get()
        }

        fn resize_signal(&self) -> Option<Signal<ContainerBox>> {
            Some(self.0.clone())
        }
    }

    fn setup() {
        window::reset_window_state();
    }

    #[test]
    fn test_mount_measures_immediately() {
        setup();

        let mut widget = IconWidget::new(IconConfig::default().with_padding(10.0));
        let state = widget.on_mount(SignalElement(signal(ContainerBox::new(200.0, 100.0))));

        assert_eq!(state.sizing.dimension, 80.0);
        assert_eq!(state.alignment, AlignmentResult::CENTERED);
        assert_eq!(widget.observer_strategy(), Some(ResizeStrategy::Element));
        assert_eq!(widget.last_box(), Some(ContainerBox::new(200.0, 100.0)));
    }

    #[test]
    fn test_resize_recomputes() {
        setup();

        let size = signal(ContainerBox::new(100.0, 100.0));
        let mut widget = IconWidget::new(IconConfig::default());
        widget.on_mount(SignalElement(size.clone()));

        size.set(ContainerBox::new(300.0, 40.0));
        assert_eq!(widget.render_state().sizing.dimension, 40.0);
    }

    #[test]
    fn test_zero_box_keeps_previous_size() {
        setup();

        let size = signal(ContainerBox::new(64.0, 64.0));
        let mut widget = IconWidget::new(IconConfig::default());
        widget.on_mount(SignalElement(size.clone()));
        assert_eq!(widget.render_state().sizing.dimension, 64.0);

        size.set(ContainerBox::ZERO);
        assert_eq!(widget.render_state().sizing.dimension, 64.0);
        assert_eq!(widget.last_box(), Some(ContainerBox::ZERO));
    }

    #[test]
    fn test_mount_into_unlaid_out_element_has_no_size_yet() {
        setup();

        let mut widget = IconWidget::new(IconConfig::default());
        let state = widget.on_mount(SignalElement(signal(ContainerBox::ZERO)));
        assert_eq!(state.sizing.dimension, 0.0);
    }

    #[test]
    fn test_config_change_uses_last_box() {
        setup();

        let mut widget = IconWidget::new(IconConfig::default());
        widget.on_mount(SignalElement(signal(ContainerBox::new(200.0, 200.0))));

        let state = widget.on_config_changed(
            IconConfig::default()
                .with_icon_size(Some(50.0), Some(80.0))
                .with_alignment("bottom-right"),
        );
        assert_eq!(state.sizing.dimension, 50.0);
        assert_eq!(state.alignment.align, Placement::End);
        assert_eq!(state.alignment.justify, Placement::End);
    }

    #[test]
    fn test_config_change_before_mount() {
        setup();

        let mut widget = IconWidget::new(IconConfig::default());
        let state = widget.on_config_changed(IconConfig::default().with_alignment("top-left"));
        assert_eq!(state.sizing.dimension, 0.0);
        assert_eq!(state.alignment.align, Placement::Start);
        assert!(!widget.is_mounted());
    }

    #[test]
    fn test_window_fallback_mount() {
        setup();

        let size = Rc::new(Cell::new(ContainerBox::new(30.0, 30.0)));
        let mut widget = IconWidget::new(IconConfig::default().with_icon_size(Some(50.0), None));
        let state = widget.on_mount(CellElement(size.clone()));

        assert_eq!(widget.observer_strategy(), Some(ResizeStrategy::Window));
        assert_eq!(state.sizing.dimension, 30.0);

        size.set(ContainerBox::new(90.0, 70.0));
        window::dispatch_resize(120, 40);
        assert_eq!(widget.render_state().sizing.dimension, 50.0);
    }

    #[test]
    fn test_unmount_stops_updates() {
        setup();

        let size = signal(ContainerBox::new(100.0, 100.0));
        let mut widget = IconWidget::new(IconConfig::default());
        widget.on_mount(SignalElement(size.clone()));

        let state = widget.on_unmount();
        assert_eq!(state.sizing.dimension, 100.0);
        assert!(!widget.is_mounted());
        assert_eq!(widget.observer_strategy(), None);

        size.set(ContainerBox::new(10.0, 10.0));
        assert_eq!(widget.render_state().sizing.dimension, 100.0);

        // Idempotent
        widget.on_unmount();
        assert!(!widget.is_mounted());
    }

    #[test]
    fn test_static_mode_ignores_container() {
        setup();

        let size = Rc::new(Cell::new(ContainerBox::new(10.0, 10.0)));
        let mut widget = IconWidget::new(IconConfig::default().with_mode(SizingMode::Static));
        let state = widget.on_mount(CellElement(size));

        assert_eq!(state.sizing.dimension, 50.0);
        assert_eq!(widget.observer_strategy(), None);
        assert_eq!(window::listener_count(), 0);
    }

    #[test]
    fn test_mode_switch_attaches_and_detaches() {
        setup();

        let size = Rc::new(Cell::new(ContainerBox::new(20.0, 40.0)));
        let mut widget = IconWidget::new(IconConfig::default().with_mode(SizingMode::Static));
        widget.on_mount(CellElement(size));
        assert_eq!(widget.observer_strategy(), None);

        let state = widget.on_config_changed(IconConfig::default());
        assert_eq!(widget.observer_strategy(), Some(ResizeStrategy::Window));
        assert_eq!(state.sizing.dimension, 20.0);

        let state = widget.on_config_changed(IconConfig::default().with_mode(SizingMode::Static));
        assert_eq!(widget.observer_strategy(), None);
        assert_eq!(window::listener_count(), 0);
        assert_eq!(state.sizing.dimension, 50.0);
    }

    #[test]
    fn test_render_signal_follows_recomputation() {
        setup();

        let size = signal(ContainerBox::new(100.0, 100.0));
        let mut widget = IconWidget::new(IconConfig::default());
        widget.on_mount(SignalElement(size.clone()));

        let applied = Rc::new(Cell::new(0.0f32));
        let applied_clone = applied.clone();
        let render = widget.render_signal();
        let _stop = effect(move || {
            applied_clone.set(render.get().sizing.dimension);
        });
        assert_eq!(applied.get(), 100.0);

        size.set(ContainerBox::new(70.0, 90.0));
        assert_eq!(applied.get(), 70.0);

        widget.on_config_changed(IconConfig::default().with_padding(5.0));
        assert_eq!(applied.get(), 60.0);
    }

    #[test]
    fn test_icon_rect() {
        setup();

        let mut widget = IconWidget::new(
            IconConfig::default()
                .with_padding(10.0)
                .with_alignment("top-right"),
        );
        assert_eq!(widget.icon_rect(), None);

        widget.on_mount(SignalElement(signal(ContainerBox::new(200.0, 100.0))));
        let rect = widget.icon_rect().unwrap();
        assert_eq!(rect.size, 80.0);
        assert_eq!((rect.x, rect.y), (110.0, 10.0));
    }

    #[test]
    fn test_remount_replaces_observer() {
        setup();

        let first = Rc::new(Cell::new(ContainerBox::new(10.0, 10.0)));
        let second = Rc::new(Cell::new(ContainerBox::new(60.0, 60.0)));
        let mut widget = IconWidget::new(IconConfig::default());

        widget.on_mount(CellElement(first));
        let state = widget.on_mount(CellElement(second));

        assert_eq!(state.sizing.dimension, 60.0);
        assert_eq!(window::listener_count(), 1);
    }
}
