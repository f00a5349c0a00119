//! Terminal Icon Demo - An icon that follows the terminal size
//!
//! Lays out a half-width container with Taffy, mounts an icon widget into it,
//! and prints the icon's size and position whenever the terminal is resized.
//! Press `q` to quit.
//!
//! Run with: cargo run --example terminal_icon

use std::io;
use std::time::Duration;

use crossterm::event::{poll, read, Event, KeyCode};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use spark_icon::{window, IconConfig, IconWidget, TaffyHost};
use spark_signals::effect;
use taffy::{Dimension, LengthPercentage, Rect, Size, Style};

fn main() -> io::Result<()> {
    window::detect();
    let (width, height) = window::window_size();

    let host = TaffyHost::new().map_err(io::Error::other)?;
    let container = host
        .add_node(
            host.root(),
            Style {
                size: Size {
                    width: Dimension::Percent(0.5),
                    height: Dimension::Percent(1.0),
                },
                padding: Rect {
                    left: LengthPercentage::Length(1.0),
                    right: LengthPercentage::Length(1.0),
                    top: LengthPercentage::Length(1.0),
                    bottom: LengthPercentage::Length(1.0),
                },
                ..Default::default()
            },
        )
        .map_err(io::Error::other)?;
    host.compute(width as f32, height as f32)
        .map_err(io::Error::other)?;
    let stop_following = host.follow_window();

    let config = IconConfig::default()
        .with_alignment("bottom-right")
        .with_icon_size(Some(12.0), None);
    let mut widget = IconWidget::new(config);
    widget.on_mount(host.element(container));

    let render = widget.render_signal();
    let stop_printing = effect(move || {
        let state = render.get();
        print!(
            "icon {}x{} aligned {:?}/{:?}\r\n",
            state.sizing.dimension,
            state.sizing.dimension,
            state.alignment.align,
            state.alignment.justify
        );
    });

    enable_raw_mode()?;
    loop {
        if !poll(Duration::from_millis(50))? {
            continue;
        }
        match read()? {
            Event::Key(key) if key.code == KeyCode::Char('q') => break,
            event => {
                window::route_event(&event);
            }
        }
    }
    disable_raw_mode()?;

    stop_printing();
    widget.on_unmount();
    stop_following();
    Ok(())
}
