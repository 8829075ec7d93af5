//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background task that
//! forwards them over a channel, so the main loop handles exactly one event at
//! a time without blocking on the terminal.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}

impl AppEvent {
    fn from_crossterm(ev: CtEvent) -> Option<Self> {
        match ev {
            // Release/repeat events would double every keystroke on
            // terminals that report them.
            CtEvent::Key(k) if k.kind == KeyEventKind::Press => Some(AppEvent::Key(k)),
            CtEvent::Mouse(m) => Some(AppEvent::Mouse(m)),
            CtEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            _ => None,
        }
    }
}

/// Spawns a background task that polls the terminal for events and sends them
/// through the returned channel.
pub fn spawn_event_reader(tick_rate: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || {
        loop {
            // Poll with the tick rate so Tick events flow while idle.
            let next = match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(ev) => AppEvent::from_crossterm(ev),
                    Err(err) => {
                        tracing::warn!("terminal read failed: {err}");
                        None
                    }
                },
                Ok(false) => Some(AppEvent::Tick),
                Err(err) => {
                    tracing::warn!("terminal poll failed: {err}");
                    break;
                }
            };
            if let Some(app_event) = next {
                if tx.send(app_event).is_err() {
                    break; // receiver dropped
                }
            }
        }
    });

    rx
}
