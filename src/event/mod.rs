pub mod key;
pub mod mouse;

use crate::geom::Expanse;

/// This enum represents all the raw event types that drive the application.
/// They are produced by the polling thread (or injected with
/// [`crate::App::queue_event`]) and consumed by the dispatch thread.
#[derive(Debug, Clone)]
pub enum Event {
    /// A keystroke.
    Key(key::Key),
    /// A raw mouse report.
    Mouse(mouse::MouseEvent),
    /// Terminal resize.
    Resize(Expanse),
    /// Cut and paste.
    Paste(String),
    /// A fatal terminal I/O condition. Stops the run loop and is surfaced
    /// as the run's error.
    Error(String),
    /// Termination sentinel: ends the run loop cleanly.
    Terminate,
}
