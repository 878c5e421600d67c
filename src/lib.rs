//! The runtime core for terminal applications: a coordinator that owns the
//! terminal surface, turns raw input into semantic events, serializes all
//! component-tree mutation onto one dispatch thread, and manages focus,
//! redraw and the display handle lifecycle.
//!
//! The central type is [`App`]. Attach a display handle (or let [`App::run`]
//! create the default crossterm one), set a root [`Component`], and call
//! [`App::run`]. Other threads interact with the running application
//! exclusively through queued closures ([`App::queue_update`]) and injected
//! events ([`App::queue_event`]).

mod app;
#[cfg(test)]
mod tutils;

pub mod backend;
pub mod error;
pub mod event;
pub mod geom;
pub mod screen;
pub mod widget;

pub use app::{
    AfterDrawFn, AfterFocusFn, AfterResizeFn, App, BeforeDrawFn, BeforeFocusFn, InputCaptureFn,
    MouseCaptureFn, PasteFn,
};
pub use error::{Error, Result};
pub use event::Event;
pub use screen::{Screen, ScreenHandle};
pub use widget::{Component, RequestFocus, Widget, component_at};
