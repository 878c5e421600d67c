//! Display handle implementations. The crossterm backend is the default
//! terminal surface created by [`crate::App::run`] when none is attached;
//! the test backend is a scripted in-memory surface for exercising the
//! runtime without a terminal.

pub mod crossterm;
pub mod test;
