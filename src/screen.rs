use std::sync::Arc;

use crate::{Result, event::Event, geom::Expanse};

/// A handle to the live terminal surface. The runtime owns exactly one
/// current handle at a time (or none once torn down); it is replaced only
/// through the replacement protocol, which finalizes the old handle before
/// the new one becomes visible to the polling thread.
///
/// Implementations are shared across the dispatch and polling threads and
/// must synchronize internally. Handle identity is pointer identity on the
/// containing [`ScreenHandle`].
pub trait Screen: Send + Sync {
    /// Take control of the terminal. Called once before polling starts, and
    /// again on a replacement handle when it is installed.
    fn init(&self) -> Result<()>;

    /// Release the terminal, restoring it to a sane state. Must unblock a
    /// concurrent [`Screen::poll_event`] call, which then returns `None`.
    /// Finalizing an already-finalized handle is a no-op.
    fn fini(&self);

    /// Reversibly release the terminal so a child process can use it.
    fn suspend(&self) -> Result<()>;

    /// Undo a [`Screen::suspend`].
    fn resume(&self) -> Result<()>;

    /// Block until the next raw event. `None` means the handle was torn
    /// down externally and will produce no further events.
    fn poll_event(&self) -> Option<Event>;

    /// Current terminal dimensions.
    fn size(&self) -> Expanse;

    /// Erase the surface.
    fn clear(&self);

    /// Present everything drawn since the last show.
    fn show(&self);

    /// Prepare a full repaint of the surface, discarding any state the
    /// handle may have cached about what is already on screen.
    fn sync(&self);

    /// Start reporting mouse events.
    fn enable_mouse(&self);

    /// Stop reporting mouse events.
    fn disable_mouse(&self);

    /// Hide the terminal cursor.
    fn hide_cursor(&self);
}

/// Shared ownership of a display handle. Cheap to clone; cloning does not
/// duplicate the underlying terminal resource.
pub type ScreenHandle = Arc<dyn Screen>;
