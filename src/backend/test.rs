//! A scripted in-memory display handle. Tests feed it raw events and then
//! inspect the ordered log of operations the runtime performed on it.

use std::sync::{Arc, Mutex, PoisonError};

use crossbeam_channel::{Receiver, Sender, select, unbounded};

use crate::{
    Result,
    event::Event,
    geom::Expanse,
    screen::Screen,
};

/// An ordered log of display-handle operations, shareable between several
/// test screens so cross-handle ordering (e.g. the replacement protocol)
/// can be asserted.
pub type OpLog = Arc<Mutex<Vec<String>>>;

/// A display handle for testing. Events pushed with [`TestScreen::send`]
/// are returned from `poll_event` in order; `fini` unblocks a pending poll.
pub struct TestScreen {
    prefix: String,
    ops: OpLog,
    size: Mutex<Expanse>,
    event_tx: Sender<Event>,
    event_rx: Receiver<Event>,
    // Dropping the sender unblocks poll_event, which then reports teardown.
    closed_tx: Mutex<Option<Sender<()>>>,
    closed_rx: Receiver<()>,
}

impl TestScreen {
    pub fn new() -> Arc<Self> {
        Self::with_log("", Arc::default())
    }

    /// Create a screen whose operations are recorded into a shared log,
    /// each entry prefixed with `prefix`.
    pub fn with_log(prefix: &str, ops: OpLog) -> Arc<Self> {
        let (event_tx, event_rx) = unbounded();
        let (closed_tx, closed_rx) = crossbeam_channel::bounded(0);
        Arc::new(TestScreen {
            prefix: if prefix.is_empty() {
                String::new()
            } else {
                format!("{prefix}.")
            },
            ops,
            size: Mutex::new(Expanse::new(80, 24)),
            event_tx,
            event_rx,
            closed_tx: Mutex::new(Some(closed_tx)),
            closed_rx,
        })
    }

    /// Feed a raw event to a pending or future `poll_event`.
    pub fn send(&self, ev: Event) {
        let _ = self.event_tx.send(ev);
    }

    pub fn set_size(&self, size: Expanse) {
        *self.size.lock().unwrap() = size;
    }

    /// Snapshot of the operation log (prefixes included).
    pub fn ops(&self) -> Vec<String> {
        self.ops.lock().unwrap().clone()
    }

    /// How many times the named operation was recorded on this screen.
    pub fn op_count(&self, name: &str) -> usize {
        let entry = format!("{}{name}", self.prefix);
        self.ops.lock().unwrap().iter().filter(|o| **o == entry).count()
    }

    fn op(&self, name: &str) {
        self.ops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{}{name}", self.prefix));
    }
}

impl Screen for TestScreen {
    fn init(&self) -> Result<()> {
        self.op("init");
        Ok(())
    }

    fn fini(&self) {
        if self.closed_tx.lock().unwrap_or_else(PoisonError::into_inner).take().is_some() {
            self.op("fini");
        }
    }

    fn suspend(&self) -> Result<()> {
        self.op("suspend");
        Ok(())
    }

    fn resume(&self) -> Result<()> {
        self.op("resume");
        Ok(())
    }

    fn poll_event(&self) -> Option<Event> {
        select! {
            recv(self.event_rx) -> ev => ev.ok(),
            recv(self.closed_rx) -> _ => None,
        }
    }

    fn size(&self) -> Expanse {
        *self.size.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn clear(&self) {
        self.op("clear");
    }

    fn show(&self) {
        self.op("show");
    }

    fn sync(&self) {
        self.op("sync");
    }

    fn enable_mouse(&self) {
        self.op("enable_mouse");
    }

    fn disable_mouse(&self) {
        self.op("disable_mouse");
    }

    fn hide_cursor(&self) {
        self.op("hide_cursor");
    }
}
