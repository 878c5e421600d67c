//! The application coordinator: the single object that owns the display
//! handle, serializes all mutation of the component tree onto one dispatch
//! thread, and drives the draw cycle.
//!
//! Threading model: one polling thread blocks on the display handle and
//! republishes raw events into a bounded queue; arbitrary caller threads
//! enqueue mutation closures with [`App::queue_update`]; the dispatch
//! thread inside [`App::run`] is the only thread that reads or mutates the
//! component tree, moves focus, or triggers draws. Shared coordinator state
//! sits behind one reader/writer lock, and hooks are always invoked with
//! the lock released so they can re-enter the coordinator.

use std::{
    sync::{
        Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
    },
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, Sender, at, bounded, never, select};
use scopeguard::defer;
use tracing::{debug, trace};

use crate::{
    backend::crossterm::CrosstermScreen,
    error::{Error, Result},
    event::{
        Event, key,
        mouse::{self, GestureState, MouseAction, MouseEvent},
    },
    geom::{Expanse, Point, Rect},
    screen::{Screen, ScreenHandle},
    widget::{self, Component},
};

/// Capacity of the event and update queues. Publishing blocks when a queue
/// is full; this is the framework's only backpressure point on input.
const QUEUE_SIZE: usize = 100;

/// The minimum time between two consecutive resize-driven redraws.
const REDRAW_PAUSE: Duration = Duration::from_millis(50);

/// Key event capture hook: return the event to forward, or `None` to stop
/// processing.
pub type InputCaptureFn = Arc<dyn Fn(key::Key) -> Option<key::Key> + Send + Sync>;
/// Mouse capture hook: may rewrite the raw event and semantic action, or
/// suppress the action by returning `None` for the event.
pub type MouseCaptureFn =
    Arc<dyn Fn(MouseEvent, MouseAction) -> (Option<MouseEvent>, MouseAction) + Send + Sync>;
/// Invoked with the focus candidate before a focus change; return false to
/// keep the current focus.
pub type BeforeFocusFn = Arc<dyn Fn(&Component) -> bool + Send + Sync>;
/// Invoked after a focus change.
pub type AfterFocusFn = Arc<dyn Fn(&Component) + Send + Sync>;
/// Invoked before the root is drawn; return true to skip the tree draw.
pub type BeforeDrawFn = Arc<dyn Fn(&dyn Screen) -> bool + Send + Sync>;
/// Invoked after the root was drawn.
pub type AfterDrawFn = Arc<dyn Fn(&dyn Screen) + Send + Sync>;
/// Invoked after a resize was applied, before the redraw.
pub type AfterResizeFn = Arc<dyn Fn(&dyn Screen) + Send + Sync>;
/// Invoked for paste events.
pub type PasteFn = Arc<dyn Fn(&dyn Screen, &str) + Send + Sync>;

/// A deferred mutation queued by [`App::queue_update`]. If `done` is set it
/// receives exactly one message after `f` has executed.
struct Update {
    f: Box<dyn FnOnce() + Send>,
    done: Option<Sender<()>>,
}

/// Process-wide cancellation signal for one application run. Cancelling
/// drops the sender, which makes every `recv` select arm on the receiver
/// fire immediately and forever after.
struct Cancel {
    tx: Mutex<Option<Sender<()>>>,
    rx: Receiver<()>,
}

impl Cancel {
    fn new() -> Self {
        let (tx, rx) = bounded(0);
        Cancel {
            tx: Mutex::new(Some(tx)),
            rx,
        }
    }

    fn cancel(&self) {
        self.tx.lock().unwrap_or_else(PoisonError::into_inner).take();
    }

    fn is_cancelled(&self) -> bool {
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

/// Coordinator state behind the reader/writer lock. Hooks are cloned out
/// before invocation; they never run under the lock.
struct Shared {
    screen: Option<ScreenHandle>,
    root: Option<Component>,
    focus: Option<Component>,
    /// Resize the root to the screen dimensions on every draw.
    fullscreen: bool,
    mouse_enabled: bool,
    /// The component that captured the mouse: it receives all actions
    /// regardless of position until it releases capture.
    capturing: Option<Component>,
    double_click_interval: Duration,
    input_capture: Option<InputCaptureFn>,
    mouse_capture: Option<MouseCaptureFn>,
    before_focus: Option<BeforeFocusFn>,
    after_focus: Option<AfterFocusFn>,
    before_draw: Option<BeforeDrawFn>,
    after_draw: Option<AfterDrawFn>,
    after_resize: Option<AfterResizeFn>,
    on_paste: Option<PasteFn>,
}

impl Default for Shared {
    fn default() -> Self {
        Shared {
            screen: None,
            root: None,
            focus: None,
            fullscreen: false,
            mouse_enabled: false,
            capturing: None,
            double_click_interval: mouse::DOUBLE_CLICK_INTERVAL,
            input_capture: None,
            mouse_capture: None,
            before_focus: None,
            after_focus: None,
            before_draw: None,
            after_draw: None,
            after_resize: None,
            on_paste: None,
        }
    }
}

struct Inner {
    shared: RwLock<Shared>,
    cancel: Cancel,
    event_tx: Sender<Event>,
    event_rx: Receiver<Event>,
    update_tx: Sender<Update>,
    update_rx: Receiver<Update>,
    /// Single-slot handoff of a replacement handle to the polling thread.
    /// `None` signals stop.
    replace_tx: Sender<Option<ScreenHandle>>,
    replace_rx: Receiver<Option<ScreenHandle>>,
}

/// The coordinator handle. Cheap to clone; all clones refer to the same
/// application. Create one, attach or let [`App::run`] create a display
/// handle, set a root component, and call [`App::run`] on a dedicated
/// thread.
#[derive(Clone)]
pub struct App {
    inner: Arc<Inner>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        let (event_tx, event_rx) = bounded(QUEUE_SIZE);
        let (update_tx, update_rx) = bounded(QUEUE_SIZE);
        let (replace_tx, replace_rx) = bounded(1);
        App {
            inner: Arc::new(Inner {
                shared: RwLock::new(Shared::default()),
                cancel: Cancel::new(),
                event_tx,
                event_rx,
                update_tx,
                update_rx,
                replace_tx,
                replace_rx,
            }),
        }
    }

    // Lock poisoning is tolerated everywhere: a panicking dispatch thread
    // must still be able to tear the terminal down on its way out.
    fn shared(&self) -> RwLockReadGuard<'_, Shared> {
        self.inner.shared.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn shared_mut(&self) -> RwLockWriteGuard<'_, Shared> {
        self.inner
            .shared
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// The current display handle, if any.
    pub fn screen(&self) -> Option<ScreenHandle> {
        self.shared().screen.clone()
    }

    /// The root component, if one was set.
    pub fn root(&self) -> Option<Component> {
        self.shared().root.clone()
    }

    /// The component holding focus, if any.
    pub fn focused(&self) -> Option<Component> {
        self.shared().focus.clone()
    }

    /// Set the root component. With `fullscreen` set, the root is resized
    /// to the screen dimensions on every draw. Also moves focus to the
    /// root.
    pub fn set_root(&self, root: Component, fullscreen: bool) {
        let screen = {
            let mut sh = self.shared_mut();
            sh.root = Some(root.clone());
            sh.fullscreen = fullscreen;
            sh.screen.clone()
        };
        if let Some(screen) = screen {
            screen.clear();
        }
        self.set_focus(root);
    }

    /// Attach a display handle. Before the run loop starts this installs
    /// the handle directly; while running it triggers the replacement
    /// protocol: the old handle is finalized first, then the new one is
    /// handed to the polling thread, which initializes it, re-applies the
    /// mouse configuration and redraws.
    pub fn set_screen(&self, screen: ScreenHandle) {
        let old = {
            let mut sh = self.shared_mut();
            match &sh.screen {
                None => {
                    sh.screen = Some(screen);
                    return;
                }
                // Leave the old handle installed; the polling thread swaps
                // it on receipt so two live handles never coexist.
                Some(old) => old.clone(),
            }
        };
        debug!("replacing display handle");
        old.fini();
        self.send_replacement(Some(screen));
    }

    /// Enable or disable mouse event reporting. Applied to the current
    /// handle immediately and re-applied to replacement handles.
    pub fn enable_mouse(&self, enable: bool) {
        let mut sh = self.shared_mut();
        if enable != sh.mouse_enabled {
            if let Some(screen) = &sh.screen {
                if enable {
                    screen.enable_mouse();
                } else {
                    screen.disable_mouse();
                }
            }
        }
        sh.mouse_enabled = enable;
    }

    /// Set the maximum gap between a click and the next press at the same
    /// position for the pair to count as a double click.
    pub fn set_double_click_interval(&self, interval: Duration) {
        self.shared_mut().double_click_interval = interval;
    }

    pub fn double_click_interval(&self) -> Duration {
        self.shared().double_click_interval
    }

    /// Start the application: install a default display handle if none is
    /// attached, draw once, then enter the dispatch loop until [`App::stop`]
    /// or a fatal terminal condition. Handle initialization failure is
    /// returned without starting the loop.
    ///
    /// On every exit path - panics included - the current display handle is
    /// finalized so the terminal is left in a sane state.
    pub fn run(&self) -> Result<()> {
        {
            let mut sh = self.shared_mut();
            if sh.screen.is_none() {
                let screen: ScreenHandle = Arc::new(CrosstermScreen::new());
                screen.init()?;
                if sh.mouse_enabled {
                    screen.enable_mouse();
                }
                sh.screen = Some(screen);
            }
        }
        debug!("run loop starting");
        self.draw_now();

        let result = thread::scope(|s| {
            defer! {
                self.inner.cancel.cancel();
                let screen = self.shared_mut().screen.take();
                if let Some(screen) = screen {
                    screen.fini();
                }
            }
            s.spawn(|| self.poll_events());
            self.dispatch()
        });

        // Release anything still parked in the queues so late completion
        // signals are dropped and blocked producers bail out.
        while self.inner.update_rx.try_recv().is_ok() {}
        while self.inner.event_rx.try_recv().is_ok() {}
        while self.inner.replace_rx.try_recv().is_ok() {}
        debug!("run loop finished");
        result
    }

    /// Stop the application, causing [`App::run`] to return. The current
    /// handle is finalized before the polling thread is told to shut down.
    pub fn stop(&self) {
        let screen = self.shared_mut().screen.take();
        let Some(screen) = screen else {
            return;
        };
        debug!("stop requested");
        screen.fini();
        self.send_replacement(None);
    }

    /// Cancel the run and unblock every queued producer. Safe to call at
    /// any time, including after the run loop already terminated.
    pub fn close(&self) {
        self.inner.cancel.cancel();
        while self.inner.update_rx.try_recv().is_ok() {}
        while self.inner.event_rx.try_recv().is_ok() {}
        while self.inner.replace_rx.try_recv().is_ok() {}
    }

    /// Temporarily suspend the application so `f` can use the terminal
    /// (e.g. to spawn an editor). Returns false without running `f` if no
    /// handle is active. If the handle identity changed while `f` ran - a
    /// hot swap or a stop happened during suspension - the suspended handle
    /// is finalized instead of resumed.
    pub fn suspend<F: FnOnce()>(&self, f: F) -> bool {
        let Some(screen) = self.screen() else {
            return false;
        };
        if screen.suspend().is_err() {
            return false;
        }

        f();

        match self.screen() {
            Some(current) if Arc::ptr_eq(&current, &screen) => {
                let _ = screen.resume();
            }
            _ => screen.fini(),
        }
        true
    }

    /// Queue a deferred mutation for execution on the dispatch thread.
    /// This is the only safe way for other threads to touch the component
    /// tree. Blocks while the queue is full; a no-op once the run loop has
    /// terminated. Draw is not implied - see [`App::queue_update_draw`].
    pub fn queue_update<F: FnOnce() + Send + 'static>(&self, f: F) {
        self.queue(Update {
            f: Box::new(f),
            done: None,
        });
    }

    /// Like [`App::queue_update`], but blocks the caller until `f` has
    /// executed. Never call this from the dispatch thread itself: the
    /// dispatch thread cannot drain the queue while it is parked here.
    pub fn queue_update_wait<F: FnOnce() + Send + 'static>(&self, f: F) {
        let (tx, rx) = bounded(1);
        self.queue(Update {
            f: Box::new(f),
            done: Some(tx),
        });
        // The update may have been dropped unexecuted, or parked in the
        // queue by an enqueue that raced shutdown. The cancellation arm
        // keeps the caller from blocking on a completion signal nobody
        // will ever send.
        select! {
            recv(rx) -> _ => {}
            recv(self.inner.cancel.rx) -> _ => {}
        }
    }

    /// Queue a mutation followed by an immediate redraw.
    pub fn queue_update_draw<F: FnOnce() + Send + 'static>(&self, f: F) {
        let app = self.clone();
        self.queue_update(move || {
            f();
            app.draw_now();
        });
    }

    /// Inject a raw event into the dispatch loop, as if the display handle
    /// had produced it. A no-op once the run loop has terminated.
    pub fn queue_event(&self, ev: Event) {
        self.send_event(ev);
    }

    /// Refresh the screen during the next update cycle.
    pub fn draw(&self) {
        let app = self.clone();
        self.queue_update(move || app.draw_now());
    }

    /// Refresh the screen immediately. Safe from queued updates and event
    /// handlers; other threads should use [`App::draw`] instead.
    pub fn force_draw(&self) {
        self.draw_now();
    }

    /// Force a full re-sync of the surface during the next update cycle,
    /// for when the terminal got corrupted by outside writes.
    pub fn sync(&self) {
        let app = self.clone();
        self.queue_update(move || {
            let Some(screen) = app.screen() else { return };
            screen.sync();
            app.draw_now();
        });
    }

    /// Move focus to a component. The before-focus hook may veto the
    /// change; otherwise the previous focus is blurred, the new focus
    /// installed, the cursor hidden, and the component's focus entry point
    /// invoked with a callback it may use to redirect focus elsewhere.
    /// Hooks and component callbacks run outside the state lock, so
    /// re-entrant focus changes are safe.
    pub fn set_focus(&self, p: Component) {
        let before = self.shared().before_focus.clone();
        if let Some(hook) = before {
            if !hook(&p) {
                return;
            }
        }

        let prev = self.shared_mut().focus.take();
        if let Some(prev) = prev {
            prev.blur();
        }

        let (screen, after) = {
            let mut sh = self.shared_mut();
            sh.focus = Some(p.clone());
            (sh.screen.clone(), sh.after_focus.clone())
        };
        if let Some(screen) = screen {
            screen.hide_cursor();
        }
        if let Some(hook) = after {
            hook(&p);
        }

        p.focus(&mut |next| self.set_focus(next));
    }

    /// Locate the deepest visible component whose bounds contain the
    /// point, or `None` if the point misses the tree.
    pub fn component_at(&self, x: i32, y: i32) -> Option<Component> {
        let root = self.root()?;
        widget::component_at(&root, Point::new(x, y))
    }

    pub fn set_input_capture(&self, f: Option<InputCaptureFn>) {
        self.shared_mut().input_capture = f;
    }

    pub fn input_capture(&self) -> Option<InputCaptureFn> {
        self.shared().input_capture.clone()
    }

    pub fn set_mouse_capture(&self, f: Option<MouseCaptureFn>) {
        self.shared_mut().mouse_capture = f;
    }

    pub fn mouse_capture(&self) -> Option<MouseCaptureFn> {
        self.shared().mouse_capture.clone()
    }

    pub fn set_before_focus(&self, f: Option<BeforeFocusFn>) {
        self.shared_mut().before_focus = f;
    }

    pub fn before_focus(&self) -> Option<BeforeFocusFn> {
        self.shared().before_focus.clone()
    }

    pub fn set_after_focus(&self, f: Option<AfterFocusFn>) {
        self.shared_mut().after_focus = f;
    }

    pub fn after_focus(&self) -> Option<AfterFocusFn> {
        self.shared().after_focus.clone()
    }

    pub fn set_before_draw(&self, f: Option<BeforeDrawFn>) {
        self.shared_mut().before_draw = f;
    }

    pub fn before_draw(&self) -> Option<BeforeDrawFn> {
        self.shared().before_draw.clone()
    }

    pub fn set_after_draw(&self, f: Option<AfterDrawFn>) {
        self.shared_mut().after_draw = f;
    }

    pub fn after_draw(&self) -> Option<AfterDrawFn> {
        self.shared().after_draw.clone()
    }

    pub fn set_after_resize(&self, f: Option<AfterResizeFn>) {
        self.shared_mut().after_resize = f;
    }

    pub fn after_resize(&self) -> Option<AfterResizeFn> {
        self.shared().after_resize.clone()
    }

    pub fn set_on_paste(&self, f: Option<PasteFn>) {
        self.shared_mut().on_paste = f;
    }

    pub fn on_paste(&self) -> Option<PasteFn> {
        self.shared().on_paste.clone()
    }

    /// Push an update, bailing out if the run is cancelled rather than
    /// blocking forever on a full queue nobody drains.
    fn queue(&self, up: Update) {
        if self.inner.cancel.is_cancelled() {
            return;
        }
        select! {
            send(self.inner.update_tx, up) -> _ => {}
            recv(self.inner.cancel.rx) -> _ => {}
        }
    }

    fn send_event(&self, ev: Event) {
        if self.inner.cancel.is_cancelled() {
            return;
        }
        select! {
            send(self.inner.event_tx, ev) -> _ => {}
            recv(self.inner.cancel.rx) -> _ => {}
        }
    }

    fn send_replacement(&self, screen: Option<ScreenHandle>) {
        if self.inner.cancel.is_cancelled() {
            return;
        }
        select! {
            send(self.inner.replace_tx, screen) -> _ => {}
            recv(self.inner.cancel.rx) -> _ => {}
        }
    }

    /// Body of the event ingestion thread: block on the display handle and
    /// republish its events. When the handle goes away, wait on the
    /// replacement slot: a new handle is installed, initialized and drawn;
    /// `None` (or cancellation) ends the run.
    fn poll_events(&self) {
        while !self.inner.cancel.is_cancelled() {
            let screen = self.screen();
            let Some(screen) = screen else {
                // Unexpected handle loss; end the run cleanly.
                self.send_event(Event::Terminate);
                break;
            };

            if let Some(ev) = screen.poll_event() {
                self.send_event(ev);
                continue;
            }

            // The handle was finalized. Wait for a replacement.
            select! {
                recv(self.inner.cancel.rx) -> _ => break,
                recv(self.inner.replace_rx) -> msg => match msg {
                    Ok(Some(new)) => {
                        let mouse_enabled = {
                            let mut sh = self.shared_mut();
                            sh.screen = Some(new.clone());
                            sh.mouse_enabled
                        };
                        if let Err(e) = new.init() {
                            self.send_event(Event::Error(e.to_string()));
                            break;
                        }
                        if mouse_enabled {
                            new.enable_mouse();
                        }
                        debug!("replacement handle installed");
                        self.draw_now();
                    }
                    Ok(None) | Err(_) => {
                        self.send_event(Event::Terminate);
                        break;
                    }
                },
            }
        }
        trace!("event ingestion thread exiting");
    }

    /// The dispatch loop: the select over the event queue, the update
    /// queue, the cancellation signal, and the resize debounce deadline.
    fn dispatch(&self) -> Result<()> {
        let mut gesture = GestureState::new(self.double_click_interval());
        let mut last_redraw = Instant::now();
        let mut pending_resize: Option<(Instant, Expanse)> = None;
        let mut app_err: Option<Error> = None;

        loop {
            let deadline = match pending_resize {
                Some((t, _)) => at(t),
                None => never(),
            };
            select! {
                recv(self.inner.cancel.rx) -> _ => break,
                recv(deadline) -> _ => {
                    // Deferred re-delivery of the most recent resize.
                    if let Some((_, size)) = pending_resize.take() {
                        self.handle_resize(size, &mut last_redraw);
                    }
                }
                recv(self.inner.event_rx) -> ev => {
                    let Ok(ev) = ev else { break };
                    match ev {
                        Event::Terminate => break,
                        Event::Key(k) => self.handle_key(k),
                        Event::Paste(text) => self.handle_paste(&text),
                        Event::Mouse(m) => self.handle_mouse(&mut gesture, m),
                        Event::Resize(size) => {
                            if last_redraw.elapsed() < REDRAW_PAUSE {
                                // Coalesce: one deferred redraw at the end
                                // of the debounce window, carrying the most
                                // recent size.
                                pending_resize = Some((last_redraw + REDRAW_PAUSE, size));
                            } else {
                                pending_resize = None;
                                self.handle_resize(size, &mut last_redraw);
                            }
                        }
                        Event::Error(msg) => {
                            app_err = Some(Error::Terminal(msg));
                            self.stop();
                        }
                    }
                }
                recv(self.inner.update_rx) -> up => {
                    let Ok(up) = up else { break };
                    (up.f)();
                    if let Some(done) = up.done {
                        let _ = done.send(());
                    }
                }
            }
        }

        match app_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn handle_key(&self, k: key::Key) {
        let (root, capture) = {
            let sh = self.shared();
            (sh.root.clone(), sh.input_capture.clone())
        };

        let mut draw = false;
        let k = match capture {
            Some(capture) => {
                draw = true;
                match capture(k) {
                    Some(k) => k,
                    None => {
                        self.draw_now();
                        return;
                    }
                }
            }
            None => k,
        };

        // Ctrl-C closes the application unless the capture hook rewrote it.
        if k == key::Ctrl + 'c' {
            self.stop();
            return;
        }

        if let Some(root) = root {
            if root.has_focus() && root.handle_key(k, &mut |next| self.set_focus(next)) {
                draw = true;
            }
        }

        if draw {
            self.draw_now();
        }
    }

    fn handle_paste(&self, text: &str) {
        let (screen, hook) = {
            let sh = self.shared();
            (sh.screen.clone(), sh.on_paste.clone())
        };
        if let (Some(screen), Some(hook)) = (screen, hook) {
            hook(&*screen, text);
        }
    }

    fn handle_resize(&self, size: Expanse, last_redraw: &mut Instant) {
        trace!(?size, "resize");
        let (screen, hook) = {
            let sh = self.shared();
            (sh.screen.clone(), sh.after_resize.clone())
        };
        let Some(screen) = screen else { return };
        *last_redraw = Instant::now();
        screen.clear();
        if let Some(hook) = hook {
            hook(&*screen);
        }
        self.draw_now();
    }

    /// Recognize the semantic actions for one raw mouse sample and route
    /// each of them: through the mouse capture hook first, then to the
    /// capturing component if any, else to the target a previous action of
    /// this sample was routed to, else to the root. Whatever the handler
    /// returns replaces the capturing component, including `None`.
    fn handle_mouse(&self, gesture: &mut GestureState, ev: MouseEvent) {
        gesture.double_click_interval = self.double_click_interval();
        let actions = mouse::recognize(gesture, &ev, Instant::now());

        let mut consumed = false;
        let mut saw_down = false;
        // Relay follow-up actions of this sample to the same component.
        let mut target: Option<Component> = None;
        // The capture hook may rewrite the event for the rest of the sample.
        let mut cur = ev;

        for action in actions {
            if action.is_down() {
                saw_down = true;
            }

            let hook = self.shared().mouse_capture.clone();
            let action = match hook {
                Some(hook) => match hook(cur, action) {
                    (Some(rewritten), action) => {
                        cur = rewritten;
                        action
                    }
                    (None, _) => {
                        consumed = true;
                        continue;
                    }
                },
                None => action,
            };

            let (capturing, root) = {
                let sh = self.shared();
                (sh.capturing.clone(), sh.root.clone())
            };
            let primitive = match capturing {
                Some(c) => {
                    target = Some(c.clone());
                    Some(c)
                }
                None => target.clone().or(root),
            };

            let mut new_capture = None;
            if let Some(p) = primitive {
                let (was_consumed, capture) =
                    p.handle_mouse(action, &cur, &mut |next| self.set_focus(next));
                if was_consumed {
                    consumed = true;
                }
                new_capture = capture;
            }
            self.shared_mut().capturing = new_capture;
        }

        if saw_down {
            gesture.down_pos = ev.position;
        }
        if consumed {
            self.draw_now();
        }
    }

    /// The draw cycle. Snapshots state under the read lock, then runs with
    /// no lock held: resize the root if fullscreen, let the before-draw
    /// hook short-circuit, draw the tree, run the after-draw hook, present.
    fn draw_now(&self) {
        let (screen, root, fullscreen, before, after) = {
            let sh = self.shared();
            (
                sh.screen.clone(),
                sh.root.clone(),
                sh.fullscreen,
                sh.before_draw.clone(),
                sh.after_draw.clone(),
            )
        };
        let (Some(screen), Some(root)) = (screen, root) else {
            return;
        };

        if fullscreen {
            let size = screen.size();
            root.set_rect(Rect::new(0, 0, size.w, size.h));
        }

        if let Some(before) = before {
            if before(&*screen) {
                screen.show();
                return;
            }
        }

        root.draw(&*screen);

        if let Some(after) = after {
            after(&*screen);
        }

        screen.show();
    }
}
