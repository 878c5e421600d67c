//! Test utilities: a recording widget for exercising dispatch, focus and
//! mouse routing without real components.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use crate::{
    event::{
        key::Key,
        mouse::{MouseAction, MouseEvent},
    },
    geom::Rect,
    screen::Screen,
    widget::{Component, RequestFocus, Widget},
};

/// A widget that records every capability call made on it.
pub struct LogWidget {
    name: String,
    log: Arc<Mutex<Vec<String>>>,
    rect: Mutex<Rect>,
    visible: AtomicBool,
    focused: AtomicBool,
    children: Mutex<Vec<Component>>,
    /// Consume key events when set.
    handle_keys: AtomicBool,
    /// Report mouse actions as consumed when set.
    consume_mouse: AtomicBool,
    /// Returned as the capturing component from every mouse handler call.
    capture: Mutex<Option<Component>>,
    /// Focus is redirected here when set.
    redirect: Mutex<Option<Component>>,
}

impl LogWidget {
    pub fn arc(name: &str) -> Arc<Self> {
        Arc::new(LogWidget {
            name: name.into(),
            log: Arc::default(),
            rect: Mutex::new(Rect::default()),
            visible: AtomicBool::new(true),
            focused: AtomicBool::new(false),
            children: Mutex::new(Vec::new()),
            handle_keys: AtomicBool::new(false),
            consume_mouse: AtomicBool::new(false),
            capture: Mutex::new(None),
            redirect: Mutex::new(None),
        })
    }

    pub fn entries(&self) -> Vec<String> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn add_child(&self, c: Component) {
        self.children.lock().unwrap().push(c);
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    pub fn set_handle_keys(&self, on: bool) {
        self.handle_keys.store(on, Ordering::SeqCst);
    }

    pub fn set_consume_mouse(&self, on: bool) {
        self.consume_mouse.store(on, Ordering::SeqCst);
    }

    pub fn set_capture(&self, c: Option<Component>) {
        *self.capture.lock().unwrap() = c;
    }

    pub fn set_redirect(&self, c: Option<Component>) {
        *self.redirect.lock().unwrap() = c;
    }

    fn record(&self, entry: String) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

impl Widget for LogWidget {
    fn draw(&self, _screen: &dyn Screen) {
        self.record("draw".into());
    }

    fn rect(&self) -> Rect {
        *self.rect.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_rect(&self, rect: Rect) {
        *self.rect.lock().unwrap_or_else(PoisonError::into_inner) = rect;
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    fn handle_key(&self, key: Key, _request: &mut RequestFocus) -> bool {
        if !self.handle_keys.load(Ordering::SeqCst) {
            return false;
        }
        self.record(format!("key:{:?}", key.code));
        true
    }

    fn handle_mouse(
        &self,
        action: MouseAction,
        _event: &MouseEvent,
        _request: &mut RequestFocus,
    ) -> (bool, Option<Component>) {
        self.record(format!("mouse:{action:?}"));
        (
            self.consume_mouse.load(Ordering::SeqCst),
            self.capture.lock().unwrap().clone(),
        )
    }

    fn focus(&self, request: &mut RequestFocus) {
        self.focused.store(true, Ordering::SeqCst);
        self.record("focus".into());
        let redirect = self.redirect.lock().unwrap().clone();
        if let Some(target) = redirect {
            request(target);
        }
    }

    fn blur(&self) {
        self.focused.store(false, Ordering::SeqCst);
        self.record("blur".into());
    }

    fn has_focus(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }

    fn children(&self, f: &mut dyn FnMut(&Component)) {
        for c in self.children.lock().unwrap().iter() {
            f(c);
        }
    }
}

impl std::fmt::Debug for LogWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogWidget({})", self.name)
    }
}
