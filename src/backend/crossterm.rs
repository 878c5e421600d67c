use std::{
    io::{self, Write},
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use crossterm::{ExecutableCommand, cursor as ccursor, event as cevent, terminal};

use crate::{
    Result,
    event::{Event, key, mouse},
    geom::{Expanse, Point},
    screen::Screen,
};

/// How often the poll loop wakes up to check for teardown while no input is
/// pending.
const POLL_TICK: Duration = Duration::from_millis(50);

fn translate_mods(mods: cevent::KeyModifiers) -> key::Mods {
    key::Mods {
        shift: mods.contains(cevent::KeyModifiers::SHIFT),
        ctrl: mods.contains(cevent::KeyModifiers::CONTROL),
        alt: mods.contains(cevent::KeyModifiers::ALT),
    }
}

fn translate_button(b: cevent::MouseButton) -> mouse::Buttons {
    match b {
        cevent::MouseButton::Left => mouse::Buttons::PRIMARY,
        cevent::MouseButton::Middle => mouse::Buttons::MIDDLE,
        cevent::MouseButton::Right => mouse::Buttons::SECONDARY,
    }
}

fn translate_key(k: cevent::KeyEvent) -> Event {
    Event::Key(key::Key {
        mods: translate_mods(k.modifiers),
        code: match k.code {
            cevent::KeyCode::Backspace => key::KeyCode::Backspace,
            cevent::KeyCode::Enter => key::KeyCode::Enter,
            cevent::KeyCode::Left => key::KeyCode::Left,
            cevent::KeyCode::Right => key::KeyCode::Right,
            cevent::KeyCode::Up => key::KeyCode::Up,
            cevent::KeyCode::Down => key::KeyCode::Down,
            cevent::KeyCode::Home => key::KeyCode::Home,
            cevent::KeyCode::End => key::KeyCode::End,
            cevent::KeyCode::PageUp => key::KeyCode::PageUp,
            cevent::KeyCode::PageDown => key::KeyCode::PageDown,
            cevent::KeyCode::Tab => key::KeyCode::Tab,
            cevent::KeyCode::BackTab => key::KeyCode::BackTab,
            cevent::KeyCode::Delete => key::KeyCode::Delete,
            cevent::KeyCode::Insert => key::KeyCode::Insert,
            cevent::KeyCode::F(x) => key::KeyCode::F(x),
            cevent::KeyCode::Char(c) => key::KeyCode::Char(c),
            cevent::KeyCode::Esc => key::KeyCode::Esc,
            _ => key::KeyCode::Null,
        },
    })
}

/// The default display handle, backed by crossterm on stderr: raw mode plus
/// the alternate screen, with mouse capture and bracketed paste opt-in.
///
/// Crossterm reports button transitions rather than a button bitmask, so
/// the translation layer accumulates the held-button state itself and
/// synthesizes the mask the gesture recognizer expects; wheel bits are set
/// only on the report that scrolled.
pub struct CrosstermScreen {
    fp: Mutex<io::Stderr>,
    closed: AtomicBool,
    suspended: AtomicBool,
    buttons: Mutex<mouse::Buttons>,
}

impl CrosstermScreen {
    pub fn new() -> Self {
        CrosstermScreen {
            fp: Mutex::new(io::stderr()),
            closed: AtomicBool::new(false),
            suspended: AtomicBool::new(false),
            buttons: Mutex::new(mouse::Buttons::empty()),
        }
    }

    fn writer(&self) -> MutexGuard<'_, io::Stderr> {
        self.fp.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enter(&self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut fp = self.writer();
        fp.execute(terminal::EnterAlternateScreen)?;
        fp.execute(cevent::EnableBracketedPaste)?;
        fp.execute(ccursor::Hide)?;
        Ok(())
    }

    fn exit(&self) -> io::Result<()> {
        {
            let mut fp = self.writer();
            fp.execute(terminal::LeaveAlternateScreen)?;
            fp.execute(cevent::DisableBracketedPaste)?;
            fp.execute(cevent::DisableMouseCapture)?;
            fp.execute(ccursor::Show)?;
        }
        terminal::disable_raw_mode()
    }

    fn translate_mouse(&self, m: cevent::MouseEvent) -> Event {
        let mut held = self.buttons.lock().unwrap_or_else(PoisonError::into_inner);
        match m.kind {
            cevent::MouseEventKind::Down(b) => held.insert(translate_button(b)),
            cevent::MouseEventKind::Up(b) => held.remove(translate_button(b)),
            _ => {}
        }
        let mut mask = *held;
        match m.kind {
            cevent::MouseEventKind::ScrollUp => mask.insert(mouse::Buttons::WHEEL_UP),
            cevent::MouseEventKind::ScrollDown => mask.insert(mouse::Buttons::WHEEL_DOWN),
            cevent::MouseEventKind::ScrollLeft => mask.insert(mouse::Buttons::WHEEL_LEFT),
            cevent::MouseEventKind::ScrollRight => mask.insert(mouse::Buttons::WHEEL_RIGHT),
            _ => {}
        }
        Event::Mouse(mouse::MouseEvent {
            position: Point::new(m.column as i32, m.row as i32),
            buttons: mask,
            mods: translate_mods(m.modifiers),
        })
    }

    fn translate(&self, e: cevent::Event) -> Option<Event> {
        match e {
            cevent::Event::Key(k) if k.kind != cevent::KeyEventKind::Release => {
                Some(translate_key(k))
            }
            cevent::Event::Mouse(m) => Some(self.translate_mouse(m)),
            cevent::Event::Resize(w, h) => Some(Event::Resize(Expanse::new(w as u32, h as u32))),
            cevent::Event::Paste(s) => Some(Event::Paste(s)),
            // Key releases and terminal focus changes don't drive anything.
            _ => None,
        }
    }
}

impl Default for CrosstermScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for CrosstermScreen {
    fn init(&self) -> Result<()> {
        self.closed.store(false, Ordering::SeqCst);
        self.enter()?;
        Ok(())
    }

    fn fini(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.exit();
    }

    fn suspend(&self) -> Result<()> {
        self.suspended.store(true, Ordering::SeqCst);
        self.exit()?;
        Ok(())
    }

    fn resume(&self) -> Result<()> {
        self.enter()?;
        self.suspended.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn poll_event(&self) -> Option<Event> {
        loop {
            if self.closed.load(Ordering::SeqCst) {
                return None;
            }
            if self.suspended.load(Ordering::SeqCst) {
                // The terminal belongs to someone else right now.
                std::thread::sleep(POLL_TICK);
                continue;
            }
            match cevent::poll(POLL_TICK) {
                Ok(false) => continue,
                Ok(true) => match cevent::read() {
                    Ok(e) => {
                        if let Some(e) = self.translate(e) {
                            return Some(e);
                        }
                    }
                    Err(e) => return Some(Event::Error(e.to_string())),
                },
                Err(e) => return Some(Event::Error(e.to_string())),
            }
        }
    }

    fn size(&self) -> Expanse {
        terminal::size()
            .map(|(w, h)| Expanse::new(w as u32, h as u32))
            .unwrap_or_default()
    }

    fn clear(&self) {
        let mut fp = self.writer();
        let _ = fp
            .execute(terminal::Clear(terminal::ClearType::All))
            .and_then(|fp| fp.execute(ccursor::MoveTo(0, 0)));
    }

    fn show(&self) {
        let _ = self.writer().flush();
    }

    fn sync(&self) {
        let _ = self
            .writer()
            .execute(terminal::Clear(terminal::ClearType::Purge));
        self.clear();
    }

    fn enable_mouse(&self) {
        let _ = self.writer().execute(cevent::EnableMouseCapture);
    }

    fn disable_mouse(&self) {
        let _ = self.writer().execute(cevent::DisableMouseCapture);
    }

    fn hide_cursor(&self) {
        let _ = self.writer().execute(ccursor::Hide);
    }
}
