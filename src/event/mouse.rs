//! Raw mouse reports and the gesture recognizer that turns them into
//! semantic actions.
//!
//! The terminal reports mouse state as (position, button bitmask) samples.
//! [`recognize`] diffs each sample against the previous one and emits an
//! ordered list of [`MouseAction`]s: a move, per-button downs and ups, click
//! or double-click resolution on up, and one scroll action per wheel bit.

use std::time::{Duration, Instant};

use bitflags::bitflags;

use crate::{event::key::Mods, geom::Point};

/// Default maximum gap between a click and the next press at the same
/// position for the pair to register as a double click.
pub const DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(500);

bitflags! {
    /// The raw mouse button bitmask as reported by the display handle.
    /// Wheel bits are momentary: set only on the sample that scrolled.
    #[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
    pub struct Buttons: u16 {
        const PRIMARY = 1 << 0;
        const MIDDLE = 1 << 1;
        const SECONDARY = 1 << 2;
        const WHEEL_UP = 1 << 3;
        const WHEEL_DOWN = 1 << 4;
        const WHEEL_LEFT = 1 << 5;
        const WHEEL_RIGHT = 1 << 6;
    }
}

/// A raw mouse report: where the pointer is and which buttons are held.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct MouseEvent {
    /// Pointer location in screen space.
    pub position: Point,
    /// Button state for this sample.
    pub buttons: Buttons,
    /// Keyboard modifiers held during the report.
    pub mods: Mods,
}

impl MouseEvent {
    pub fn new(position: Point, buttons: Buttons) -> Self {
        MouseEvent {
            position,
            buttons,
            mods: Mods::default(),
        }
    }
}

/// A semantic mouse action derived from consecutive raw reports.
#[derive(Debug, PartialOrd, PartialEq, Eq, Clone, Copy, Hash)]
pub enum MouseAction {
    Move,
    LeftDown,
    LeftUp,
    LeftClick,
    LeftDoubleClick,
    MiddleDown,
    MiddleUp,
    MiddleClick,
    MiddleDoubleClick,
    RightDown,
    RightUp,
    RightClick,
    RightDoubleClick,
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
}

impl MouseAction {
    /// Is this a button press?
    pub fn is_down(&self) -> bool {
        matches!(
            self,
            MouseAction::LeftDown | MouseAction::MiddleDown | MouseAction::RightDown
        )
    }
}

/// Per-button action table driving the recognizer.
const BUTTON_ACTIONS: [(Buttons, MouseAction, MouseAction, MouseAction, MouseAction); 3] = [
    (
        Buttons::PRIMARY,
        MouseAction::LeftDown,
        MouseAction::LeftUp,
        MouseAction::LeftClick,
        MouseAction::LeftDoubleClick,
    ),
    (
        Buttons::MIDDLE,
        MouseAction::MiddleDown,
        MouseAction::MiddleUp,
        MouseAction::MiddleClick,
        MouseAction::MiddleDoubleClick,
    ),
    (
        Buttons::SECONDARY,
        MouseAction::RightDown,
        MouseAction::RightUp,
        MouseAction::RightClick,
        MouseAction::RightDoubleClick,
    ),
];

/// Wheel bit to scroll action table.
const WHEEL_ACTIONS: [(Buttons, MouseAction); 4] = [
    (Buttons::WHEEL_UP, MouseAction::ScrollUp),
    (Buttons::WHEEL_DOWN, MouseAction::ScrollDown),
    (Buttons::WHEEL_LEFT, MouseAction::ScrollLeft),
    (Buttons::WHEEL_RIGHT, MouseAction::ScrollRight),
];

/// Recognizer state carried between raw samples. Owned and mutated by the
/// dispatch thread only.
#[derive(Debug)]
pub struct GestureState {
    /// Last observed pointer position.
    pub last_pos: Point,
    /// Pointer position when a button was last pressed. Updated by the
    /// dispatcher after a sample that produced a down action.
    pub down_pos: Point,
    /// Button mask of the previous sample.
    pub last_buttons: Buttons,
    /// When a click last completed. `None` after a double click, so a third
    /// rapid press restarts the click/double-click cycle.
    pub last_click: Option<Instant>,
    /// Maximum gap between a click and the next press to count as a double
    /// click.
    pub double_click_interval: Duration,
}

impl GestureState {
    pub fn new(double_click_interval: Duration) -> Self {
        GestureState {
            last_pos: Point::zero(),
            down_pos: Point::zero(),
            last_buttons: Buttons::empty(),
            last_click: None,
            double_click_interval,
        }
    }
}

impl Default for GestureState {
    fn default() -> Self {
        Self::new(DOUBLE_CLICK_INTERVAL)
    }
}

/// Derive the ordered semantic actions for one raw sample.
///
/// Updates the last observed position, the last button mask (once per
/// sample) and the click bookkeeping. It does not touch `down_pos`: the
/// dispatcher records that after routing, if the sample produced a down
/// action.
pub fn recognize(st: &mut GestureState, ev: &MouseEvent, now: Instant) -> Vec<MouseAction> {
    let mut out = Vec::new();

    // Whether the pointer moved since the matching down. Resolved once per
    // sample, against the down position recorded before this sample.
    let click_moved = ev.position != st.down_pos;
    let changes = ev.buttons ^ st.last_buttons;

    if ev.position != st.last_pos {
        out.push(MouseAction::Move);
        st.last_pos = ev.position;
    }

    for (mask, down, up, click, double_click) in BUTTON_ACTIONS {
        if !changes.contains(mask) {
            continue;
        }
        if ev.buttons.contains(mask) {
            out.push(down);
        } else {
            out.push(up);
            if !click_moved {
                match st.last_click {
                    Some(prev) if now.duration_since(prev) <= st.double_click_interval => {
                        out.push(double_click);
                        st.last_click = None;
                    }
                    _ => {
                        out.push(click);
                        st.last_click = Some(now);
                    }
                }
            }
        }
    }

    for (mask, action) in WHEEL_ACTIONS {
        if ev.buttons.contains(mask) {
            out.push(action);
        }
    }

    st.last_buttons = ev.buttons;
    out
}
