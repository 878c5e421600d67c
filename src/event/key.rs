//! This module contains the core primitives to represent keyboard input.
use std::ops::Add;

/// Modifier key state.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Mods {
    /// Shift is active.
    pub shift: bool,
    /// Control is active.
    pub ctrl: bool,
    /// Alt is active.
    pub alt: bool,
}

impl Add<KeyCode> for Mods {
    type Output = Key;

    fn add(self, key: KeyCode) -> Self::Output {
        Key { mods: self, code: key }
    }
}

impl Add<char> for Mods {
    type Output = Key;

    fn add(self, other: char) -> Self::Output {
        Key {
            mods: self,
            code: other.into(),
        }
    }
}

/// No modifiers pressed.
#[allow(non_upper_case_globals)]
pub const Empty: Mods = Mods {
    shift: false,
    ctrl: false,
    alt: false,
};

/// Shift-only modifier state.
#[allow(non_upper_case_globals)]
pub const Shift: Mods = Mods {
    shift: true,
    ctrl: false,
    alt: false,
};

/// Control-only modifier state.
#[allow(non_upper_case_globals)]
pub const Ctrl: Mods = Mods {
    shift: false,
    ctrl: true,
    alt: false,
};

/// Alt-only modifier state.
#[allow(non_upper_case_globals)]
pub const Alt: Mods = Mods {
    shift: false,
    ctrl: false,
    alt: true,
};

/// Key codes.
#[derive(Debug, PartialOrd, PartialEq, Hash, Eq, Clone, Copy)]
pub enum KeyCode {
    Backspace,
    Enter,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    BackTab,
    Delete,
    Insert,
    /// A function key.
    F(u8),
    /// A printable character.
    Char(char),
    Esc,
    /// A key we don't know how to represent.
    Null,
}

impl From<char> for KeyCode {
    fn from(c: char) -> Self {
        KeyCode::Char(c)
    }
}

/// A keystroke: a key code plus the modifier state it arrived with.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Key {
    /// Modifiers active for this key event.
    pub mods: Mods,
    /// The key code.
    pub code: KeyCode,
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Key {
            mods: Empty,
            code: c.into(),
        }
    }
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        Key { mods: Empty, code }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tkey() {
        assert_eq!(Key::from('a'), Empty + 'a');
        assert_eq!(Ctrl + 'c', Key {
            mods: Ctrl,
            code: KeyCode::Char('c')
        });
        assert_ne!(Key::from('c'), Ctrl + 'c');
        assert_eq!(Shift + KeyCode::Tab, Key {
            mods: Shift,
            code: KeyCode::Tab
        });
    }
}
