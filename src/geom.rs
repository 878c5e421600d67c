//! Minimal geometry types shared between the runtime and components.

/// A location in screen space.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    pub const fn zero() -> Self {
        Point { x: 0, y: 0 }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point { x, y }
    }
}

/// A width/height extent without a location.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Expanse {
    pub w: u32,
    pub h: u32,
}

impl Expanse {
    pub fn new(w: u32, h: u32) -> Self {
        Expanse { w, h }
    }
}

/// A rectangle in screen space.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Rect { x, y, w, h }
    }

    /// Does this rectangle contain the point?
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x
            && p.y >= self.y
            && p.x < self.x.saturating_add(self.w as i32)
            && p.y < self.y.saturating_add(self.h as i32)
    }
}
