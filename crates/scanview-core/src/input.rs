//! Input events a host feeds into a [`TileView`](crate::tile_view::TileView).
//!
//! Pointer coordinates are window coordinates: pixels from the top-left of
//! the visible area, before the scroll offset is applied.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    /// Pans the view.
    Primary,
    /// Draws measurement annotations.
    Secondary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelDirection {
    /// Zoom in.
    Up,
    /// Zoom out.
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Return,
    Escape,
    Char(char),
}

impl Key {
    /// Scroll direction in units for arrow keys and WASD, if this key scrolls.
    pub fn scroll_units(self) -> Option<(i32, i32)> {
        match self {
            Key::Right => Some((1, 0)),
            Key::Left => Some((-1, 0)),
            Key::Up => Some((0, -1)),
            Key::Down => Some((0, 1)),
            Key::Char(c) => match c.to_ascii_lowercase() {
                'd' => Some((1, 0)),
                'a' => Some((-1, 0)),
                'w' => Some((0, -1)),
                's' => Some((0, 1)),
                _ => None,
            },
            Key::Return | Key::Escape => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewerEvent {
    Resize {
        width: u32,
        height: u32,
    },
    PointerPress {
        button: PointerButton,
        x: f64,
        y: f64,
    },
    PointerDrag {
        button: PointerButton,
        x: f64,
        y: f64,
    },
    PointerRelease {
        button: PointerButton,
        x: f64,
        y: f64,
    },
    Wheel {
        direction: WheelDirection,
        x: f64,
        y: f64,
    },
    Key {
        key: Key,
    },
}
