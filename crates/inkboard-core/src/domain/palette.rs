//! The built-in brush palette.
//!
//! Colors are selected by the digit keys 0–5 and brush widths by the home
//! row keys q w e r t y. The slots are part of the user-facing contract
//! (every participant sees the same six colors) but only the resolved RGB
//! values ever hit the wire.

use crate::domain::replica::Rgb;

pub const BLACK: Rgb = Rgb::new(0, 0, 0);
pub const WHITE: Rgb = Rgb::new(255, 255, 255);
pub const RED: Rgb = Rgb::new(255, 0, 0);
pub const GREEN: Rgb = Rgb::new(0, 255, 0);
pub const CYAN: Rgb = Rgb::new(0, 255, 255);
pub const YELLOW: Rgb = Rgb::new(255, 255, 0);

/// Number of color slots on the palette.
pub const COLOR_SLOTS: u8 = 6;

/// Largest brush width selectable from the keyboard.
pub const MAX_BRUSH_SIZE: u32 = 6;

/// Resolves a digit-key slot to its color. Slots outside 0–5 are not bound.
pub fn color_for_slot(slot: u8) -> Option<Rgb> {
    match slot {
        0 => Some(BLACK),
        1 => Some(WHITE),
        2 => Some(RED),
        3 => Some(GREEN),
        4 => Some(CYAN),
        5 => Some(YELLOW),
        _ => None,
    }
}
