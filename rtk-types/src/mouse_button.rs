//! Mouse button ids and chord masks.
//!
//! The logical button order matches the HID report bit order used by the
//! trackball: bit 0 is left, bit 7 is the unused filler button.
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use bitfield_struct::bitfield;
use postcard::experimental::max_size::MaxSize;
use serde::{Deserialize, Serialize};
use strum::FromRepr;

/// Logical mouse buttons, in report bit order.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, MaxSize, PartialEq, Eq, FromRepr)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MouseButton {
    Left = 0,
    Right = 1,
    Back = 2,
    Middle = 3,
    Forward = 4,
    Extra1 = 5,
    Extra2 = 6,
    /// Filler position, mapped targets land on report bit 7
    None = 7,
}

impl MouseButton {
    /// Number of logical buttons, including the filler position.
    pub const COUNT: usize = 8;

    /// The chord mask with only this button's bit set.
    pub const fn mask(self) -> MouseButtons {
        MouseButtons::from_bits(1 << self as u8)
    }

    /// This button's bit index in the report byte.
    pub const fn bit(self) -> u8 {
        self as u8
    }
}

/// Button chord as a bitmask, up to 8 buttons.
#[bitfield(u8, order = Lsb, defmt = cfg(feature = "defmt"))]
#[derive(Eq, PartialEq)]
pub struct MouseButtons {
    #[bits(1)]
    pub left: bool,
    #[bits(1)]
    pub right: bool,
    #[bits(1)]
    pub back: bool,
    #[bits(1)]
    pub middle: bool,
    #[bits(1)]
    pub forward: bool,
    #[bits(1)]
    pub extra1: bool,
    #[bits(1)]
    pub extra2: bool,
    #[bits(1)]
    pub none: bool,
}

impl BitOr for MouseButtons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.into_bits() | rhs.into_bits())
    }
}
impl BitAnd for MouseButtons {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.into_bits() & rhs.into_bits())
    }
}
impl Not for MouseButtons {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::from_bits(!self.into_bits())
    }
}
impl BitAndAssign for MouseButtons {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = *self & rhs;
    }
}
impl BitOrAssign for MouseButtons {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl MouseButtons {
    pub const LEFT: Self = Self::new().with_left(true);
    pub const RIGHT: Self = Self::new().with_right(true);
    pub const BACK: Self = Self::new().with_back(true);
    pub const MIDDLE: Self = Self::new().with_middle(true);
    pub const FORWARD: Self = Self::new().with_forward(true);
    pub const EXTRA1: Self = Self::new().with_extra1(true);
    pub const EXTRA2: Self = Self::new().with_extra2(true);

    /// The empty chord.
    pub const fn empty() -> Self {
        Self::new()
    }

    pub const fn is_empty(self) -> bool {
        self.into_bits() == 0
    }

    pub const fn contains(self, button: MouseButton) -> bool {
        self.into_bits() & (1 << button.bit()) != 0
    }

    /// Returns the chord with the given button set or cleared.
    pub const fn with_button(self, button: MouseButton, down: bool) -> Self {
        if down {
            Self::from_bits(self.into_bits() | (1 << button.bit()))
        } else {
            Self::from_bits(self.into_bits() & !(1 << button.bit()))
        }
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.into_bits() & other.into_bits() != 0
    }
}
