//! Horizontal facing and walking direction.

use serde::{Deserialize, Serialize};

/// Horizontal direction an actor faces or walks in.
///
/// The discriminants match the sign of the x scale used by sprite flipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(i8)]
pub enum Facing {
    /// Towards negative x
    Left = -1,
    /// Towards positive x
    #[default]
    Right = 1,
}

impl Facing {
    /// Direction from `from_x` towards `to_x`.
    ///
    /// Ties resolve to `Left`: only a strictly greater target x faces right.
    #[must_use]
    pub fn toward(from_x: f32, to_x: f32) -> Self {
        if to_x > from_x {
            Self::Right
        } else {
            Self::Left
        }
    }

    /// Signed unit value (-1.0 or 1.0).
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Integer form used by event payloads (-1 or 1).
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i8 as i32
    }

    /// Parses the integer form. Zero and positive values map to `Right`.
    #[must_use]
    pub const fn from_i32(value: i32) -> Self {
        if value < 0 {
            Self::Left
        } else {
            Self::Right
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_toward_tie_is_left() {
        assert_eq!(Facing::toward(1.0, 1.0), Facing::Left);
        assert_eq!(Facing::toward(1.0, 1.5), Facing::Right);
        assert_eq!(Facing::toward(1.0, -3.0), Facing::Left);
    }

    #[test]
    fn test_integer_round_trip() {
        assert_eq!(Facing::Left.as_i32(), -1);
        assert_eq!(Facing::Right.as_i32(), 1);
        assert_eq!(Facing::from_i32(-7), Facing::Left);
        assert_eq!(Facing::from_i32(0), Facing::Right);
        assert_eq!(Facing::Left.opposite(), Facing::Right);
    }

    proptest! {
        #[test]
        fn prop_toward_is_right_iff_target_greater(a in -1.0e4f32..1.0e4, b in -1.0e4f32..1.0e4) {
            let facing = Facing::toward(a, b);
            prop_assert_eq!(facing == Facing::Right, b > a);
            prop_assert_eq!(facing.sign() > 0.0, b > a);
        }
    }
}
