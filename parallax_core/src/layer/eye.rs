// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-eye addressing.

use core::ops::{Index, IndexMut};

/// One eye of the stereo pair.
///
/// Mono layers use only [`Eye::Left`]; the compositor presents the same
/// image set to both eyes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum Eye {
    /// The left eye (also the sole set for mono layouts).
    Left = 0,
    /// The right eye.
    Right = 1,
}

impl Eye {
    /// Both eyes, left first.
    pub const BOTH: [Self; 2] = [Self::Left, Self::Right];

    /// Returns the array index for this eye.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A pair of values addressed by [`Eye`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PerEye<T>(pub(crate) [T; 2]);

impl<T> PerEye<T> {
    /// Creates a pair from left and right values.
    #[inline]
    pub fn new(left: T, right: T) -> Self {
        Self([left, right])
    }
}

impl<T> Index<Eye> for PerEye<T> {
    type Output = T;

    #[inline]
    fn index(&self, eye: Eye) -> &T {
        &self.0[eye.index()]
    }
}

impl<T> IndexMut<Eye> for PerEye<T> {
    #[inline]
    fn index_mut(&mut self, eye: Eye) -> &mut T {
        &mut self.0[eye.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexing_by_eye() {
        let mut pair = PerEye::new(1, 2);
        assert_eq!(pair[Eye::Left], 1);
        assert_eq!(pair[Eye::Right], 2);
        pair[Eye::Right] = 5;
        assert_eq!(pair[Eye::Right], 5);
    }
}
