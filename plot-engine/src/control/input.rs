use glam::Vec2;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// Set of the keys the plotter reacts to.
pub struct Keys(u16);

impl Keys {
    pub const NONE: Self = Self(0);
    pub const W: Self = Self(1 << 0);
    pub const A: Self = Self(1 << 1);
    pub const S: Self = Self(1 << 2);
    pub const D: Self = Self(1 << 3);
    pub const Q: Self = Self(1 << 4);
    pub const E: Self = Self(1 << 5);
    pub const R: Self = Self(1 << 6);
    pub const F: Self = Self(1 << 7);
    pub const C: Self = Self(1 << 8);
    pub const SPACE: Self = Self(1 << 9);
    pub const LSHIFT: Self = Self(1 << 10);
    pub const ESCAPE: Self = Self(1 << 11);

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Maps a `winit` key code to the matching key, if the plotter binds it.
    #[must_use]
    pub const fn from_virtual_keycode(key: winit::event::VirtualKeyCode) -> Option<Self> {
        use winit::event::VirtualKeyCode;

        Some(match key {
            VirtualKeyCode::W => Self::W,
            VirtualKeyCode::A => Self::A,
            VirtualKeyCode::S => Self::S,
            VirtualKeyCode::D => Self::D,
            VirtualKeyCode::Q => Self::Q,
            VirtualKeyCode::E => Self::E,
            VirtualKeyCode::R => Self::R,
            VirtualKeyCode::F => Self::F,
            VirtualKeyCode::C => Self::C,
            VirtualKeyCode::Space => Self::SPACE,
            VirtualKeyCode::LShift => Self::LSHIFT,
            VirtualKeyCode::Escape => Self::ESCAPE,
            _ => return None,
        })
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
/// Snapshot of the input sources, taken once per frame.
///
/// Controllers fill it in `fetch_input`, cameras read it in `update`.
pub struct InputState {
    /// Keys held down at the end of the frame.
    pub held: Keys,
    /// Keys released during the frame.
    pub released: Keys,
    /// Cursor position of this frame, in window pixels.
    pub cursor: Option<Vec2>,
    /// Cursor position of the previous frame.
    pub previous_cursor: Option<Vec2>,
    pub any_button_down: bool,
    /// Wheel ticks accumulated during the frame, positive when scrolling up.
    pub scroll: f32,
}

impl InputState {
    #[must_use]
    #[inline]
    pub const fn is_held(&self, keys: Keys) -> bool {
        self.held.contains(keys)
    }

    #[must_use]
    #[inline]
    pub const fn was_released(&self, keys: Keys) -> bool {
        self.released.contains(keys)
    }

    /// Cursor movement since the previous frame.
    ///
    /// Zero as long as one of the two samples is missing, so the very first
    /// sample never produces a jump.
    #[must_use]
    pub fn cursor_delta(&self) -> Vec2 {
        match (self.cursor, self.previous_cursor) {
            (Some(current), Some(previous)) => current - previous,
            _ => Vec2::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_insert_and_remove() {
        let mut keys = Keys::NONE;
        keys.insert(Keys::W);
        keys.insert(Keys::SPACE);

        assert!(keys.contains(Keys::W));
        assert!(keys.contains(Keys::W.union(Keys::SPACE)));
        assert!(!keys.contains(Keys::S));

        keys.remove(Keys::W);
        assert!(!keys.contains(Keys::W));
        assert!(keys.contains(Keys::SPACE));

        keys.remove(Keys::SPACE);
        assert!(keys.is_empty());
    }

    #[test]
    fn keycode_mapping() {
        use winit::event::VirtualKeyCode;

        assert_eq!(Keys::from_virtual_keycode(VirtualKeyCode::F), Some(Keys::F));
        assert_eq!(
            Keys::from_virtual_keycode(VirtualKeyCode::LShift),
            Some(Keys::LSHIFT)
        );
        assert_eq!(Keys::from_virtual_keycode(VirtualKeyCode::Z), None);
    }

    #[test]
    fn cursor_delta_needs_two_samples() {
        let mut state = InputState::default();
        assert_eq!(state.cursor_delta(), Vec2::ZERO);

        state.cursor = Some(Vec2::new(10.0, 20.0));
        assert_eq!(state.cursor_delta(), Vec2::ZERO);

        state.previous_cursor = Some(Vec2::new(4.0, 25.0));
        assert_eq!(state.cursor_delta(), Vec2::new(6.0, -5.0));
    }
}
