use glam::Vec2;

use super::super::InputState;

#[derive(Copy, Clone, Debug, Default)]
/// Represents the state of a mouse: cursor, buttons and wheel.
pub struct Mouse {
    cursor: Option<Vec2>,
    previous_cursor: Option<Vec2>,
    /// Bit per pressed button.
    buttons: u8,
    scroll: f32,
}

impl Mouse {
    /// Pixel scroll distance counted as one wheel tick (touchpads).
    const PIXELS_PER_TICK: f32 = 40.0;

    pub fn move_cursor(&mut self, position: Vec2) {
        self.cursor = Some(position);
    }

    pub fn set_button(&mut self, button: winit::event::MouseButton, pressed: bool) {
        let mask = match button {
            winit::event::MouseButton::Left => 1 << 0,
            winit::event::MouseButton::Right => 1 << 1,
            winit::event::MouseButton::Middle => 1 << 2,
            winit::event::MouseButton::Other(_) => 1 << 3,
        };

        if pressed {
            self.buttons |= mask;
        } else {
            self.buttons &= !mask;
        }
    }

    /// Accumulates wheel ticks, positive when scrolling up.
    pub fn scroll(&mut self, ticks: f32) {
        self.scroll += ticks;
    }
}

impl super::Controller for Mouse {
    fn handle_event(&mut self, event: &winit::event::Event<()>) {
        let winit::event::Event::WindowEvent { event, .. } = event else {
            return;
        };

        match event {
            winit::event::WindowEvent::CursorMoved { position, .. } => {
                #[allow(clippy::cast_possible_truncation)]
                self.move_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            winit::event::WindowEvent::MouseInput { state, button, .. } => {
                self.set_button(*button, *state == winit::event::ElementState::Pressed);
            }
            winit::event::WindowEvent::MouseWheel { delta, .. } => match delta {
                winit::event::MouseScrollDelta::LineDelta(_, y) => self.scroll(*y),
                #[allow(clippy::cast_possible_truncation)]
                winit::event::MouseScrollDelta::PixelDelta(position) => {
                    self.scroll(position.y as f32 / Self::PIXELS_PER_TICK);
                }
            },
            _ => {}
        }
    }

    fn fetch_input(&mut self, state: &mut InputState) {
        state.previous_cursor = self.previous_cursor;
        state.cursor = self.cursor;
        state.any_button_down = self.buttons != 0;
        state.scroll = core::mem::take(&mut self.scroll);

        self.previous_cursor = self.cursor;
    }
}

#[cfg(test)]
mod tests {
    use super::super::Controller;
    use super::*;
    use winit::event::MouseButton;

    #[test]
    fn first_frame_has_no_previous_sample() {
        let mut mouse = Mouse::default();
        let mut state = InputState::default();

        mouse.move_cursor(Vec2::new(100.0, 50.0));
        mouse.fetch_input(&mut state);
        assert_eq!(state.cursor, Some(Vec2::new(100.0, 50.0)));
        assert_eq!(state.previous_cursor, None);
        assert_eq!(state.cursor_delta(), Vec2::ZERO);

        mouse.move_cursor(Vec2::new(110.0, 45.0));
        mouse.fetch_input(&mut state);
        assert_eq!(state.cursor_delta(), Vec2::new(10.0, -5.0));
    }

    #[test]
    fn still_cursor_gives_zero_delta() {
        let mut mouse = Mouse::default();
        let mut state = InputState::default();

        mouse.move_cursor(Vec2::new(3.0, 3.0));
        mouse.fetch_input(&mut state);
        mouse.fetch_input(&mut state);
        assert_eq!(state.cursor_delta(), Vec2::ZERO);
    }

    #[test]
    fn buttons_are_tracked_independently() {
        let mut mouse = Mouse::default();
        let mut state = InputState::default();

        mouse.set_button(MouseButton::Left, true);
        mouse.set_button(MouseButton::Right, true);
        mouse.set_button(MouseButton::Left, false);
        mouse.fetch_input(&mut state);
        assert!(state.any_button_down);

        mouse.set_button(MouseButton::Right, false);
        mouse.fetch_input(&mut state);
        assert!(!state.any_button_down);
    }

    #[test]
    fn scroll_is_reset_after_fetch() {
        let mut mouse = Mouse::default();
        let mut state = InputState::default();

        mouse.scroll(1.0);
        mouse.scroll(-3.0);
        mouse.fetch_input(&mut state);
        assert!((state.scroll + 2.0).abs() < f32::EPSILON);

        mouse.fetch_input(&mut state);
        assert!(state.scroll.abs() < f32::EPSILON);
    }
}
