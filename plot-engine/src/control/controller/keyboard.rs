use super::super::{InputState, Keys};

#[derive(Copy, Clone, Debug, Default)]
/// Represents the state of a keyboard.
pub struct Keyboard {
    held: Keys,
    released: Keys,
}

impl Keyboard {
    /// Records a key transition.
    ///
    /// A release is remembered until the next `fetch_input`, so a key tapped
    /// between two frames still registers.
    pub fn set_key(&mut self, key: Keys, pressed: bool) {
        if pressed {
            self.held.insert(key);
        } else {
            if self.held.contains(key) {
                self.released.insert(key);
            }
            self.held.remove(key);
        }
    }
}

impl super::Controller for Keyboard {
    fn handle_event(&mut self, event: &winit::event::Event<()>) {
        if let winit::event::Event::WindowEvent {
            event:
                winit::event::WindowEvent::KeyboardInput {
                    input:
                        winit::event::KeyboardInput {
                            state,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                },
            ..
        } = event
        {
            let Some(key) = Keys::from_virtual_keycode(*key) else {
                return;
            };

            self.set_key(key, *state == winit::event::ElementState::Pressed);
        }
    }

    fn fetch_input(&mut self, state: &mut InputState) {
        state.held = self.held;
        state.released = core::mem::take(&mut self.released);
    }
}

#[cfg(test)]
mod tests {
    use super::super::Controller;
    use super::*;

    #[test]
    fn held_keys_persist_across_frames() {
        let mut keyboard = Keyboard::default();
        let mut state = InputState::default();

        keyboard.set_key(Keys::W, true);
        keyboard.fetch_input(&mut state);
        assert!(state.is_held(Keys::W));

        keyboard.fetch_input(&mut state);
        assert!(state.is_held(Keys::W));
        assert!(!state.was_released(Keys::W));
    }

    #[test]
    fn release_is_reported_once() {
        let mut keyboard = Keyboard::default();
        let mut state = InputState::default();

        keyboard.set_key(Keys::F, true);
        keyboard.set_key(Keys::F, false);
        keyboard.fetch_input(&mut state);
        assert!(!state.is_held(Keys::F));
        assert!(state.was_released(Keys::F));

        keyboard.fetch_input(&mut state);
        assert!(!state.was_released(Keys::F));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut keyboard = Keyboard::default();
        let mut state = InputState::default();

        keyboard.set_key(Keys::C, false);
        keyboard.fetch_input(&mut state);
        assert!(state.released.is_empty());
    }
}
