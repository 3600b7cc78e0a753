//! This module contains the necessary trait used to handle different kind
//! of controllers, i.e. input sources.
//!
//! To implement a controller, simply create a struct with internal states and
//! implement the `Controller` trait for it.
//! Add it to the list of controllers in the app config and it will be
//! automatically handled by the event loop.

pub mod keyboard;
pub mod mouse;

/// Represents a controller.
///
/// A controller is responsible for handling events and
/// fills the per-frame `InputState` read by cameras.
pub trait Controller {
    /// Handle an event, usually by filtering by event type and
    /// updating the controller's state accordingly.
    fn handle_event(&mut self, event: &winit::event::Event<()>);

    /// Write the controller's state for this frame into `state`.
    ///
    /// Called once per frame, before the active camera is updated.
    fn fetch_input(&mut self, state: &mut super::InputState);
}
