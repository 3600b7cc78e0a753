//! Frame-by-frame state of the plotter, independent of the window and GPU.

use crate::{
    control::{camera::CameraSet, controller::Controller, InputState, Keys},
    plot::Plot,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// What the event loop should do after a frame.
pub enum Frame {
    /// Keep running. `regenerated` is set when the surface must be uploaded again.
    Continue { regenerated: bool },
    Exit,
}

/// The plot and the cameras looking at it.
pub struct Scene {
    plot: Plot,
    cameras: CameraSet,
}

impl Scene {
    #[must_use]
    pub const fn new(plot: Plot, cameras: CameraSet) -> Self {
        Self { plot, cameras }
    }

    #[must_use]
    pub const fn plot(&self) -> &Plot {
        &self.plot
    }

    #[must_use]
    pub const fn cameras(&self) -> &CameraSet {
        &self.cameras
    }

    /// Collects this frame's input from every controller.
    pub fn gather_input(controllers: &mut [Box<dyn Controller>]) -> InputState {
        let mut input = InputState::default();
        for controller in controllers {
            controller.fetch_input(&mut input);
        }
        input
    }

    /// Applies a frame of input.
    ///
    /// Escape ends the loop before anything moves. Releasing C switches
    /// camera, then the active camera and the animation advance by
    /// `delta_seconds`.
    pub fn step(&mut self, delta_seconds: f32, input: &InputState) -> Frame {
        if input.is_held(Keys::ESCAPE) {
            tracing::debug!("Escape pressed, exiting");
            return Frame::Exit;
        }

        if input.was_released(Keys::C) {
            self.cameras.cycle();
        }

        self.cameras.active_mut().update(delta_seconds, input);

        Frame::Continue {
            regenerated: self.plot.advance(delta_seconds),
        }
    }

    /// Forwards a new window size to the cameras.
    ///
    /// A zero-sized window (minimized) keeps the previous aspect ratio.
    /// Returns whether the cameras were updated.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }

        #[allow(clippy::cast_precision_loss)]
        let aspect_ratio = width as f32 / height as f32;
        self.cameras.set_aspect_ratio(aspect_ratio);
        true
    }
}
