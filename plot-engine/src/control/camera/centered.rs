use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

use super::super::{InputState, Keys};
use super::{CameraSettings, Projection};

#[derive(Copy, Clone, Debug)]
/// Represents a camera orbiting a fixed point of the plot.
///
/// The position only changes when zooming; rotations are applied to the
/// scene around `center` when building the view matrix.
pub struct Centered {
    center: Vec3,
    position: Vec3,
    aspect_ratio: f32,
    /// Rotation about the vertical axis through the center (radians).
    y_angle: f32,
    /// Tilt about the horizontal axis facing the camera (radians).
    z_angle: f32,
    /// Vertical field of view (radians).
    fov: f32,
    projection: Projection,
    settings: CameraSettings,
}

impl Centered {
    /// Wheel ticks applied in a single frame at most.
    const MAX_ZOOM_STEPS: f32 = 32.0;

    #[must_use]
    pub fn new(center: Vec3, aspect_ratio: f32, settings: CameraSettings) -> Self {
        Self {
            center,
            position: Vec3::new(center.x, 0.0, center.z) * 3.0,
            aspect_ratio,
            y_angle: 0.0,
            z_angle: 0.0,
            fov: 45f32.to_radians(),
            projection: Projection::Perspective,
            settings,
        }
    }

    #[must_use]
    pub const fn center(&self) -> Vec3 {
        self.center
    }

    #[must_use]
    pub const fn y_angle(&self) -> f32 {
        self.y_angle
    }

    pub fn set_y_angle(&mut self, angle: f32) {
        self.y_angle = angle;
    }

    #[must_use]
    pub const fn z_angle(&self) -> f32 {
        self.z_angle
    }

    /// Sets the tilt, clamped to a quarter turn either way.
    pub fn set_z_angle(&mut self, angle: f32) {
        self.z_angle = angle.clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    pub fn reset_angles(&mut self) {
        self.y_angle = 0.0;
        self.z_angle = 0.0;
    }

    /// Returns the field of view in degrees.
    #[must_use]
    pub fn fov(&self) -> f32 {
        self.fov.to_degrees()
    }

    /// Sets the field of view in degrees, clamped to `[1, 45]`.
    pub fn set_fov(&mut self, degrees: f32) {
        self.fov = degrees.clamp(super::MIN_FOV, super::MAX_FOV).to_radians();
    }

    #[must_use]
    pub const fn projection(&self) -> Projection {
        self.projection
    }

    pub fn toggle_projection(&mut self) {
        self.projection = self.projection.toggled();
        tracing::debug!("Centered camera projection: {:?}", self.projection);
    }

    /// Moves the camera along the line to the center, one step per wheel tick.
    ///
    /// Negative ticks (wheel down) move toward the center, positive ones away.
    pub fn zoom(&mut self, ticks: f32) {
        if ticks == 0.0 {
            return;
        }

        #[allow(clippy::cast_possible_truncation)]
        let steps = ticks.abs().round().clamp(1.0, Self::MAX_ZOOM_STEPS) as i32;
        let factor = if ticks < 0.0 {
            1.0 - self.settings.zoom_step
        } else {
            1.0 + self.settings.zoom_step
        };

        self.position = self.center + (self.position - self.center) * factor.powi(steps);
    }
}

impl super::Camera for Centered {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn view_matrix(&self) -> Mat4 {
        // The tilt axis is horizontal and perpendicular to the line of sight,
        // so the plot stays in the middle of the rotation.
        let tilt = Vec3::Y
            .cross(self.center - self.position)
            .try_normalize()
            .map_or(Mat4::IDENTITY, |axis| {
                Mat4::from_axis_angle(axis, self.z_angle)
            });

        Mat4::look_at_rh(self.position, self.center, Vec3::Y)
            * Mat4::from_translation(self.center)
            * tilt
            * Mat4::from_rotation_y(self.y_angle)
            * Mat4::from_translation(-self.center)
    }

    fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix(self.fov, self.aspect_ratio)
    }

    fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    fn update(&mut self, delta_seconds: f32, input: &InputState) {
        let step = self.settings.orbit_speed * delta_seconds;

        if input.is_held(Keys::E) {
            self.set_z_angle(self.z_angle + step);
        }

        if input.is_held(Keys::Q) {
            self.set_z_angle(self.z_angle - step);
        }

        if input.is_held(Keys::R) {
            self.reset_angles();
        }

        if input.was_released(Keys::F) {
            self.toggle_projection();
        }

        if input.is_held(Keys::A) {
            self.y_angle += step;
        }

        if input.is_held(Keys::D) {
            self.y_angle -= step;
        }

        if input.any_button_down {
            let delta = input.cursor_delta() * self.settings.sensitivity * delta_seconds;
            self.y_angle += delta.x;
            self.set_z_angle(self.z_angle - delta.y);
        }

        self.zoom(input.scroll);
    }
}
