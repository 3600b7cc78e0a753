use glam::{Mat4, Vec2, Vec3};

use super::super::{InputState, Keys};
use super::{CameraSettings, Projection};

#[derive(Copy, Clone, Debug)]
/// Represents a free flying, first person camera.
pub struct Flying {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    /// Rotation around the Y axis (radians).
    yaw: f32,
    /// Rotation around the X axis (radians).
    pitch: f32,
    /// Vertical field of view (radians).
    fov: f32,
    aspect_ratio: f32,
    projection: Projection,
    /// Cursor sample of the last update, `None` until the first move.
    last_cursor: Option<Vec2>,
    settings: CameraSettings,
}

impl Flying {
    /// Pitch limit (degrees), keeps the camera from flipping over.
    const MAX_PITCH: f32 = 89.0;

    #[must_use]
    pub fn new(position: Vec3, aspect_ratio: f32, settings: CameraSettings) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            yaw: -std::f32::consts::FRAC_PI_2,
            pitch: 0.0,
            fov: std::f32::consts::FRAC_PI_2,
            aspect_ratio,
            projection: Projection::Perspective,
            last_cursor: None,
            settings,
        };
        camera.update_vectors();
        camera
    }

    #[must_use]
    pub const fn front(&self) -> Vec3 {
        self.front
    }

    #[must_use]
    pub const fn up(&self) -> Vec3 {
        self.up
    }

    #[must_use]
    pub const fn right(&self) -> Vec3 {
        self.right
    }

    /// Returns the yaw in degrees.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.yaw.to_degrees()
    }

    /// Sets the yaw in degrees.
    pub fn set_yaw(&mut self, degrees: f32) {
        self.yaw = degrees.to_radians();
        self.update_vectors();
    }

    /// Returns the pitch in degrees.
    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.pitch.to_degrees()
    }

    /// Sets the pitch in degrees, clamped to `[-89, 89]`.
    pub fn set_pitch(&mut self, degrees: f32) {
        self.pitch = degrees
            .clamp(-Self::MAX_PITCH, Self::MAX_PITCH)
            .to_radians();
        self.update_vectors();
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

    fn update_vectors(&mut self) {
        self.front = Vec3::new(
            self.pitch.cos() * self.yaw.cos(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.sin(),
        )
        .normalize();

        self.right = self.front.cross(Vec3::Y).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    fn process_keyboard(&mut self, input: &InputState, delta_seconds: f32) {
        let relative_speed = self.settings.speed * delta_seconds;

        if input.is_held(Keys::W) {
            self.position += self.front * relative_speed;
        }

        if input.is_held(Keys::S) {
            self.position -= self.front * relative_speed;
        }

        if input.is_held(Keys::A) {
            self.position -= self.right * relative_speed;
        }

        if input.is_held(Keys::D) {
            self.position += self.right * relative_speed;
        }

        if input.is_held(Keys::SPACE) {
            self.position += self.up * relative_speed;
        }

        if input.is_held(Keys::LSHIFT) {
            self.position -= self.up * relative_speed;
        }
    }

    fn process_cursor(&mut self, cursor: Vec2) {
        let Some(last) = self.last_cursor.replace(cursor) else {
            return;
        };

        let delta = cursor - last;
        if delta == Vec2::ZERO {
            return;
        }

        // Window y grows downward, pitch grows upward.
        self.yaw += (delta.x * self.settings.sensitivity).to_radians();
        self.set_pitch(self.pitch() - delta.y * self.settings.sensitivity);
    }
}

impl super::Camera for Flying {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, Vec3::Y)
    }

    fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix(self.fov, self.aspect_ratio)
    }

    fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    fn activate(&mut self) {
        // The cursor moved freely while another camera was active.
        self.last_cursor = None;
    }

    fn update(&mut self, delta_seconds: f32, input: &InputState) {
        self.process_keyboard(input, delta_seconds);

        if input.was_released(Keys::F) {
            self.projection = self.projection.toggled();
        }

        if let Some(cursor) = input.cursor {
            self.process_cursor(cursor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Camera;
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn camera() -> Flying {
        Flying::new(Vec3::new(0.0, 0.0, 3.0), 16.0 / 9.0, CameraSettings::default())
    }

    fn cursor_at(x: f32, y: f32) -> InputState {
        InputState {
            cursor: Some(Vec2::new(x, y)),
            ..InputState::default()
        }
    }

    #[test]
    fn initially_looks_down_negative_z() {
        let camera = camera();
        assert!(camera.front().abs_diff_eq(Vec3::NEG_Z, EPSILON));
        assert!(camera.right().abs_diff_eq(Vec3::X, EPSILON));
        assert!(camera.up().abs_diff_eq(Vec3::Y, EPSILON));
    }

    #[test]
    fn basis_stays_orthonormal() {
        let mut camera = camera();
        camera.set_yaw(37.0);
        camera.set_pitch(-52.0);

        assert!((camera.front().length() - 1.0).abs() < EPSILON);
        assert!((camera.right().length() - 1.0).abs() < EPSILON);
        assert!((camera.up().length() - 1.0).abs() < EPSILON);
        assert!(camera.front().dot(camera.right()).abs() < EPSILON);
        assert!(camera.front().dot(camera.up()).abs() < EPSILON);
        assert!(camera.right().y.abs() < EPSILON);
    }

    #[test]
    fn movement_scales_with_elapsed_time() {
        let mut camera = camera();
        let input = InputState {
            held: Keys::W,
            ..InputState::default()
        };

        camera.update(2.0, &input);
        assert!(camera.position().abs_diff_eq(Vec3::new(0.0, 0.0, 0.0), EPSILON));
    }

    #[test]
    fn opposite_keys_cancel_out() {
        let mut camera = camera();
        let input = InputState {
            held: Keys::A
                .union(Keys::D)
                .union(Keys::SPACE)
                .union(Keys::LSHIFT),
            ..InputState::default()
        };

        camera.update(1.0, &input);
        assert!(camera.position().abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), EPSILON));
    }

    #[test]
    fn first_move_only_records_the_cursor() {
        let mut camera = camera();
        camera.update(0.016, &cursor_at(400.0, 300.0));
        assert!((camera.yaw() + 90.0).abs() < EPSILON);
        assert!(camera.pitch().abs() < EPSILON);

        camera.update(0.016, &cursor_at(410.0, 295.0));
        assert!((camera.yaw() - (-90.0 + 10.0 * 0.2)).abs() < EPSILON);
        assert!((camera.pitch() - 5.0 * 0.2).abs() < EPSILON);
    }

    #[test]
    fn activation_resets_the_first_move_guard() {
        let mut camera = camera();
        camera.update(0.016, &cursor_at(0.0, 0.0));
        camera.activate();
        camera.update(0.016, &cursor_at(1000.0, 1000.0));
        assert!((camera.yaw() + 90.0).abs() < EPSILON);
        assert!(camera.pitch().abs() < EPSILON);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = camera();
        camera.update(0.016, &cursor_at(0.0, 0.0));
        camera.update(0.016, &cursor_at(0.0, -10_000.0));
        assert!((camera.pitch() - 89.0).abs() < EPSILON);

        camera.set_pitch(-500.0);
        assert!((camera.pitch() + 89.0).abs() < EPSILON);
    }

    #[test]
    fn view_matrix_puts_front_on_negative_z() {
        let mut camera = camera();
        camera.set_yaw(10.0);
        camera.set_pitch(20.0);

        let ahead = camera.position() + camera.front() * 5.0;
        let view = camera.view_matrix().transform_point3(ahead);
        assert!(view.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), EPSILON));
    }

    #[test]
    fn fov_defaults_to_right_angle_and_setter_clamps() {
        let mut camera = camera();
        assert!((camera.fov() - 90.0).abs() < EPSILON);
        camera.set_fov(60.0);
        assert!((camera.fov() - 45.0).abs() < EPSILON);
    }
}
