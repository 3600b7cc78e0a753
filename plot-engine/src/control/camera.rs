pub mod centered;
pub mod flying;

use glam::{Mat4, Vec3};

use super::InputState;

/// Represents a camera.
///
/// All matrices follow the `glam` column-vector convention and map to the
/// Vulkan clip volume (depth in `[0, 1]`).
pub trait Camera {
    /// Returns the position of the camera in world coordinates.
    fn position(&self) -> Vec3;

    /// Returns the model matrix.
    ///
    /// World coordinates map 1:1 to the plot, so this is the identity.
    fn model_matrix(&self) -> Mat4 {
        Mat4::IDENTITY
    }

    /// Returns the world-to-view matrix.
    fn view_matrix(&self) -> Mat4;

    /// Returns the view-to-clip matrix.
    fn projection_matrix(&self) -> Mat4;

    /// Sets the viewport aspect ratio (width / height) used for perspective.
    fn set_aspect_ratio(&mut self, aspect_ratio: f32);

    /// Called when the camera becomes the active one.
    fn activate(&mut self) {}

    /// Processes the inputs of a frame and updates the camera.
    fn update(&mut self, delta_seconds: f32, input: &InputState);
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// Tuning shared by the camera controls.
pub struct CameraSettings {
    /// Translation speed of the flying camera, in world units per second.
    pub speed: f32,
    /// Scale applied to mouse movements.
    pub sensitivity: f32,
    /// Rotation speed of the centered camera keys, in radians per second.
    pub orbit_speed: f32,
    /// Fraction of the distance to the center covered by one wheel tick.
    pub zoom_step: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            speed: 1.5,
            sensitivity: 0.2,
            orbit_speed: 0.5,
            zoom_step: 0.1,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CameraKind {
    Centered,
    Flying,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Projection {
    Perspective,
    Orthographic,
}

impl Projection {
    const NEAR: f32 = 0.01;
    const FAR: f32 = 100.0;
    /// Width and height of the orthographic volume.
    const ORTHOGRAPHIC_SIZE: f32 = 20.0;
    /// Half depth of the orthographic volume.
    const ORTHOGRAPHIC_DEPTH: f32 = 100.0;

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Perspective => Self::Orthographic,
            Self::Orthographic => Self::Perspective,
        }
    }

    /// Builds the projection matrix, `fov` being the vertical field of view in radians.
    #[must_use]
    pub fn matrix(self, fov: f32, aspect_ratio: f32) -> Mat4 {
        match self {
            Self::Perspective => Mat4::perspective_rh(fov, aspect_ratio, Self::NEAR, Self::FAR),
            Self::Orthographic => {
                let half = Self::ORTHOGRAPHIC_SIZE / 2.0;
                Mat4::orthographic_rh(
                    -half,
                    half,
                    -half,
                    half,
                    -Self::ORTHOGRAPHIC_DEPTH,
                    Self::ORTHOGRAPHIC_DEPTH,
                )
            }
        }
    }
}

/// Field of view limits (degrees) enforced by the camera setters.
const MIN_FOV: f32 = 1.0;
const MAX_FOV: f32 = 45.0;

/// The cameras of the scene, one of which is active.
pub struct CameraSet {
    cameras: Vec<(CameraKind, Box<dyn Camera>)>,
    active: usize,
}

impl CameraSet {
    /// Creates a set holding a single, active camera.
    #[must_use]
    pub fn new(kind: CameraKind, camera: Box<dyn Camera>) -> Self {
        Self {
            cameras: vec![(kind, camera)],
            active: 0,
        }
    }

    /// Appends a camera, leaving the active one unchanged.
    #[must_use]
    pub fn with(mut self, kind: CameraKind, camera: Box<dyn Camera>) -> Self {
        self.cameras.push((kind, camera));
        self
    }

    /// Makes the first camera of the given kind active, if there is one.
    pub fn select(&mut self, kind: CameraKind) {
        if let Some(index) = self.cameras.iter().position(|(k, _)| *k == kind) {
            self.active = index;
            self.cameras[index].1.activate();
        }
    }

    /// Switches to the next camera and returns its kind.
    pub fn cycle(&mut self) -> CameraKind {
        self.active = (self.active + 1) % self.cameras.len();
        let (kind, camera) = &mut self.cameras[self.active];
        camera.activate();
        tracing::debug!("Switched to {kind:?} camera");
        *kind
    }

    #[must_use]
    pub fn active_kind(&self) -> CameraKind {
        self.cameras[self.active].0
    }

    #[must_use]
    pub fn active(&self) -> &dyn Camera {
        self.cameras[self.active].1.as_ref()
    }

    #[must_use]
    pub fn active_mut(&mut self) -> &mut dyn Camera {
        self.cameras[self.active].1.as_mut()
    }

    /// Forwards the new aspect ratio to every camera, active or not.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        for (_, camera) in &mut self.cameras {
            camera.set_aspect_ratio(aspect_ratio);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe;

    impl Camera for Probe {
        fn position(&self) -> Vec3 {
            Vec3::ZERO
        }

        fn view_matrix(&self) -> Mat4 {
            Mat4::IDENTITY
        }

        fn projection_matrix(&self) -> Mat4 {
            Mat4::IDENTITY
        }

        fn set_aspect_ratio(&mut self, _aspect_ratio: f32) {}

        fn update(&mut self, _delta_seconds: f32, _input: &InputState) {}
    }

    fn probe_set() -> CameraSet {
        CameraSet::new(CameraKind::Centered, Box::new(Probe))
            .with(CameraKind::Flying, Box::new(Probe))
    }

    #[test]
    fn cycle_wraps_around() {
        let mut set = probe_set();
        assert_eq!(set.active_kind(), CameraKind::Centered);
        assert_eq!(set.cycle(), CameraKind::Flying);
        assert_eq!(set.cycle(), CameraKind::Centered);
    }

    #[test]
    fn select_unknown_kind_keeps_active_camera() {
        let mut set = CameraSet::new(CameraKind::Flying, Box::new(Probe));
        set.select(CameraKind::Centered);
        assert_eq!(set.active_kind(), CameraKind::Flying);
    }

    #[test]
    fn default_model_matrix_is_identity() {
        assert_eq!(Probe.model_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn projection_toggle_round_trips() {
        assert_eq!(Projection::Perspective.toggled(), Projection::Orthographic);
        assert_eq!(
            Projection::Perspective.toggled().toggled(),
            Projection::Perspective
        );
    }

    #[test]
    fn orthographic_maps_volume_edges() {
        let matrix = Projection::Orthographic.matrix(1.0, 1.0);
        let corner = matrix.project_point3(Vec3::new(10.0, 10.0, 0.0));
        assert!((corner.x - 1.0).abs() < 1e-5);
        assert!((corner.y - 1.0).abs() < 1e-5);
    }
}
