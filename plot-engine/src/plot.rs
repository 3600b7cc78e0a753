//! Geometry of the plot: the boundary box with its grid lines, and the
//! animated surface.

pub mod animation;
pub mod grid;
pub mod mesh;
pub mod surface;

use glam::Vec3;

pub use animation::RegenerationClock;
pub use grid::PlotGrid;
pub use mesh::PlotMesh;
pub use surface::{MovingBump, Surface};

#[derive(Copy, Clone, Debug, PartialEq)]
/// Extent of the plot along each axis, starting at the origin.
pub struct Spans {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Spans {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Center of the plot box.
    #[must_use]
    pub fn center(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z) / 2.0
    }

    fn validate(self) -> Result<(), GeometryError> {
        for (axis, value) in [('x', self.x), ('y', self.y), ('z', self.z)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GeometryError::InvalidSpan { axis, value });
            }
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Number of surface vertices along X and Z.
pub struct Resolution {
    pub x: u32,
    pub z: u32,
}

impl Resolution {
    #[must_use]
    pub const fn vertex_count(self) -> usize {
        self.x as usize * self.z as usize
    }

    #[must_use]
    pub const fn index_count(self) -> usize {
        self.x.saturating_sub(1) as usize * self.z.saturating_sub(1) as usize * 6
    }

    fn validate(self) -> Result<(), GeometryError> {
        if self.x < 2 || self.z < 2 {
            return Err(GeometryError::ResolutionTooLow {
                x: self.x,
                z: self.z,
            });
        }
        if u32::try_from(self.vertex_count()).is_err() {
            return Err(GeometryError::TooManyVertices(self.vertex_count()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GeometryError {
    /// A span is zero, negative or not finite.
    InvalidSpan { axis: char, value: f32 },
    /// The grid needs at least one tile per axis.
    NoTiles,
    /// The surface needs at least two vertices per axis.
    ResolutionTooLow { x: u32, z: u32 },
    /// Vertex indices would not fit in `u32`.
    TooManyVertices(usize),
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSpan { axis, value } => {
                write!(f, "span along {axis} must be positive and finite, got {value}")
            }
            Self::NoTiles => write!(f, "tile count must be at least 1"),
            Self::ResolutionTooLow { x, z } => {
                write!(f, "surface resolution must be at least 2x2, got {x}x{z}")
            }
            Self::TooManyVertices(count) => {
                write!(f, "{count} surface vertices cannot be indexed with u32")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

#[derive(Copy, Clone, Debug, PartialEq)]
/// Describes the plot to generate.
pub struct PlotDescriptor {
    pub spans: Spans,
    /// Tiles per axis of the grid faces.
    pub tile_count: u32,
    pub resolution: Resolution,
    /// Seconds between two samplings of the surface.
    pub regeneration_interval: f32,
}

impl Default for PlotDescriptor {
    fn default() -> Self {
        Self {
            spans: Spans::new(9.0, 9.0, 16.0),
            tile_count: 10,
            resolution: Resolution { x: 100, z: 100 },
            regeneration_interval: RegenerationClock::DEFAULT_INTERVAL,
        }
    }
}

/// The plotted scene: static grid plus an animated surface.
pub struct Plot {
    grid: PlotGrid,
    mesh: PlotMesh,
    surface: Box<dyn Surface>,
    clock: RegenerationClock,
}

impl Plot {
    /// Builds the grid and samples the surface at time zero.
    pub fn new(
        descriptor: &PlotDescriptor,
        surface: Box<dyn Surface>,
    ) -> Result<Self, GeometryError> {
        let grid = PlotGrid::new(descriptor.spans, descriptor.tile_count)?;
        let mut mesh = PlotMesh::new(descriptor.spans, descriptor.resolution)?;
        mesh.construct(surface.as_ref(), 0.0);

        tracing::debug!(
            "Plot generated: {} grid vertices, {} surface vertices",
            grid.grid_lines().len() + grid.boundaries().len(),
            mesh.vertices().len()
        );

        Ok(Self {
            grid,
            mesh,
            surface,
            clock: RegenerationClock::new(descriptor.regeneration_interval),
        })
    }

    #[must_use]
    pub const fn grid(&self) -> &PlotGrid {
        &self.grid
    }

    #[must_use]
    pub const fn mesh(&self) -> &PlotMesh {
        &self.mesh
    }

    /// Point the centered camera orbits around.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.grid.spans().center()
    }

    /// Advances the animation by a frame.
    ///
    /// Returns `true` when the surface was sampled again and must be uploaded.
    pub fn advance(&mut self, delta_seconds: f32) -> bool {
        let Some(time) = self.clock.tick(delta_seconds) else {
            return false;
        };

        self.mesh.construct(self.surface.as_ref(), time);
        tracing::trace!("Surface regenerated at t = {time:.3}");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_reject_non_positive_values() {
        assert_eq!(
            Spans::new(1.0, 0.0, 1.0).validate(),
            Err(GeometryError::InvalidSpan {
                axis: 'y',
                value: 0.0
            })
        );
        assert!(Spans::new(1.0, 1.0, f32::NAN).validate().is_err());
        assert!(Spans::new(-1.0, 1.0, 1.0).validate().is_err());
    }

    #[test]
    fn center_is_half_the_spans() {
        assert_eq!(Spans::new(9.0, 9.0, 16.0).center(), Vec3::new(4.5, 4.5, 8.0));
    }

    #[test]
    fn error_messages_name_the_problem() {
        let message = GeometryError::ResolutionTooLow { x: 1, z: 5 }.to_string();
        assert!(message.contains("1x5"));
    }

    #[test]
    fn advance_regenerates_on_interval() {
        let descriptor = PlotDescriptor {
            resolution: Resolution { x: 4, z: 4 },
            ..PlotDescriptor::default()
        };
        let mut plot = Plot::new(&descriptor, Box::new(|_: f32, _: f32, t: f32| t)).unwrap();
        assert!(plot.mesh().vertices().iter().all(|v| v[1] == 0.0));

        assert!(!plot.advance(0.0625));
        assert!(plot.advance(0.0625));
        assert!(plot.mesh().vertices().iter().all(|v| v[1] == 0.125 * 9.0));
    }
}
