use super::{GeometryError, Resolution, Spans, Surface};

#[derive(Clone, Debug, PartialEq)]
/// Regular grid of vertices over the XZ plane, lifted by a height-field.
///
/// Vertices are stored row by row (`index = x + z * x_res`); the triangle
/// indices only depend on the resolution and are built once.
pub struct PlotMesh {
    spans: Spans,
    vertices: Vec<[f32; 3]>,
    indices: Vec<u32>,
}

impl PlotMesh {
    /// Creates a flat mesh. Call `construct` to sample a surface.
    pub fn new(spans: Spans, resolution: Resolution) -> Result<Self, GeometryError> {
        spans.validate()?;
        resolution.validate()?;

        let Resolution { x: x_res, z: z_res } = resolution;
        #[allow(clippy::cast_precision_loss)]
        let (dx, dz) = (spans.x / (x_res - 1) as f32, spans.z / (z_res - 1) as f32);

        #[allow(clippy::cast_precision_loss)]
        let vertices = (0..z_res)
            .flat_map(|z| (0..x_res).map(move |x| [x as f32 * dx, 0.0, z as f32 * dz]))
            .collect();

        Ok(Self {
            spans,
            vertices,
            indices: Self::triangulate(resolution),
        })
    }

    /// Two triangles per grid quad, all with the same winding.
    fn triangulate(resolution: Resolution) -> Vec<u32> {
        let Resolution { x: x_res, z: z_res } = resolution;
        let mut indices = Vec::with_capacity(resolution.index_count());

        for z in 0..z_res - 1 {
            for x in 0..x_res - 1 {
                let i = x + z * x_res;
                indices.extend([i, i + x_res + 1, i + x_res, i, i + 1, i + x_res + 1]);
            }
        }

        indices
    }

    /// Samples `surface` at `time` and updates the vertex heights.
    pub fn construct(&mut self, surface: &dyn Surface, time: f32) {
        let y_span = self.spans.y;
        for vertex in &mut self.vertices {
            vertex[1] = surface.height(vertex[0], vertex[2], time) * y_span;
        }
    }

    #[must_use]
    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}
