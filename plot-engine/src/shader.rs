pub(crate) mod source {
    vulkano_shaders::shader! {
        shaders: {
            vertex: {
                ty: "vertex",
                path: r"src/shader/plot.vert",
            },
            fragment: {
                ty: "fragment",
                path: r"src/shader/plot.frag",
            },
        }
    }
}

pub use source::PushConstants;

use vulkano::buffer::BufferContents;
use vulkano::pipeline::graphics::vertex_input::Vertex;

#[derive(BufferContents, Vertex, Copy, Clone, Debug, PartialEq)]
#[repr(C)]
/// Vertex layout shared by the grid lines and the surface.
pub struct PlotVertex {
    #[format(R32G32B32_SFLOAT)]
    pub position: [f32; 3],
}

impl From<[f32; 3]> for PlotVertex {
    #[inline]
    fn from(position: [f32; 3]) -> Self {
        Self { position }
    }
}
