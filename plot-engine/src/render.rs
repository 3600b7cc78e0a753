use std::sync::Arc;

use glam::Mat4;
use vulkano::{
    buffer::{BufferContents, BufferUsage, Subbuffer},
    command_buffer::{
        allocator::StandardCommandBufferAllocator, AutoCommandBufferBuilder, CommandBufferUsage,
        RenderPassBeginInfo, SubpassBeginInfo, SubpassContents, SubpassEndInfo,
    },
    device::{Device, Queue},
    format::Format,
    image::{view::ImageView, Image, ImageCreateInfo, ImageType, ImageUsage},
    memory::allocator::{AllocationCreateInfo, StandardMemoryAllocator},
    pipeline::{
        graphics::{
            color_blend::{ColorBlendAttachmentState, ColorBlendState},
            depth_stencil::{DepthState, DepthStencilState},
            input_assembly::{InputAssemblyState, PrimitiveTopology},
            multisample::MultisampleState,
            rasterization::RasterizationState,
            vertex_input::{Vertex, VertexDefinition},
            viewport::{Viewport, ViewportState},
            GraphicsPipelineCreateInfo,
        },
        layout::PipelineDescriptorSetLayoutCreateInfo,
        DynamicState, GraphicsPipeline, Pipeline, PipelineLayout, PipelineShaderStageCreateInfo,
    },
    render_pass::{Framebuffer, FramebufferCreateInfo, RenderPass, Subpass},
    sync::GpuFuture,
    DeviceSize,
};

use crate::{
    control::camera::Camera,
    plot::Plot,
    shader::{PlotVertex, PushConstants},
    InitError,
};

pub mod window;

use window::Window;

#[derive(Copy, Clone, Debug)]
pub struct AcquireError;

impl std::fmt::Display for AcquireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to acquire a swapchain image")
    }
}

impl std::error::Error for AcquireError {}

#[derive(Copy, Clone, Debug)]
pub struct PresentError;

impl std::fmt::Display for PresentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to present the rendered image")
    }
}

impl std::error::Error for PresentError {}

const DEPTH_FORMAT: Format = Format::D16_UNORM;

const BOUNDARY_COLOR: [f32; 4] = [0.9, 0.9, 0.9, 1.0];
const GRID_LINE_COLOR: [f32; 4] = [0.55, 0.6, 0.65, 1.0];

#[derive(Copy, Clone, Debug, PartialEq)]
/// Color the frame is cleared with.
pub struct ClearColor(pub [f32; 3]);

impl Default for ClearColor {
    fn default() -> Self {
        Self([0.2, 0.3, 0.4])
    }
}

/// GPU copies of the plot geometry.
struct PlotBuffers {
    boundaries: Subbuffer<[PlotVertex]>,
    grid_lines: Option<Subbuffer<[PlotVertex]>>,
    surface_vertices: Subbuffer<[PlotVertex]>,
    surface_indices: Subbuffer<[u32]>,
}

pub struct Renderer {
    queue: Arc<Queue>,
    memory_allocator: Arc<StandardMemoryAllocator>,
    command_buffer_allocator: Arc<StandardCommandBufferAllocator>,
    window: Window,
    render_pass: Arc<RenderPass>,
    line_pipeline: Arc<GraphicsPipeline>,
    surface_pipeline: Arc<GraphicsPipeline>,
    framebuffers: Vec<Arc<Framebuffer>>,
    buffers: PlotBuffers,
    extent: [f32; 4],
    clear_color: ClearColor,
}

impl Renderer {
    pub fn new(
        device: &Arc<Device>,
        queue: &Arc<Queue>,
        memory_allocator: &Arc<StandardMemoryAllocator>,
        command_buffer_allocator: &Arc<StandardCommandBufferAllocator>,
        window: Window,
        plot: &Plot,
        clear_color: ClearColor,
    ) -> Result<Self, InitError> {
        let render_pass = vulkano::single_pass_renderpass!(
            device.clone(),
            attachments: {
                color: {
                    format: window.format(),
                    samples: 1,
                    load_op: Clear,
                    store_op: Store,
                },
                depth_stencil: {
                    format: DEPTH_FORMAT,
                    samples: 1,
                    load_op: Clear,
                    store_op: DontCare,
                },
            },
            pass: {
                color: [color],
                depth_stencil: {depth_stencil},
            },
        )
        .map_err(InitError::vulkan)?;
        tracing::debug!("Render pass created");

        let line_pipeline =
            Self::create_pipeline(device, &render_pass, PrimitiveTopology::LineList)?;
        let surface_pipeline =
            Self::create_pipeline(device, &render_pass, PrimitiveTopology::TriangleList)?;
        tracing::debug!("Pipelines created");

        let framebuffers =
            Self::create_framebuffers(memory_allocator, &render_pass, &window)?;

        let buffers = Self::upload_plot(memory_allocator, command_buffer_allocator, queue, plot)?;
        tracing::debug!("Plot buffers uploaded");

        let spans = plot.grid().spans();

        Ok(Self {
            queue: queue.clone(),
            memory_allocator: memory_allocator.clone(),
            command_buffer_allocator: command_buffer_allocator.clone(),
            window,
            render_pass,
            line_pipeline,
            surface_pipeline,
            framebuffers,
            buffers,
            extent: [spans.x, spans.y, spans.z, 0.0],
            clear_color,
        })
    }

    fn create_pipeline(
        device: &Arc<Device>,
        render_pass: &Arc<RenderPass>,
        topology: PrimitiveTopology,
    ) -> Result<Arc<GraphicsPipeline>, InitError> {
        let missing_entry_point = || InitError::Vulkan("shader has no main".to_string());

        let vs = crate::shader::source::load_vertex(device.clone())
            .map_err(InitError::vulkan)?
            .entry_point("main")
            .ok_or_else(missing_entry_point)?;
        let fs = crate::shader::source::load_fragment(device.clone())
            .map_err(InitError::vulkan)?
            .entry_point("main")
            .ok_or_else(missing_entry_point)?;
        tracing::trace!("Shaders loaded");

        let vertex_input_state = PlotVertex::per_vertex()
            .definition(&vs.info().input_interface)
            .map_err(InitError::vulkan)?;

        let stages = [
            PipelineShaderStageCreateInfo::new(vs),
            PipelineShaderStageCreateInfo::new(fs),
        ];

        let layout = PipelineLayout::new(
            device.clone(),
            PipelineDescriptorSetLayoutCreateInfo::from_stages(&stages)
                .into_pipeline_layout_create_info(device.clone())
                .map_err(InitError::vulkan)?,
        )
        .map_err(InitError::vulkan)?;

        let subpass = Subpass::from(render_pass.clone(), 0)
            .ok_or_else(|| InitError::Vulkan("render pass has no subpass".to_string()))?;

        GraphicsPipeline::new(
            device.clone(),
            None,
            GraphicsPipelineCreateInfo {
                stages: stages.into_iter().collect(),
                vertex_input_state: Some(vertex_input_state),
                input_assembly_state: Some(InputAssemblyState {
                    topology,
                    ..Default::default()
                }),
                viewport_state: Some(ViewportState::default()),
                rasterization_state: Some(RasterizationState::default()),
                multisample_state: Some(MultisampleState::default()),
                color_blend_state: Some(ColorBlendState::with_attachment_states(
                    subpass.num_color_attachments(),
                    ColorBlendAttachmentState::default(),
                )),
                depth_stencil_state: Some(DepthStencilState {
                    depth: Some(DepthState::simple()),
                    ..Default::default()
                }),
                dynamic_state: [DynamicState::Viewport].into_iter().collect(),
                subpass: Some(subpass.into()),
                ..GraphicsPipelineCreateInfo::layout(layout)
            },
        )
        .map_err(InitError::vulkan)
    }

    /// One framebuffer per swapchain image, sharing a single depth buffer.
    fn create_framebuffers(
        memory_allocator: &Arc<StandardMemoryAllocator>,
        render_pass: &Arc<RenderPass>,
        window: &Window,
    ) -> Result<Vec<Arc<Framebuffer>>, InitError> {
        let (width, height) = window.size();

        let depth_buffer = ImageView::new_default(
            Image::new(
                memory_allocator.clone(),
                ImageCreateInfo {
                    image_type: ImageType::Dim2d,
                    format: DEPTH_FORMAT,
                    extent: [width, height, 1],
                    usage: ImageUsage::DEPTH_STENCIL_ATTACHMENT | ImageUsage::TRANSIENT_ATTACHMENT,
                    ..Default::default()
                },
                AllocationCreateInfo::default(),
            )
            .map_err(InitError::vulkan)?,
        )
        .map_err(InitError::vulkan)?;

        window
            .views()
            .iter()
            .map(|view| {
                Framebuffer::new(
                    render_pass.clone(),
                    FramebufferCreateInfo {
                        attachments: vec![view.clone(), depth_buffer.clone()],
                        ..Default::default()
                    },
                )
                .map_err(InitError::vulkan)
            })
            .collect()
    }

    fn upload_plot(
        memory_allocator: &Arc<StandardMemoryAllocator>,
        command_buffer_allocator: &Arc<StandardCommandBufferAllocator>,
        queue: &Arc<Queue>,
        plot: &Plot,
    ) -> Result<PlotBuffers, InitError> {
        let grid = plot.grid();
        let mesh = plot.mesh();

        let (boundaries, boundaries_future) = crate::buffer::send_to_device(
            memory_allocator,
            command_buffer_allocator,
            queue,
            BufferUsage::VERTEX_BUFFER,
            grid.boundary_segments().into_iter().map(PlotVertex::from),
        )?;

        // A single tile has no interior lines, and empty buffers are invalid.
        let grid_lines = if grid.grid_lines().is_empty() {
            None
        } else {
            let (buffer, future) = crate::buffer::send_to_device(
                memory_allocator,
                command_buffer_allocator,
                queue,
                BufferUsage::VERTEX_BUFFER,
                grid.grid_lines().iter().copied().map(PlotVertex::from),
            )?;
            future.wait(None).map_err(InitError::vulkan)?;
            Some(buffer)
        };

        let (surface_indices, indices_future) = crate::buffer::send_to_device(
            memory_allocator,
            command_buffer_allocator,
            queue,
            BufferUsage::INDEX_BUFFER,
            mesh.indices().iter().copied(),
        )?;

        let surface_vertices = crate::buffer::new_host_vertices::<PlotVertex>(
            memory_allocator,
            mesh.vertices().len() as DeviceSize,
        )
        .map_err(InitError::vulkan)?;
        Self::write_vertices(&surface_vertices, mesh.vertices()).map_err(InitError::vulkan)?;

        boundaries_future.wait(None).map_err(InitError::vulkan)?;
        indices_future.wait(None).map_err(InitError::vulkan)?;

        Ok(PlotBuffers {
            boundaries,
            grid_lines,
            surface_vertices,
            surface_indices,
        })
    }

    fn write_vertices(
        buffer: &Subbuffer<[PlotVertex]>,
        vertices: &[[f32; 3]],
    ) -> Result<(), vulkano::sync::HostAccessError> {
        let mut content = buffer.write()?;
        for (dst, src) in content.iter_mut().zip(vertices) {
            *dst = PlotVertex::from(*src);
        }
        Ok(())
    }

    /// Copies the current surface heights to the GPU.
    ///
    /// Frames are waited on before returning from `render`, so the buffer is
    /// never in use by the device here.
    pub fn upload_surface(&self, plot: &Plot) {
        if let Err(e) = Self::write_vertices(&self.buffers.surface_vertices, plot.mesh().vertices())
        {
            tracing::warn!("Surface upload skipped: {e}");
        }
    }

    /// Requests a swapchain recreation before the next frame.
    pub fn resize(&mut self) {
        self.window.invalidate();
    }

    /// Draws the boundaries, grid lines and surface seen from `camera`.
    ///
    /// Frames that cannot be acquired, e.g. while minimized, are skipped.
    pub fn render(&mut self, camera: &dyn Camera) -> Result<(), Box<dyn std::error::Error>> {
        let Ok((image_index, recreated, acquire_future)) = self.window.acquire() else {
            return Ok(());
        };

        if recreated {
            self.framebuffers =
                Self::create_framebuffers(&self.memory_allocator, &self.render_pass, &self.window)?;
            tracing::trace!("Framebuffers recreated");
        }

        let (width, height) = self.window.size();
        #[allow(clippy::cast_precision_loss)]
        let viewport = Viewport {
            offset: [0.0, 0.0],
            extent: [width as f32, height as f32],
            depth_range: 0.0..=1.0,
        };

        let mvp = model_view_projection(camera);
        let push_constants = |color: [f32; 4], height_colored: bool| PushConstants {
            mvp: mvp.to_cols_array_2d(),
            color,
            extent: [
                self.extent[0],
                self.extent[1],
                self.extent[2],
                if height_colored { 1.0 } else { 0.0 },
            ],
        };

        let [r, g, b] = self.clear_color.0;
        let framebuffer = self.framebuffers[image_index as usize].clone();

        let mut builder = AutoCommandBufferBuilder::primary(
            &self.command_buffer_allocator,
            self.queue.queue_family_index(),
            CommandBufferUsage::OneTimeSubmit,
        )?;

        builder
            .begin_render_pass(
                RenderPassBeginInfo {
                    clear_values: vec![Some([r, g, b, 1.0].into()), Some(1f32.into())],
                    ..RenderPassBeginInfo::framebuffer(framebuffer)
                },
                SubpassBeginInfo {
                    contents: SubpassContents::Inline,
                    ..Default::default()
                },
            )?
            .set_viewport(0, [viewport].into_iter().collect())?
            .bind_pipeline_graphics(self.line_pipeline.clone())?
            .push_constants(
                self.line_pipeline.layout().clone(),
                0,
                push_constants(BOUNDARY_COLOR, false),
            )?
            .bind_vertex_buffers(0, self.buffers.boundaries.clone())?
            .draw(element_count(&self.buffers.boundaries), 1, 0, 0)?;

        if let Some(grid_lines) = &self.buffers.grid_lines {
            builder
                .push_constants(
                    self.line_pipeline.layout().clone(),
                    0,
                    push_constants(GRID_LINE_COLOR, false),
                )?
                .bind_vertex_buffers(0, grid_lines.clone())?
                .draw(element_count(grid_lines), 1, 0, 0)?;
        }

        builder
            .bind_pipeline_graphics(self.surface_pipeline.clone())?
            .push_constants(
                self.surface_pipeline.layout().clone(),
                0,
                push_constants([1.0; 4], true),
            )?
            .bind_vertex_buffers(0, self.buffers.surface_vertices.clone())?
            .bind_index_buffer(self.buffers.surface_indices.clone())?
            .draw_indexed(element_count(&self.buffers.surface_indices), 1, 0, 0, 0)?
            .end_render_pass(SubpassEndInfo::default())?;

        let command_buffer = builder.build()?;

        let render_future = acquire_future
            .then_execute(self.queue.clone(), command_buffer)?
            .boxed();

        self.window.present(render_future, &self.queue)?;

        Ok(())
    }
}

#[allow(clippy::cast_possible_truncation)]
fn element_count<T: BufferContents>(buffer: &Subbuffer<[T]>) -> u32 {
    buffer.len() as u32
}

/// Combined transform applied to the plot by the shader.
#[must_use]
pub fn model_view_projection(camera: &dyn Camera) -> Mat4 {
    camera.projection_matrix() * camera.view_matrix() * camera.model_matrix()
}
