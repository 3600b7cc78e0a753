use std::sync::Arc;

use vulkano::{
    device::{Device, Queue},
    image::{view::ImageView, Image, ImageUsage},
    swapchain::{self, Surface, SurfaceInfo, Swapchain, SwapchainCreateInfo},
    sync::GpuFuture,
};
use winit::dpi::LogicalSize;

use crate::InitError;

/// Represents the plot window and its swapchain.
pub struct Window {
    /// Inner `winit` window.
    window: Arc<winit::window::Window>,
    /// The swapchain of the window.
    swapchain: Arc<Swapchain>,
    /// The final views of the swapchain.
    image_views: Vec<Arc<ImageView>>,
    /// Whether the swapchain needs to be recreated.
    recreate_swapchain: bool,
    /// The index of the image to be rendered.
    image_index: u32,
}

impl Window {
    /// Builds the `winit` window described by `window_descriptor`.
    pub fn build(
        event_loop: &winit::event_loop::EventLoop<()>,
        window_descriptor: &WindowDescriptor,
    ) -> Result<Arc<winit::window::Window>, InitError> {
        let mut winit_window_builder =
            winit::window::WindowBuilder::new().with_title(&window_descriptor.title);

        winit_window_builder = match window_descriptor.mode {
            Mode::BorderlessFullscreen => winit_window_builder.with_fullscreen(Some(
                winit::window::Fullscreen::Borderless(event_loop.primary_monitor()),
            )),
            Mode::Windowed => {
                let WindowDescriptor {
                    width,
                    height,
                    position,
                    ..
                } = window_descriptor;

                if let Some(position) = position {
                    winit_window_builder =
                        winit_window_builder.with_position(winit::dpi::LogicalPosition::new(
                            f64::from(position[0]),
                            f64::from(position[1]),
                        ));
                }
                winit_window_builder.with_inner_size(LogicalSize::new(*width, *height))
            }
        }
        .with_resizable(window_descriptor.resizable);

        let constraints = window_descriptor.resize_constraints.check_constraints();
        let min_inner_size = LogicalSize {
            width: constraints.min_width,
            height: constraints.min_height,
        };
        let max_inner_size = LogicalSize {
            width: constraints.max_width,
            height: constraints.max_height,
        };

        winit_window_builder =
            if constraints.max_width < u32::MAX && constraints.max_height < u32::MAX {
                winit_window_builder
                    .with_min_inner_size(min_inner_size)
                    .with_max_inner_size(max_inner_size)
            } else {
                winit_window_builder.with_min_inner_size(min_inner_size)
            };

        let winit_window = winit_window_builder
            .build(event_loop)
            .map_err(InitError::Window)?;

        if let Some(monitor) = winit_window.current_monitor() {
            if let Some(name) = monitor.name() {
                tracing::info!("Window created on monitor {}", name);
            }
        }

        winit_window.set_cursor_visible(window_descriptor.cursor_visible);

        Ok(Arc::new(winit_window))
    }

    /// Creates the swapchain of an already built window.
    pub fn new(
        window: Arc<winit::window::Window>,
        surface: Arc<Surface>,
        device: &Arc<Device>,
        window_descriptor: &WindowDescriptor,
    ) -> Result<Self, InitError> {
        let (swapchain, image_views) =
            Self::create_swapchain(device.clone(), &window, surface, window_descriptor)?;

        Ok(Self {
            window,
            swapchain,
            image_views,
            recreate_swapchain: false,
            image_index: 0,
        })
    }

    fn create_swapchain(
        device: Arc<Device>,
        window: &Arc<winit::window::Window>,
        surface: Arc<Surface>,
        window_descriptor: &WindowDescriptor,
    ) -> Result<(Arc<Swapchain>, Vec<Arc<ImageView>>), InitError> {
        let physical_device = device.physical_device();
        let surface_capabilities = physical_device
            .surface_capabilities(&surface, SurfaceInfo::default())
            .map_err(InitError::vulkan)?;

        let (image_format, _) = physical_device
            .surface_formats(&surface, SurfaceInfo::default())
            .map_err(InitError::vulkan)?
            .first()
            .copied()
            .ok_or_else(|| InitError::Vulkan("surface reports no format".to_string()))?;

        let present_mode = if physical_device
            .surface_present_modes(&surface, SurfaceInfo::default())
            .map_err(InitError::vulkan)?
            .any(|p| p == window_descriptor.present_mode.into())
        {
            window_descriptor.present_mode
        } else {
            /// This present mode is guaranteed to be supported,
            /// so we can safely fall back to it.
            const FALLBACK_PRESENT_MODE: PresentMode = PresentMode::Fifo;
            tracing::warn!(
                "request present mode {:?} not supported, falling back to {:?}",
                window_descriptor.present_mode,
                FALLBACK_PRESENT_MODE
            );
            FALLBACK_PRESENT_MODE
        };

        let composite_alpha = surface_capabilities
            .supported_composite_alpha
            .into_iter()
            .next()
            .ok_or_else(|| InitError::Vulkan("surface supports no composite alpha".to_string()))?;

        let (swapchain, images) = Swapchain::new(
            device,
            surface,
            SwapchainCreateInfo {
                min_image_count: Self::image_count(
                    surface_capabilities.min_image_count,
                    surface_capabilities.max_image_count,
                ),
                image_format,
                image_extent: window.inner_size().into(),
                image_usage: ImageUsage::COLOR_ATTACHMENT,
                composite_alpha,
                present_mode: present_mode.into(),
                ..Default::default()
            },
        )
        .map_err(InitError::vulkan)?;

        tracing::debug!(
            "Swapchain created: {} images of {:?}",
            images.len(),
            image_format
        );

        Ok((swapchain, Self::create_views(images)?))
    }

    /// One image more than the minimum, within what the surface allows.
    fn image_count(min_image_count: u32, max_image_count: Option<u32>) -> u32 {
        (min_image_count + 1).min(max_image_count.unwrap_or(u32::MAX))
    }

    fn create_views(images: Vec<Arc<Image>>) -> Result<Vec<Arc<ImageView>>, InitError> {
        images
            .into_iter()
            .map(|image| ImageView::new_default(image).map_err(InitError::vulkan))
            .collect()
    }

    /// Recreates the swapchain and its views.
    ///
    /// Returns `false` while the window is minimized.
    fn recreate_swapchain_and_views(&mut self) -> Result<bool, super::AcquireError> {
        let [desired_width, desired_height]: [u32; 2] = self.window.inner_size().into();

        if desired_width == 0 || desired_height == 0 {
            return Ok(false);
        }

        let (new_swapchain, new_images) = self
            .swapchain
            .recreate(SwapchainCreateInfo {
                image_extent: [desired_width, desired_height],
                ..self.swapchain.create_info()
            })
            .map_err(|e| {
                tracing::error!("Failed to recreate swapchain: {e}");
                super::AcquireError
            })?;

        self.swapchain = new_swapchain;
        self.image_views = Self::create_views(new_images).map_err(|e| {
            tracing::error!("{e}");
            super::AcquireError
        })?;
        self.recreate_swapchain = false;

        tracing::debug!("Swapchain recreated at {desired_width}x{desired_height}");

        Ok(true)
    }

    #[must_use]
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        let [width, height] = self.swapchain.image_extent();
        (width, height)
    }

    #[must_use]
    #[inline]
    pub fn format(&self) -> vulkano::format::Format {
        self.swapchain.image_format()
    }

    #[must_use]
    #[inline]
    pub fn views(&self) -> &[Arc<ImageView>] {
        &self.image_views
    }

    /// Marks the swapchain as outdated, e.g. after a resize.
    pub fn invalidate(&mut self) {
        self.recreate_swapchain = true;
    }

    /// Acquires the next image to be rendered.
    ///
    /// Returns the image index, whether the views were recreated since the
    /// last frame, and the future to wait for before drawing.
    ///
    /// ## Errors
    ///
    /// The function will return a non-fatal error if no image could be
    /// acquired; the frame should be skipped.
    pub fn acquire(&mut self) -> Result<(u32, bool, Box<dyn GpuFuture>), super::AcquireError> {
        let mut recreated = false;
        if self.recreate_swapchain {
            recreated = self.recreate_swapchain_and_views()?;
            if !recreated {
                return Err(super::AcquireError);
            }
        }

        let (image_index, suboptimal, acquire_future) =
            match swapchain::acquire_next_image(self.swapchain.clone(), None)
                .map_err(vulkano::Validated::unwrap)
            {
                Ok(r) => r,
                Err(vulkano::VulkanError::OutOfDate) => {
                    self.recreate_swapchain = true;
                    return Err(super::AcquireError);
                }
                Err(e) => {
                    tracing::error!("Failed to acquire next image: {e}");
                    return Err(super::AcquireError);
                }
            };

        self.recreate_swapchain |= suboptimal;
        self.image_index = image_index;

        Ok((image_index, recreated, acquire_future.boxed()))
    }

    /// Presents the rendered image to the swapchain and waits for the frame.
    ///
    /// ## Errors
    ///
    /// The function will return a non-fatal error if the swapchain couldn't be presented.
    pub fn present(
        &mut self,
        render_future: Box<dyn GpuFuture>,
        queue: &Arc<Queue>,
    ) -> Result<(), super::PresentError> {
        let future = render_future
            .then_swapchain_present(
                queue.clone(),
                swapchain::SwapchainPresentInfo::swapchain_image_index(
                    self.swapchain.clone(),
                    self.image_index,
                ),
            )
            .then_signal_fence_and_flush();

        match future.map_err(vulkano::Validated::unwrap) {
            Ok(future) => {
                future.wait(None).unwrap_or_else(|e| {
                    tracing::error!("An error occured while rendering next frame: {e}");
                });
                Ok(())
            }
            Err(vulkano::VulkanError::OutOfDate) => {
                self.recreate_swapchain = true;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to flush rendering future: {e}");
                Err(super::PresentError)
            }
        }
    }
}

#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Represents the mode of the window.
pub enum Mode {
    Windowed,
    BorderlessFullscreen,
}

#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone)]
/// Represents a window descriptor.
pub struct WindowDescriptor {
    pub width: u32,
    pub height: u32,
    pub position: Option<[f32; 2]>,
    pub resize_constraints: ResizeConstraints,
    pub title: String,
    pub resizable: bool,
    pub cursor_visible: bool,
    pub mode: Mode,
    pub present_mode: PresentMode,
}

impl Default for WindowDescriptor {
    fn default() -> Self {
        Self {
            title: "Plotter".to_string(),
            width: 1920,
            height: 1080,
            position: None,
            resize_constraints: ResizeConstraints::default(),
            resizable: true,
            cursor_visible: true,
            mode: Mode::Windowed,
            present_mode: PresentMode::Fifo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Represents the present mode of the window.
pub enum PresentMode {
    /// The image is presented immediately.
    Immediate,
    /// Images get queued and the first one is presented.
    Mailbox,
    /// Two imaages are queued and the first one is presented.
    ///
    /// This present mode is the only one to be guaranteed to be supported.
    Fifo,
}

impl From<PresentMode> for vulkano::swapchain::PresentMode {
    fn from(mode: PresentMode) -> Self {
        match mode {
            PresentMode::Immediate => Self::Immediate,
            PresentMode::Mailbox => Self::Mailbox,
            PresentMode::Fifo => Self::Fifo,
        }
    }
}

#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Represents the constraints for resizing a window.
pub struct ResizeConstraints {
    /// The minimum width of the window.
    pub min_width: u32,
    /// The minimum height of the window.
    pub min_height: u32,
    /// The maximum width of the window.
    pub max_width: u32,
    /// The maximum height of the window.
    pub max_height: u32,
}

impl Default for ResizeConstraints {
    fn default() -> Self {
        Self {
            min_width: 180,
            min_height: 120,
            max_width: u32::MAX,
            max_height: u32::MAX,
        }
    }
}

impl ResizeConstraints {
    #[must_use]
    /// Checks the constraints and returns a new `ResizeConstraints` with valid values.
    pub fn check_constraints(&self) -> Self {
        let min_width = self.min_width.max(1);
        let min_height = self.min_height.max(1);

        if self.max_width < min_width {
            tracing::debug!(
                "The given maximum width {} is smaller than the minimum width {}",
                self.max_width,
                min_width
            );
        }
        if self.max_height < min_height {
            tracing::debug!(
                "The given maximum height {} is smaller than the minimum height {}",
                self.max_height,
                min_height
            );
        }

        Self {
            min_width,
            min_height,
            max_width: self.max_width.max(min_width),
            max_height: self.max_height.max(min_height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraints_keep_max_above_min() {
        let constraints = ResizeConstraints {
            min_width: 0,
            min_height: 300,
            max_width: 800,
            max_height: 200,
        }
        .check_constraints();

        assert_eq!(constraints.min_width, 1);
        assert_eq!(constraints.max_width, 800);
        assert_eq!(constraints.max_height, 300);
    }

    #[test]
    fn image_count_respects_surface_maximum() {
        assert_eq!(Window::image_count(2, None), 3);
        assert_eq!(Window::image_count(2, Some(8)), 3);
        assert_eq!(Window::image_count(3, Some(3)), 3);
    }
}
