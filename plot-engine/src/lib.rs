#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::sync::Arc;

use control::{
    camera::{centered::Centered, flying::Flying, CameraKind, CameraSet, CameraSettings},
    controller::{keyboard::Keyboard, mouse::Mouse, Controller},
};
use glam::Vec3;
use plot::{MovingBump, Plot, PlotDescriptor, Surface};
use render::{
    window::{Window, WindowDescriptor},
    ClearColor, Renderer,
};
use scene::{Frame, Scene};
#[cfg(target_os = "macos")]
use vulkano::instance::{InstanceCreateFlags, InstanceExtensions};
use vulkano::{
    command_buffer::allocator::{
        StandardCommandBufferAllocator, StandardCommandBufferAllocatorCreateInfo,
    },
    device::{
        physical::{PhysicalDevice, PhysicalDeviceType},
        Device, DeviceCreateInfo, DeviceExtensions, Queue, QueueCreateInfo, QueueFlags,
    },
    instance::{Instance, InstanceCreateInfo},
    memory::allocator::StandardMemoryAllocator,
    swapchain::Surface as RenderSurface,
    VulkanLibrary,
};

pub mod control;
pub mod plot;
pub mod render;
pub mod scene;
pub mod shader;

mod buffer;
mod error;

pub use error::InitError;

struct Context {
    device: Arc<Device>,
    graphics_queue: Arc<Queue>,
    memory_allocator: Arc<StandardMemoryAllocator>,
    command_buffer_allocator: Arc<StandardCommandBufferAllocator>,
}

impl Context {
    /// Loads Vulkan, opens the window and picks a device able to draw to it.
    fn new(
        event_loop: &winit::event_loop::EventLoop<()>,
        window_descriptor: &WindowDescriptor,
    ) -> Result<(Self, Window), InitError> {
        let library = VulkanLibrary::new().map_err(InitError::Library)?;

        tracing::debug!("Vulkan library loaded");

        let instance_extensions = RenderSurface::required_extensions(event_loop);
        if !library
            .supported_extensions()
            .contains(&instance_extensions)
        {
            return Err(InitError::MissingExtensions);
        }

        let instance = Instance::new(
            library,
            InstanceCreateInfo {
                #[cfg(target_os = "macos")]
                flags: InstanceCreateFlags::ENUMERATE_PORTABILITY,
                application_version: vulkano::Version::major_minor(1, 0),
                #[cfg(target_os = "macos")]
                enabled_extensions: InstanceExtensions {
                    khr_portability_enumeration: true,
                    ..InstanceExtensions::empty()
                }
                .union(&instance_extensions),
                #[cfg(not(target_os = "macos"))]
                enabled_extensions: instance_extensions,
                ..Default::default()
            },
        )
        .map_err(InitError::vulkan)?;

        tracing::debug!("Vulkan instance created");

        let winit_window = Window::build(event_loop, window_descriptor)?;
        let surface = RenderSurface::from_window(instance.clone(), winit_window.clone())
            .map_err(InitError::vulkan)?;

        let device_extensions = DeviceExtensions {
            khr_swapchain: true,
            ..DeviceExtensions::empty()
        };

        let (physical_device, queue_family_index) = instance
            .enumerate_physical_devices()
            .map_err(InitError::vulkan)?
            .filter(|p| p.supported_extensions().contains(&device_extensions))
            .filter_map(|p| Self::graphics_queue_family(&p, &surface).map(|i| (p, i)))
            .min_by_key(|(p, _)| match p.properties().device_type {
                PhysicalDeviceType::DiscreteGpu => 1,
                PhysicalDeviceType::IntegratedGpu => 2,
                PhysicalDeviceType::VirtualGpu => 3,
                PhysicalDeviceType::Cpu => 4,
                PhysicalDeviceType::Other => 5,
                _ => 6,
            })
            .ok_or(InitError::NoSuitableDevice)?;

        tracing::info!("Using device {}", physical_device.properties().device_name);

        let (device, mut queues) = Device::new(
            physical_device,
            DeviceCreateInfo {
                queue_create_infos: vec![QueueCreateInfo {
                    queue_family_index,
                    ..Default::default()
                }],
                enabled_extensions: device_extensions,
                ..Default::default()
            },
        )
        .map_err(InitError::vulkan)?;
        let graphics_queue = queues
            .next()
            .ok_or_else(|| InitError::Vulkan("device created without a queue".to_string()))?;

        tracing::debug!("Vulkan device created");

        let window = Window::new(winit_window, surface, &device, window_descriptor)?;

        let context = Self {
            device: device.clone(),
            graphics_queue,
            memory_allocator: Arc::new(StandardMemoryAllocator::new_default(device.clone())),
            command_buffer_allocator: Arc::new(StandardCommandBufferAllocator::new(
                device,
                StandardCommandBufferAllocatorCreateInfo::default(),
            )),
        };

        Ok((context, window))
    }

    /// First queue family that can draw and present to `surface`.
    fn graphics_queue_family(
        physical_device: &Arc<PhysicalDevice>,
        surface: &RenderSurface,
    ) -> Option<u32> {
        physical_device
            .queue_family_properties()
            .iter()
            .enumerate()
            .filter_map(|(i, q)| u32::try_from(i).ok().map(|i| (i, q)))
            .find(|(i, q)| {
                q.queue_flags.intersects(QueueFlags::GRAPHICS)
                    && physical_device.surface_support(*i, surface).unwrap_or(false)
            })
            .map(|(i, _)| i)
    }
}

/// Configuration of the plotter.
pub struct PlotterAppConfig {
    pub window: WindowDescriptor,
    pub plot: PlotDescriptor,
    /// Height-field drawn by the surface mesh.
    pub surface: Box<dyn Surface>,
    pub camera: CameraSettings,
    /// Camera active at startup. `C` switches to the other one.
    pub initial_camera: CameraKind,
    pub clear_color: ClearColor,
    pub controllers: Vec<Box<dyn Controller>>,
}

impl Default for PlotterAppConfig {
    fn default() -> Self {
        Self {
            window: WindowDescriptor::default(),
            plot: PlotDescriptor::default(),
            surface: Box::new(MovingBump),
            camera: CameraSettings::default(),
            initial_camera: CameraKind::Centered,
            clear_color: ClearColor::default(),
            controllers: vec![Box::new(Keyboard::default()), Box::new(Mouse::default())],
        }
    }
}

/// Builds the two cameras of the scene, `initial` being active.
#[must_use]
pub fn scene_cameras(
    center: Vec3,
    aspect_ratio: f32,
    settings: CameraSettings,
    initial: CameraKind,
) -> CameraSet {
    let mut cameras = CameraSet::new(
        CameraKind::Centered,
        Box::new(Centered::new(center, aspect_ratio, settings)),
    )
    .with(
        CameraKind::Flying,
        Box::new(Flying::new(Vec3::new(0.0, 0.0, 3.0), aspect_ratio, settings)),
    );
    cameras.select(initial);
    cameras
}

pub struct PlotterApp {
    event_loop: winit::event_loop::EventLoop<()>,
    renderer: Renderer,
    scene: Scene,
    controllers: Vec<Box<dyn Controller>>,
}

impl PlotterApp {
    pub fn new(config: PlotterAppConfig) -> Result<Self, InitError> {
        let PlotterAppConfig {
            window,
            plot,
            surface,
            camera,
            initial_camera,
            clear_color,
            controllers,
        } = config;

        let plot = Plot::new(&plot, surface)?;

        let event_loop = winit::event_loop::EventLoop::new();
        let (context, window) = Context::new(&event_loop, &window)?;

        let (width, height) = window.size();
        #[allow(clippy::cast_precision_loss)]
        let aspect_ratio = width as f32 / height.max(1) as f32;
        let cameras = scene_cameras(plot.center(), aspect_ratio, camera, initial_camera);

        let renderer = Renderer::new(
            &context.device,
            &context.graphics_queue,
            &context.memory_allocator,
            &context.command_buffer_allocator,
            window,
            &plot,
            clear_color,
        )?;

        tracing::debug!("Successfully initialized");

        Ok(Self {
            event_loop,
            renderer,
            scene: Scene::new(plot, cameras),
            controllers,
        })
    }

    pub fn run(self) {
        let Self {
            event_loop,
            mut renderer,
            mut scene,
            mut controllers,
        } = self;

        let mut start = std::time::Instant::now();

        event_loop.run(move |event, _, control_flow| {
            for controller in &mut controllers {
                controller.handle_event(&event);
            }
            match event {
                winit::event::Event::WindowEvent {
                    event: winit::event::WindowEvent::CloseRequested,
                    ..
                } => {
                    *control_flow = winit::event_loop::ControlFlow::Exit;
                }
                winit::event::Event::WindowEvent {
                    event: winit::event::WindowEvent::Resized(size),
                    ..
                } => {
                    scene.resize(size.width, size.height);
                    renderer.resize();
                }
                winit::event::Event::MainEventsCleared => {
                    let elapsed = start.elapsed().as_secs_f32();
                    start = std::time::Instant::now();

                    let input = Scene::gather_input(&mut controllers);

                    match scene.step(elapsed, &input) {
                        Frame::Exit => {
                            *control_flow = winit::event_loop::ControlFlow::Exit;
                            return;
                        }
                        Frame::Continue { regenerated: true } => {
                            renderer.upload_surface(scene.plot());
                        }
                        Frame::Continue { regenerated: false } => {}
                    }

                    if let Err(e) = renderer.render(scene.cameras().active()) {
                        tracing::warn!("Frame dropped: {e}");
                    }
                }
                _ => {}
            }
        });
    }
}
