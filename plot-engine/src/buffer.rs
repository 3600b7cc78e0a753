use std::sync::Arc;

use vulkano::{
    buffer::{
        AllocateBufferError, Buffer, BufferContents, BufferCreateInfo, BufferUsage, Subbuffer,
    },
    command_buffer::{
        allocator::StandardCommandBufferAllocator, AutoCommandBufferBuilder,
        CommandBufferExecFuture, CommandBufferUsage, CopyBufferInfo,
    },
    device::Queue,
    memory::allocator::{AllocationCreateInfo, MemoryTypeFilter, StandardMemoryAllocator},
    sync::{self, future::FenceSignalFuture, GpuFuture},
    DeviceSize, Validated,
};

use crate::InitError;

/// The future type for sending a buffer to the device.
pub type SendBufferFuture = FenceSignalFuture<CommandBufferExecFuture<sync::future::NowFuture>>;

#[must_use = "The function returns a future that must be awaited and a buffer that must be used"]
/// Sends the given data to device-local memory through a staging buffer,
/// returning the destination buffer and the send future.
pub fn send_to_device<T, I>(
    memory_allocator: &Arc<StandardMemoryAllocator>,
    command_buffer_allocator: &Arc<StandardCommandBufferAllocator>,
    queue: &Arc<Queue>,
    usage: BufferUsage,
    data: I,
) -> Result<(Subbuffer<[T]>, SendBufferFuture), InitError>
where
    T: BufferContents,
    I: IntoIterator<Item = T>,
    I::IntoIter: ExactSizeIterator,
{
    let staging_buffer = Buffer::from_iter(
        memory_allocator.clone(),
        BufferCreateInfo {
            usage: BufferUsage::TRANSFER_SRC,
            ..Default::default()
        },
        AllocationCreateInfo {
            memory_type_filter: MemoryTypeFilter::PREFER_HOST
                | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
            ..Default::default()
        },
        data,
    )
    .map_err(InitError::vulkan)?;

    let destination_buffer = Buffer::new_slice::<T>(
        memory_allocator.clone(),
        BufferCreateInfo {
            usage: usage | BufferUsage::TRANSFER_DST,
            ..Default::default()
        },
        AllocationCreateInfo {
            memory_type_filter: MemoryTypeFilter::PREFER_DEVICE,
            ..Default::default()
        },
        staging_buffer.len(),
    )
    .map_err(InitError::vulkan)?;

    let mut builder = AutoCommandBufferBuilder::primary(
        command_buffer_allocator,
        queue.queue_family_index(),
        CommandBufferUsage::OneTimeSubmit,
    )
    .map_err(InitError::vulkan)?;
    builder
        .copy_buffer(CopyBufferInfo::buffers(
            staging_buffer,
            destination_buffer.clone(),
        ))
        .map_err(InitError::vulkan)?;
    let command_buffer = builder.build().map_err(InitError::vulkan)?;

    let future = sync::now(queue.device().clone())
        .then_execute(queue.clone(), command_buffer)
        .map_err(InitError::vulkan)?
        .then_signal_fence_and_flush()
        .map_err(InitError::vulkan)?;

    Ok((destination_buffer, future))
}

#[must_use = "The function returns a buffer that must be used"]
/// Creates a vertex buffer the host rewrites between frames.
pub fn new_host_vertices<T>(
    memory_allocator: &Arc<StandardMemoryAllocator>,
    len: DeviceSize,
) -> Result<Subbuffer<[T]>, Validated<AllocateBufferError>>
where
    T: BufferContents,
{
    Buffer::new_slice(
        memory_allocator.clone(),
        BufferCreateInfo {
            usage: BufferUsage::VERTEX_BUFFER,
            ..Default::default()
        },
        AllocationCreateInfo {
            memory_type_filter: MemoryTypeFilter::PREFER_DEVICE
                | MemoryTypeFilter::HOST_SEQUENTIAL_WRITE,
            ..Default::default()
        },
        len,
    )
}
