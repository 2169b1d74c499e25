use bytemuck::Pod;

use crate::device::{Backend, BufferDesc, GpuError};

/// A vertex buffer and the number of vertices it holds.
pub struct VertexBuffer<B: Backend> {
    buffer: B::Buffer,
    count: u32,
}

impl<B: Backend> VertexBuffer<B> {
    pub fn buffer(&self) -> &B::Buffer {
        &self.buffer
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Copies `vertices` into a new device-resident buffer.
///
/// The data goes through a transient transfer buffer and a dedicated command
/// buffer that is submitted before returning; the transfer buffer is released
/// afterwards. Intended to run once at startup.
pub fn upload_vertices<B: Backend, V: Pod>(
    backend: &B,
    label: &str,
    vertices: &[V],
) -> Result<VertexBuffer<B>, GpuError> {
    upload_inner(backend, label, vertices).inspect_err(|e| {
        log::error!("couldn't upload vertex buffer {label}: {e}");
    })
}

fn upload_inner<B: Backend, V: Pod>(
    backend: &B,
    label: &str,
    vertices: &[V],
) -> Result<VertexBuffer<B>, GpuError> {
    if vertices.is_empty() {
        return Err(GpuError::EmptyUpload);
    }

    let bytes: &[u8] = bytemuck::cast_slice(vertices);
    let size = bytes.len() as u64;
    let count = u32::try_from(vertices.len()).map_err(|_| GpuError::BufferSize {
        kind: crate::device::BufferKind::Vertex,
        size,
        limit: u64::from(u32::MAX),
    })?;

    let buffer = backend.create_buffer(&BufferDesc { label, size })?;

    let mut transfer = backend.create_transfer_buffer(size)?;
    backend.write_transfer_buffer(&mut transfer, bytes)?;

    let mut cmd = backend.acquire_command_buffer()?;
    backend.upload_to_buffer(&mut cmd, &transfer, &buffer, size);
    backend.submit(cmd, None);

    drop(transfer);

    log::debug!("uploaded {count} vertices ({size} bytes) to {label}");

    Ok(VertexBuffer { buffer, count })
}
