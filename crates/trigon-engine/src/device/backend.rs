use crate::shader::{ResourceCounts, ShaderFormat, ShaderFormats, ShaderStage};

use super::GpuError;

/// Source for [`Backend::create_shader`].
#[derive(Debug, Clone, Copy)]
pub struct ShaderDesc<'a> {
    /// Debug label, usually the shader's file name.
    pub label: &'a str,
    /// Raw file contents in `format`.
    pub code: &'a [u8],
    pub entry_point: &'a str,
    pub format: ShaderFormat,
    pub stage: ShaderStage,
    /// Resources the shader is declared to bind.
    pub resources: ResourceCounts,
}

/// Vertex buffer layout for slot 0.
///
/// A pipeline without a `VertexInput` reads no vertex attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexInput {
    /// Distance in bytes between consecutive vertices.
    pub stride: u64,
    pub attributes: &'static [wgpu::VertexAttribute],
}

impl VertexInput {
    pub fn attribute_count(&self) -> u32 {
        self.attributes.len() as u32
    }
}

/// Fixed-function rasterizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rasterizer {
    pub front_face: wgpu::FrontFace,
    pub cull_mode: Option<wgpu::Face>,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self {
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
        }
    }
}

impl Rasterizer {
    /// Counter-clockwise front faces, back faces culled.
    pub fn ccw_back_cull() -> Self {
        Self {
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
        }
    }
}

/// Input for [`Backend::create_pipeline`].
pub struct PipelineDesc<'a, S> {
    pub label: &'a str,
    pub vertex_shader: &'a S,
    pub fragment_shader: &'a S,
    pub vertex_input: Option<VertexInput>,
    pub rasterizer: Rasterizer,
    /// Color target format; normally the swapchain format.
    pub color_format: wgpu::TextureFormat,
}

/// Input for [`Backend::create_buffer`].
#[derive(Debug, Clone, Copy)]
pub struct BufferDesc<'a> {
    pub label: &'a str,
    pub size: u64,
}

/// A single draw issued inside a frame's render pass.
pub struct DrawCall<'a, B: Backend + ?Sized> {
    pub pipeline: &'a B::Pipeline,
    /// Bound to slot 0 when present.
    pub vertex_buffer: Option<&'a B::Buffer>,
    pub vertex_count: u32,
}

impl<B: Backend + ?Sized> Clone for DrawCall<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: Backend + ?Sized> Copy for DrawCall<'_, B> {}

/// The GPU operations the chapters need, in the shape of a single-queue API.
///
/// Every resource is released by dropping it. Implementors must not require
/// any particular drop order beyond "resources before the backend itself".
pub trait Backend {
    type Shader;
    type Pipeline;
    type Buffer;
    type TransferBuffer;
    type CommandBuffer;
    type SurfaceImage;

    /// Human-readable backend name for diagnostics.
    fn driver_name(&self) -> String;

    /// Shader encodings this device accepts.
    fn shader_formats(&self) -> ShaderFormats;

    /// Color format of the presentable surface.
    fn swapchain_format(&self) -> wgpu::TextureFormat;

    fn create_shader(&self, desc: &ShaderDesc<'_>) -> Result<Self::Shader, GpuError>;

    fn create_pipeline(
        &self,
        desc: &PipelineDesc<'_, Self::Shader>,
    ) -> Result<Self::Pipeline, GpuError>;

    /// Creates a device-resident vertex buffer that can be a copy destination.
    fn create_buffer(&self, desc: &BufferDesc<'_>) -> Result<Self::Buffer, GpuError>;

    /// Creates a host-visible upload buffer of at least `size` bytes.
    fn create_transfer_buffer(&self, size: u64) -> Result<Self::TransferBuffer, GpuError>;

    /// Maps `transfer`, copies `bytes` to its start and unmaps it.
    fn write_transfer_buffer(
        &self,
        transfer: &mut Self::TransferBuffer,
        bytes: &[u8],
    ) -> Result<(), GpuError>;

    fn acquire_command_buffer(&self) -> Result<Self::CommandBuffer, GpuError>;

    /// Records a copy of `size` bytes from `src` to `dst`.
    fn upload_to_buffer(
        &self,
        cmd: &mut Self::CommandBuffer,
        src: &Self::TransferBuffer,
        dst: &Self::Buffer,
        size: u64,
    );

    /// Blocks until a presentable image is available.
    ///
    /// `Ok(None)` means no image can be drawn this frame (minimized window,
    /// swapchain being recreated); it is not a failure.
    fn acquire_surface_image(
        &mut self,
        cmd: &mut Self::CommandBuffer,
    ) -> Result<Option<Self::SurfaceImage>, GpuError>;

    /// Records one render pass that clears `image` and performs `draw`.
    fn render_pass(
        &self,
        cmd: &mut Self::CommandBuffer,
        image: &Self::SurfaceImage,
        clear: wgpu::Color,
        draw: Option<DrawCall<'_, Self>>,
    );

    /// Submits `cmd` and presents `image` if one was acquired.
    fn submit(&self, cmd: Self::CommandBuffer, image: Option<Self::SurfaceImage>);
}
