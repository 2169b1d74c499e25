//! Recording backend used by tests.
//!
//! Every call and every resource release is appended to a shared [`Journal`],
//! so tests can assert on ordering without a GPU. Individual operations can be
//! made to fail with [`MockBackend::failing`].

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use crate::shader::{ShaderFormat, ShaderFormats, ShaderStage};

use super::backend::{Backend, BufferDesc, DrawCall, PipelineDesc, ShaderDesc};
use super::GpuError;

/// Shared, append-only call log.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// Entries starting with `prefix`, in order.
    pub fn filtered(&self, prefix: &str) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.0.borrow().iter().any(|e| e == entry)
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// Operations that can be forced to fail.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MockOp {
    CreateShader,
    CreatePipeline,
    CreateBuffer,
    CreateTransferBuffer,
    WriteTransferBuffer,
    AcquireCommandBuffer,
    AcquireSurfaceImage,
}

/// A GPU object that logs `release <kind> <label>` when dropped.
#[derive(Debug)]
pub struct MockResource {
    pub kind: &'static str,
    pub label: String,
    pub stage: Option<ShaderStage>,
    pub format: Option<ShaderFormat>,
    pub size: u64,
    journal: Journal,
}

impl MockResource {
    fn new(journal: &Journal, kind: &'static str, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            stage: None,
            format: None,
            size: 0,
            journal: journal.clone(),
        }
    }
}

impl Drop for MockResource {
    fn drop(&mut self) {
        self.journal
            .push(format!("release {} {}", self.kind, self.label));
    }
}

#[derive(Debug)]
pub struct MockCommandBuffer {
    pub id: u32,
}

#[derive(Debug)]
pub struct MockSurfaceImage;

/// In-memory [`Backend`].
///
/// Dropping it logs the platform teardown (`release surface`, `destroy window`,
/// `destroy device`) so tests can check the full release order.
#[derive(Debug)]
pub struct MockBackend {
    journal: Journal,
    formats: ShaderFormats,
    failing: HashSet<MockOp>,
    images: bool,
    next_command_buffer: Cell<u32>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            journal: Journal::default(),
            formats: ShaderFormats::ALL,
            failing: HashSet::new(),
            images: true,
            next_command_buffer: Cell::new(0),
        }
    }

    pub fn with_formats(mut self, formats: ShaderFormats) -> Self {
        self.formats = formats;
        self
    }

    pub fn failing(mut self, op: MockOp) -> Self {
        self.failing.insert(op);
        self
    }

    /// Surface acquisition succeeds but never yields an image.
    pub fn without_images(mut self) -> Self {
        self.images = false;
        self
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    fn check(&self, op: MockOp) -> Result<(), GpuError> {
        if self.failing.contains(&op) {
            self.journal.push(format!("fail {op:?}"));
            return Err(GpuError::Backend(format!("{op:?} failed")));
        }
        Ok(())
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.journal.push("release surface");
        self.journal.push("destroy window");
        self.journal.push("destroy device");
    }
}

impl Backend for MockBackend {
    type Shader = MockResource;
    type Pipeline = MockResource;
    type Buffer = MockResource;
    type TransferBuffer = MockResource;
    type CommandBuffer = MockCommandBuffer;
    type SurfaceImage = MockSurfaceImage;

    fn driver_name(&self) -> String {
        "mock".to_owned()
    }

    fn shader_formats(&self) -> ShaderFormats {
        self.formats
    }

    fn swapchain_format(&self) -> wgpu::TextureFormat {
        wgpu::TextureFormat::Bgra8UnormSrgb
    }

    fn create_shader(&self, desc: &ShaderDesc<'_>) -> Result<MockResource, GpuError> {
        self.journal.push(format!("create shader {}", desc.label));
        self.check(MockOp::CreateShader)?;

        let mut shader = MockResource::new(&self.journal, "shader", desc.label);
        shader.stage = Some(desc.stage);
        shader.format = Some(desc.format);
        shader.size = desc.code.len() as u64;
        Ok(shader)
    }

    fn create_pipeline(
        &self,
        desc: &PipelineDesc<'_, MockResource>,
    ) -> Result<MockResource, GpuError> {
        self.journal.push(format!("create pipeline {}", desc.label));
        self.check(MockOp::CreatePipeline)?;
        Ok(MockResource::new(&self.journal, "pipeline", desc.label))
    }

    fn create_buffer(&self, desc: &BufferDesc<'_>) -> Result<MockResource, GpuError> {
        self.journal
            .push(format!("create buffer {} {}", desc.label, desc.size));
        self.check(MockOp::CreateBuffer)?;

        let mut buffer = MockResource::new(&self.journal, "buffer", desc.label);
        buffer.size = desc.size;
        Ok(buffer)
    }

    fn create_transfer_buffer(&self, size: u64) -> Result<MockResource, GpuError> {
        self.journal.push(format!("create transfer buffer {size}"));
        self.check(MockOp::CreateTransferBuffer)?;

        let mut transfer = MockResource::new(&self.journal, "transfer", "buffer");
        transfer.size = size;
        Ok(transfer)
    }

    fn write_transfer_buffer(
        &self,
        transfer: &mut MockResource,
        bytes: &[u8],
    ) -> Result<(), GpuError> {
        self.journal
            .push(format!("write transfer buffer {}", bytes.len()));
        self.check(MockOp::WriteTransferBuffer)?;

        let requested = bytes.len() as u64;
        if requested > transfer.size {
            return Err(GpuError::TransferOverflow {
                capacity: transfer.size,
                requested,
            });
        }
        Ok(())
    }

    fn acquire_command_buffer(&self) -> Result<MockCommandBuffer, GpuError> {
        self.journal.push("acquire command buffer");
        self.check(MockOp::AcquireCommandBuffer)?;

        let id = self.next_command_buffer.get();
        self.next_command_buffer.set(id + 1);
        Ok(MockCommandBuffer { id })
    }

    fn upload_to_buffer(
        &self,
        _cmd: &mut MockCommandBuffer,
        src: &MockResource,
        dst: &MockResource,
        size: u64,
    ) {
        self.journal.push(format!(
            "upload {size} from {} {} to {} {}",
            src.kind, src.label, dst.kind, dst.label
        ));
    }

    fn acquire_surface_image(
        &mut self,
        _cmd: &mut MockCommandBuffer,
    ) -> Result<Option<MockSurfaceImage>, GpuError> {
        self.journal.push("acquire surface image");
        self.check(MockOp::AcquireSurfaceImage)?;
        Ok(self.images.then_some(MockSurfaceImage))
    }

    fn render_pass(
        &self,
        _cmd: &mut MockCommandBuffer,
        _image: &MockSurfaceImage,
        clear: wgpu::Color,
        draw: Option<DrawCall<'_, Self>>,
    ) {
        self.journal.push(format!(
            "clear {} {} {} {}",
            clear.r, clear.g, clear.b, clear.a
        ));

        if let Some(draw) = draw {
            self.journal.push(format!("bind pipeline {}", draw.pipeline.label));
            if let Some(vbo) = draw.vertex_buffer {
                self.journal.push(format!("bind vertex buffer {}", vbo.label));
            }
            self.journal.push(format!("draw {}", draw.vertex_count));
        }
    }

    fn submit(&self, cmd: MockCommandBuffer, image: Option<MockSurfaceImage>) {
        if image.is_some() {
            self.journal
                .push(format!("submit command buffer {} + present", cmd.id));
        } else {
            self.journal.push(format!("submit command buffer {}", cmd.id));
        }
    }
}
