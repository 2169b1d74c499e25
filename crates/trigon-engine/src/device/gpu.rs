use std::borrow::Cow;
use std::sync::Arc;

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use wgpu::naga;

use crate::shader::{compile, ShaderFormats, ShaderStage};

use super::backend::{Backend, BufferDesc, DrawCall, PipelineDesc, ShaderDesc};
use super::error::{BufferKind, GpuError};
use super::{surface, GpuInit, SurfaceErrorAction};

/// A compiled shader stage.
#[derive(Debug)]
pub struct GpuShader {
    module: wgpu::ShaderModule,
    stage: ShaderStage,
    entry_point: String,
    vertex_inputs: u32,
}

/// Host-visible upload buffer. Mapped from creation until the first write.
#[derive(Debug)]
pub struct StagingBuffer {
    buffer: wgpu::Buffer,
    mapped: bool,
}

/// The swapchain image acquired for one frame.
///
/// Holding it prevents acquisition of subsequent frames; it is presented by
/// [`Gpu::submit`].
pub struct SurfaceImage {
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

/// Owns the wgpu device and the window it presents to.
///
/// Fields are declared in release order: the surface (the window/device
/// association) goes first, then the window, then the device objects.
pub struct Gpu {
    /// Surface bound to the window.
    surface: wgpu::Surface<'static>,

    window: Arc<Window>,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,

    queue: wgpu::Queue,
    device: wgpu::Device,
    _adapter: wgpu::Adapter,
    _instance: wgpu::Instance,

    adapter_info: wgpu::AdapterInfo,
    shader_formats: ShaderFormats,
    /// What naga may accept, derived from the device's features.
    capabilities: naga::valid::Capabilities,
}

impl Gpu {
    /// Creates a device and claims `window` for presentation.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();

        let GpuInit {
            shader_formats,
            debug,
            prefer_srgb,
            present_mode,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let flags = if debug {
            wgpu::InstanceFlags::debugging()
        } else {
            wgpu::InstanceFlags::empty()
        };

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags,
            ..Default::default()
        });

        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("couldn't claim window for GPU device")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("couldn't find a suitable GPU adapter")?;

        let adapter_info = adapter.get_info();

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("trigon device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("couldn't create GPU device")?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps, prefer_srgb)
            .context("surface reported no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface::choose_present_mode(&caps, present_mode),
            alpha_mode: surface::choose_alpha_mode(&caps, alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        if surface::is_drawable(size) {
            surface.configure(&device, &config);
        }

        let shader_formats =
            shader_formats.intersection(ShaderFormats::for_backend(adapter_info.backend));

        let capabilities = compile::capabilities(
            device.features(),
            adapter.get_downlevel_capabilities().flags,
        );

        log::info!(
            "GPU device ready: {} ({:?}), swapchain {:?}, shader formats {shader_formats}",
            adapter_info.name,
            adapter_info.backend,
            config.format,
        );
        log::debug!("wgpu validation layers {}", if debug { "on" } else { "off" });

        Ok(Self {
            surface,
            window,
            config,
            size,
            queue,
            device,
            _adapter: adapter,
            _instance: instance,
            adapter_info,
            shader_formats,
            capabilities,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Reconfigures the swapchain after a resize.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        surface::apply_resize(
            &self.surface,
            &self.device,
            &mut self.config,
            &mut self.size,
            new_size,
        );
    }

    fn check_buffer_size(&self, kind: BufferKind, size: u64) -> Result<u64, GpuError> {
        let limit = self.device.limits().max_buffer_size;
        let aligned = wgpu::util::align_to(size, wgpu::COPY_BUFFER_ALIGNMENT);
        if size == 0 || aligned > limit {
            return Err(GpuError::BufferSize { kind, size, limit });
        }
        Ok(aligned)
    }
}

impl Backend for Gpu {
    type Shader = GpuShader;
    type Pipeline = wgpu::RenderPipeline;
    type Buffer = wgpu::Buffer;
    type TransferBuffer = StagingBuffer;
    type CommandBuffer = wgpu::CommandEncoder;
    type SurfaceImage = SurfaceImage;

    fn driver_name(&self) -> String {
        format!("{:?} ({})", self.adapter_info.backend, self.adapter_info.driver)
    }

    fn shader_formats(&self) -> ShaderFormats {
        self.shader_formats
    }

    fn swapchain_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    fn create_shader(&self, desc: &ShaderDesc<'_>) -> Result<GpuShader, GpuError> {
        create_shader_module(&self.device, self.capabilities, desc)
    }

    fn create_pipeline(
        &self,
        desc: &PipelineDesc<'_, GpuShader>,
    ) -> Result<wgpu::RenderPipeline, GpuError> {
        create_render_pipeline(&self.device, desc)
    }

    fn create_buffer(&self, desc: &BufferDesc<'_>) -> Result<wgpu::Buffer, GpuError> {
        let size = self.check_buffer_size(BufferKind::Vertex, desc.size)?;

        Ok(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(desc.label),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }))
    }

    fn create_transfer_buffer(&self, size: u64) -> Result<StagingBuffer, GpuError> {
        let size = self.check_buffer_size(BufferKind::Transfer, size)?;

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trigon transfer buffer"),
            size,
            usage: wgpu::BufferUsages::MAP_WRITE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: true,
        });

        Ok(StagingBuffer {
            buffer,
            mapped: true,
        })
    }

    fn write_transfer_buffer(
        &self,
        transfer: &mut StagingBuffer,
        bytes: &[u8],
    ) -> Result<(), GpuError> {
        let capacity = transfer.buffer.size();
        let requested = bytes.len() as u64;
        if requested > capacity {
            return Err(GpuError::TransferOverflow {
                capacity,
                requested,
            });
        }
        if !transfer.mapped {
            return Err(GpuError::Backend(
                "couldn't map transfer buffer: already unmapped".to_owned(),
            ));
        }

        {
            let mut view = transfer.buffer.slice(..).get_mapped_range_mut();
            view[..bytes.len()].copy_from_slice(bytes);
        }
        transfer.buffer.unmap();
        transfer.mapped = false;

        Ok(())
    }

    fn acquire_command_buffer(&self) -> Result<wgpu::CommandEncoder, GpuError> {
        Ok(self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("trigon command buffer"),
            }))
    }

    fn upload_to_buffer(
        &self,
        cmd: &mut wgpu::CommandEncoder,
        src: &StagingBuffer,
        dst: &wgpu::Buffer,
        size: u64,
    ) {
        let size = wgpu::util::align_to(size, wgpu::COPY_BUFFER_ALIGNMENT);
        cmd.copy_buffer_to_buffer(&src.buffer, 0, dst, 0, size);
    }

    fn acquire_surface_image(
        &mut self,
        _cmd: &mut wgpu::CommandEncoder,
    ) -> Result<Option<SurfaceImage>, GpuError> {
        if !surface::is_drawable(self.size) {
            return Ok(None);
        }

        let texture = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(err) => {
                let action = surface::map_surface_error(
                    &self.surface,
                    &self.device,
                    &self.config,
                    self.size,
                    &err,
                );
                return match action {
                    SurfaceErrorAction::Fatal => Err(GpuError::Surface(err)),
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        log::debug!("skipping frame: {err}");
                        Ok(None)
                    }
                };
            }
        };

        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Some(SurfaceImage { texture, view }))
    }

    fn render_pass(
        &self,
        cmd: &mut wgpu::CommandEncoder,
        image: &SurfaceImage,
        clear: wgpu::Color,
        draw: Option<DrawCall<'_, Self>>,
    ) {
        let mut rpass = cmd.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("trigon frame pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &image.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let Some(draw) = draw else { return };

        rpass.set_pipeline(draw.pipeline);
        if let Some(vbo) = draw.vertex_buffer {
            rpass.set_vertex_buffer(0, vbo.slice(..));
        }
        rpass.draw(0..draw.vertex_count, 0..1);
    }

    fn submit(&self, cmd: wgpu::CommandEncoder, image: Option<SurfaceImage>) {
        self.queue.submit(std::iter::once(cmd.finish()));

        if let Some(image) = image {
            self.window.pre_present_notify();
            drop(image.view);
            image.texture.present();
        }
    }
}

/// Compiles `desc` through naga and creates the module inside a validation
/// scope, so device-side rejections come back as errors.
fn create_shader_module(
    device: &wgpu::Device,
    capabilities: naga::valid::Capabilities,
    desc: &ShaderDesc<'_>,
) -> Result<GpuShader, GpuError> {
    let compiled = compile::compile(desc, capabilities)?;

    let module = validated(device, || {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(compiled.module)),
        })
    })
    .map_err(|e| GpuError::ShaderCompile(format!("{}: {e}", desc.label)))?;

    Ok(GpuShader {
        module,
        stage: desc.stage,
        entry_point: desc.entry_point.to_owned(),
        vertex_inputs: compiled.vertex_inputs,
    })
}

fn create_render_pipeline(
    device: &wgpu::Device,
    desc: &PipelineDesc<'_, GpuShader>,
) -> Result<wgpu::RenderPipeline, GpuError> {
    let vs = desc.vertex_shader;
    let fs = desc.fragment_shader;

    if vs.stage != ShaderStage::Vertex || fs.stage != ShaderStage::Fragment {
        return Err(GpuError::Pipeline(format!(
            "expected vertex + fragment stages, got {} + {}",
            vs.stage, fs.stage
        )));
    }

    let declared = desc.vertex_input.map_or(0, |v| v.attribute_count());
    if vs.vertex_inputs != declared {
        return Err(GpuError::Pipeline(format!(
            "vertex shader reads {} attribute(s) but the vertex layout declares {declared}",
            vs.vertex_inputs
        )));
    }

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(desc.label),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    let buffers: Vec<wgpu::VertexBufferLayout<'static>> = desc
        .vertex_input
        .iter()
        .map(|v| wgpu::VertexBufferLayout {
            array_stride: v.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: v.attributes,
        })
        .collect();

    let pipeline = validated(device, || {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: &vs.module,
                entry_point: Some(vs.entry_point.as_str()),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs.module,
                entry_point: Some(fs.entry_point.as_str()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.color_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: desc.rasterizer.front_face,
                cull_mode: desc.rasterizer.cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    })
    .map_err(|e| GpuError::Pipeline(format!("{}: {e}", desc.label)))?;

    Ok(pipeline)
}

/// Runs `create` inside a validation error scope.
///
/// wgpu reports invalid descriptors through the device's error handler rather
/// than the return value; the scope turns them into a `Result`.
fn validated<T>(device: &wgpu::Device, create: impl FnOnce() -> T) -> Result<T, wgpu::Error> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    match pollster::block_on(scope.pop()) {
        Some(err) => Err(err),
        None => Ok(value),
    }
}
