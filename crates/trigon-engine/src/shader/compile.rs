//! naga front end: parse, validate and inspect a shader before wgpu sees it.

use wgpu::naga;

use crate::device::{GpuError, ShaderDesc};

use super::{ResourceCounts, ShaderFormat};

/// Validated IR plus what the pipeline builder needs to know about it.
#[derive(Debug)]
pub(crate) struct CompiledShader {
    pub module: naga::Module,
    /// Location-bound inputs of the entry point.
    pub vertex_inputs: u32,
}

/// naga capabilities a device with `features` and `downlevel` flags supports.
pub(crate) fn capabilities(
    features: wgpu::Features,
    downlevel: wgpu::DownlevelFlags,
) -> naga::valid::Capabilities {
    use naga::valid::Capabilities as Caps;

    let mut caps = Caps::empty();
    caps.set(Caps::IMMEDIATES, features.contains(wgpu::Features::IMMEDIATES));
    caps.set(Caps::FLOAT64, features.contains(wgpu::Features::SHADER_F64));
    caps.set(Caps::SHADER_FLOAT16, features.contains(wgpu::Features::SHADER_F16));
    caps.set(Caps::SHADER_INT64, features.contains(wgpu::Features::SHADER_INT64));
    caps.set(
        Caps::PRIMITIVE_INDEX,
        features.contains(wgpu::Features::SHADER_PRIMITIVE_INDEX),
    );
    caps.set(
        Caps::EARLY_DEPTH_TEST,
        features.contains(wgpu::Features::SHADER_EARLY_DEPTH_TEST),
    );
    caps.set(Caps::MULTIVIEW, features.contains(wgpu::Features::MULTIVIEW));
    caps.set(
        Caps::DUAL_SOURCE_BLENDING,
        features.contains(wgpu::Features::DUAL_SOURCE_BLENDING),
    );
    caps.set(Caps::CLIP_DISTANCE, features.contains(wgpu::Features::CLIP_DISTANCES));
    caps.set(
        Caps::MULTISAMPLED_SHADING,
        downlevel.contains(wgpu::DownlevelFlags::MULTISAMPLED_SHADING),
    );
    caps.set(
        Caps::CUBE_ARRAY_TEXTURES,
        downlevel.contains(wgpu::DownlevelFlags::CUBE_ARRAY_TEXTURES),
    );
    caps
}

pub(crate) fn compile(
    desc: &ShaderDesc<'_>,
    capabilities: naga::valid::Capabilities,
) -> Result<CompiledShader, GpuError> {
    let module = parse(desc)?;

    naga::valid::Validator::new(naga::valid::ValidationFlags::all(), capabilities)
        .validate(&module)
        .map_err(|e| reject(desc, e.into_inner()))?;

    let stage = desc.stage.to_naga();
    let entry = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage && ep.name == desc.entry_point)
        .ok_or_else(|| {
            reject(
                desc,
                format!("no {} entry point named `{}`", desc.stage, desc.entry_point),
            )
        })?;

    let used = resource_counts(&module);
    if used != desc.resources {
        return Err(reject(
            desc,
            format!("declared {:?} but shader binds {used:?}", desc.resources),
        ));
    }

    let vertex_inputs = location_inputs(&module, entry);

    Ok(CompiledShader {
        module,
        vertex_inputs,
    })
}

fn parse(desc: &ShaderDesc<'_>) -> Result<naga::Module, GpuError> {
    match desc.format {
        ShaderFormat::Wgsl => {
            let src = text(desc)?;
            naga::front::wgsl::parse_str(src).map_err(|e| reject(desc, e.emit_to_string(src)))
        }
        ShaderFormat::SpirV => {
            naga::front::spv::parse_u8_slice(desc.code, &naga::front::spv::Options::default())
                .map_err(|e| reject(desc, e))
        }
        ShaderFormat::Glsl => {
            let src = text(desc)?;
            let options = naga::front::glsl::Options::from(desc.stage.to_naga());
            naga::front::glsl::Frontend::default()
                .parse(&options, src)
                .map_err(|e| reject(desc, e))
        }
    }
}

fn text<'a>(desc: &ShaderDesc<'a>) -> Result<&'a str, GpuError> {
    std::str::from_utf8(desc.code).map_err(|e| reject(desc, e))
}

fn reject(desc: &ShaderDesc<'_>, reason: impl std::fmt::Display) -> GpuError {
    GpuError::ShaderCompile(format!("{} ({}): {reason}", desc.label, desc.format))
}

fn resource_counts(module: &naga::Module) -> ResourceCounts {
    let mut counts = ResourceCounts::NONE;

    for (_, var) in module.global_variables.iter() {
        match var.space {
            naga::AddressSpace::Uniform => counts.uniform_buffers += 1,
            naga::AddressSpace::Storage { .. } => counts.storage_buffers += 1,
            naga::AddressSpace::Handle => match &module.types[var.ty].inner {
                naga::TypeInner::Sampler { .. } => counts.samplers += 1,
                naga::TypeInner::Image {
                    class: naga::ImageClass::Storage { .. },
                    ..
                } => counts.storage_textures += 1,
                _ => {}
            },
            _ => {}
        }
    }

    counts
}

fn location_inputs(module: &naga::Module, entry: &naga::EntryPoint) -> u32 {
    let is_location =
        |b: &Option<naga::Binding>| matches!(b, Some(naga::Binding::Location { .. }));

    entry
        .function
        .arguments
        .iter()
        .map(|arg| {
            if arg.binding.is_some() {
                return is_location(&arg.binding) as u32;
            }
            match &module.types[arg.ty].inner {
                naga::TypeInner::Struct { members, .. } => {
                    members.iter().filter(|m| is_location(&m.binding)).count() as u32
                }
                _ => 0,
            }
        })
        .sum()
}
