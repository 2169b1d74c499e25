//! Tutorial chapters, each one step further than the last.
//!
//! Every chapter is an [`App`] generic over the
//! [`Backend`](trigon_engine::device::Backend), so the same code
//! runs on the wgpu device in the binaries and on the recording backend in
//! tests.

use std::process::ExitCode;

use anyhow::Result;
use trigon_engine::core::{App, AppResult};
use trigon_engine::device::{Gpu, GpuInit};
use trigon_engine::logging::{init_logging, LoggingConfig};
use trigon_engine::shader::ShaderLoader;
use trigon_engine::window::{Runtime, RuntimeConfig};

pub mod chapter01;
pub mod chapter02;
pub mod chapter03;
pub mod chapter04;

/// Shared `main` for the chapter binaries.
pub fn launch<A>(title: &str) -> ExitCode
where
    A: App<Gpu> + 'static,
{
    init_logging(LoggingConfig::default());

    match run::<A>(title) {
        Ok(result) => result.exit_code(),
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run<A>(title: &str) -> Result<AppResult>
where
    A: App<Gpu> + 'static,
{
    let config = RuntimeConfig {
        title: title.to_owned(),
        ..RuntimeConfig::default()
    };

    Runtime::run::<A>(config, GpuInit::default().with_env_overrides(), shader_loader()?)
}

/// Shaders next to the executable, falling back to this crate's sources when
/// running from a cargo target directory.
fn shader_loader() -> Result<ShaderLoader> {
    let loader = ShaderLoader::from_executable()?;
    if loader.base_path().join(ShaderLoader::SHADER_DIR).is_dir() {
        return Ok(loader);
    }

    log::debug!(
        "no {} directory in {}, using crate sources",
        ShaderLoader::SHADER_DIR,
        loader.base_path().display()
    );
    Ok(ShaderLoader::new(env!("CARGO_MANIFEST_DIR")))
}


#[cfg(test)]
mod tests {
    use super::*;
    use trigon_engine::shader::ShaderFormat;
    use wgpu::naga;

    const SHADERS: [&str; 3] = ["RawTriangle.vert", "OnlyPosition.vert", "SolidColor.frag"];

    fn validate(module: &naga::Module) {
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(module)
        .unwrap();
    }

    fn stage(name: &str) -> naga::ShaderStage {
        if name.contains(".vert") {
            naga::ShaderStage::Vertex
        } else {
            naga::ShaderStage::Fragment
        }
    }

    #[test]
    fn shipped_wgsl_shaders_validate() {
        let loader = testing::shaders();
        for name in SHADERS {
            let path = loader.shader_path(name, ShaderFormat::Wgsl);
            let src = std::fs::read_to_string(&path).unwrap();
            let module = naga::front::wgsl::parse_str(&src)
                .unwrap_or_else(|e| panic!("{}: {}", path.display(), e.emit_to_string(&src)));
            validate(&module);
            assert!(module
                .entry_points
                .iter()
                .any(|ep| ep.name == "main" && ep.stage == stage(name)));
        }
    }

    #[test]
    fn shipped_glsl_shaders_validate() {
        let loader = testing::shaders();
        for name in SHADERS {
            let path = loader.shader_path(name, ShaderFormat::Glsl);
            let src = std::fs::read_to_string(&path).unwrap();
            let options = naga::front::glsl::Options::from(stage(name));
            let module = naga::front::glsl::Frontend::default()
                .parse(&options, &src)
                .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
            validate(&module);
        }
    }

    #[test]
    fn crate_sources_hold_the_shaders() {
        let loader = testing::shaders();
        assert!(loader.base_path().join(ShaderLoader::SHADER_DIR).is_dir());
    }
}
