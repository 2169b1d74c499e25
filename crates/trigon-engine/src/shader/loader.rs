use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::device::{Backend, ShaderDesc};

use super::{ShaderError, ShaderFormat, ShaderStage};

/// Resource bindings a shader declares, per kind.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ResourceCounts {
    pub samplers: u32,
    pub uniform_buffers: u32,
    pub storage_buffers: u32,
    pub storage_textures: u32,
}

impl ResourceCounts {
    /// A shader that binds nothing.
    pub const NONE: ResourceCounts = ResourceCounts {
        samplers: 0,
        uniform_buffers: 0,
        storage_buffers: 0,
        storage_textures: 0,
    };
}

/// Reads compiled shader files from `<base>/shaders`.
#[derive(Debug, Clone)]
pub struct ShaderLoader {
    base_path: PathBuf,
}

impl ShaderLoader {
    /// Directory under the base path that holds shader files.
    pub const SHADER_DIR: &'static str = "shaders";

    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Uses `TRIGON_BASE_PATH` when set, otherwise the directory containing
    /// the running executable.
    pub fn from_executable() -> Result<Self> {
        if let Some(base) = std::env::var_os("TRIGON_BASE_PATH") {
            return Ok(Self::new(base));
        }

        let exe = std::env::current_exe().context("couldn't locate the running executable")?;
        let base = exe
            .parent()
            .context("executable path has no parent directory")?;
        Ok(Self::new(base))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// `<base>/shaders/<name><ext>`.
    pub fn shader_path(&self, name: &str, format: ShaderFormat) -> PathBuf {
        self.base_path
            .join(Self::SHADER_DIR)
            .join(format!("{name}{}", format.extension()))
    }

    /// Loads and compiles the shader `name` (e.g. `"SolidColor.frag"`).
    ///
    /// Fails without touching the backend if the stage can't be deduced or no
    /// accepted format exists. Every failure is logged before it is returned.
    pub fn load<B: Backend>(
        &self,
        backend: &B,
        name: &str,
        resources: ResourceCounts,
    ) -> Result<B::Shader, ShaderError> {
        self.load_inner(backend, name, resources)
            .inspect_err(|e| log::error!("{e}"))
    }

    fn load_inner<B: Backend>(
        &self,
        backend: &B,
        name: &str,
        resources: ResourceCounts,
    ) -> Result<B::Shader, ShaderError> {
        let stage = ShaderStage::from_file_name(name)?;

        let format = backend
            .shader_formats()
            .select()
            .ok_or_else(|| ShaderError::NoSupportedFormat(backend.driver_name()))?;

        let path = self.shader_path(name, format);
        let code = std::fs::read(&path).map_err(|error| ShaderError::Read {
            path: path.clone(),
            error,
        })?;

        let shader = backend
            .create_shader(&ShaderDesc {
                label: name,
                code: &code,
                entry_point: format.entry_point(),
                format,
                stage,
                resources,
            })
            .map_err(|error| ShaderError::Create {
                path: path.clone(),
                error,
            })?;

        log::debug!("loaded {stage} shader {}", path.display());
        Ok(shader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::mock::{MockBackend, MockOp};
    use crate::shader::ShaderFormats;
    use pretty_assertions::assert_eq;

    /// Temporary base directory with a `shaders/` subdirectory.
    struct Scratch(PathBuf);

    impl Scratch {
        fn new(tag: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "trigon-loader-{}-{tag}",
                std::process::id()
            ));
            std::fs::create_dir_all(dir.join(ShaderLoader::SHADER_DIR)).unwrap();
            Self(dir)
        }

        fn write(&self, file: &str, contents: &[u8]) {
            std::fs::write(self.0.join(ShaderLoader::SHADER_DIR).join(file), contents).unwrap();
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn path_is_base_shaders_name_extension() {
        let loader = ShaderLoader::new("/opt/app");
        assert_eq!(
            loader.shader_path("OnlyPosition.vert", ShaderFormat::SpirV),
            Path::new("/opt/app/shaders/OnlyPosition.vert.spv")
        );
        assert_eq!(
            loader.shader_path("SolidColor.frag", ShaderFormat::Wgsl),
            Path::new("/opt/app/shaders/SolidColor.frag.wgsl")
        );
        assert_eq!(
            loader.shader_path("SolidColor.frag", ShaderFormat::Glsl),
            Path::new("/opt/app/shaders/SolidColor.frag.glsl")
        );
    }

    #[test]
    fn loads_the_format_the_backend_accepts() {
        let scratch = Scratch::new("accepts");
        scratch.write("SolidColor.frag.wgsl", b"wgsl source");
        scratch.write("SolidColor.frag.glsl", b"glsl source!");

        let loader = ShaderLoader::new(&scratch.0);
        let backend = MockBackend::new().with_formats(ShaderFormats::GLSL);

        let shader = loader
            .load(&backend, "SolidColor.frag", ResourceCounts::NONE)
            .unwrap();

        assert_eq!(shader.format, Some(ShaderFormat::Glsl));
        assert_eq!(shader.stage, Some(ShaderStage::Fragment));
        assert_eq!(shader.size, b"glsl source!".len() as u64);
    }

    #[test]
    fn unknown_stage_never_reaches_backend() {
        let backend = MockBackend::new();
        let journal = backend.journal();

        let err = ShaderLoader::new("/nonexistent")
            .load(&backend, "SolidColor", ResourceCounts::NONE)
            .unwrap_err();

        assert!(matches!(err, ShaderError::UnknownStage(_)));
        assert!(journal.filtered("create").is_empty());
    }

    #[test]
    fn no_accepted_format_names_the_backend() {
        let backend = MockBackend::new().with_formats(ShaderFormats::NONE);

        let err = ShaderLoader::new("/nonexistent")
            .load(&backend, "SolidColor.frag", ResourceCounts::NONE)
            .unwrap_err();

        assert!(matches!(err, ShaderError::NoSupportedFormat(ref name) if name == "mock"));
    }

    #[test]
    fn missing_file_reports_full_path() {
        let scratch = Scratch::new("missing");
        let backend = MockBackend::new().with_formats(ShaderFormats::SPIRV);
        let journal = backend.journal();

        let err = ShaderLoader::new(&scratch.0)
            .load(&backend, "OnlyPosition.vert", ResourceCounts::NONE)
            .unwrap_err();

        match err {
            ShaderError::Read { path, .. } => assert_eq!(
                path,
                scratch.0.join("shaders").join("OnlyPosition.vert.spv")
            ),
            other => panic!("unexpected error: {other}"),
        }
        assert!(journal.filtered("create").is_empty());
    }

    #[test]
    fn backend_rejection_is_reported_as_create_error() {
        let scratch = Scratch::new("rejected");
        scratch.write("OnlyPosition.vert.wgsl", b"not really wgsl");
        let backend = MockBackend::new().failing(MockOp::CreateShader);

        let err = ShaderLoader::new(&scratch.0)
            .load(&backend, "OnlyPosition.vert", ResourceCounts::NONE)
            .unwrap_err();

        assert!(matches!(err, ShaderError::Create { .. }));
        assert!(err.to_string().contains("CreateShader failed"));
    }

    #[test]
    fn base_path_override_from_env() {
        // Only this test touches TRIGON_BASE_PATH.
        unsafe { std::env::set_var("TRIGON_BASE_PATH", "/srv/trigon") };
        let loader = ShaderLoader::from_executable().unwrap();
        unsafe { std::env::remove_var("TRIGON_BASE_PATH") };

        assert_eq!(loader.base_path(), Path::new("/srv/trigon"));
    }
}
