use crate::device::{Backend, GpuError, PipelineDesc, Rasterizer, VertexInput};
use crate::shader::{ResourceCounts, ShaderError, ShaderLoader};

/// Everything needed to build one graphics pipeline from files on disk.
#[derive(Debug, Clone)]
pub struct PipelineSpec<'a> {
    pub label: &'a str,
    /// Shader name, e.g. `"OnlyPosition.vert"`.
    pub vertex_shader: &'a str,
    pub fragment_shader: &'a str,
    /// `None` for shaders that synthesize their vertices.
    pub vertex_input: Option<VertexInput>,
    pub rasterizer: Rasterizer,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("couldn't create vertex shader: {0}")]
    VertexShader(ShaderError),

    #[error("couldn't create fragment shader: {0}")]
    FragmentShader(ShaderError),

    #[error("couldn't create graphics pipeline {label}: {error}")]
    Create { label: String, error: GpuError },
}

/// Loads both stages, builds the pipeline against the swapchain format and
/// releases the shader objects.
///
/// Steps run in order and stop at the first failure: a missing vertex shader
/// never loads the fragment shader, and no pipeline is created unless both
/// stages compiled.
pub fn build_pipeline<B: Backend>(
    backend: &B,
    loader: &ShaderLoader,
    spec: &PipelineSpec<'_>,
) -> Result<B::Pipeline, PipelineError> {
    let vertex_shader = loader
        .load(backend, spec.vertex_shader, ResourceCounts::NONE)
        .map_err(PipelineError::VertexShader)?;

    let fragment_shader = loader
        .load(backend, spec.fragment_shader, ResourceCounts::NONE)
        .map_err(PipelineError::FragmentShader)?;

    let pipeline = backend.create_pipeline(&PipelineDesc {
        label: spec.label,
        vertex_shader: &vertex_shader,
        fragment_shader: &fragment_shader,
        vertex_input: spec.vertex_input,
        rasterizer: spec.rasterizer,
        color_format: backend.swapchain_format(),
    });

    drop(vertex_shader);
    drop(fragment_shader);

    let pipeline = pipeline
        .map_err(|error| PipelineError::Create {
            label: spec.label.to_owned(),
            error,
        })
        .inspect_err(|e| log::error!("{e}"))?;

    log::debug!(
        "created pipeline {} ({} + {}, {} vertex attribute(s))",
        spec.label,
        spec.vertex_shader,
        spec.fragment_shader,
        spec.vertex_input.map_or(0, |v| v.attribute_count()),
    );

    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::mock::{MockBackend, MockOp};
    use crate::pipeline::Position;
    use pretty_assertions::assert_eq;

    struct Scratch(std::path::PathBuf);

    impl Scratch {
        fn with_shaders(tag: &str, names: &[&str]) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "trigon-pipeline-{}-{tag}",
                std::process::id()
            ));
            let shaders = dir.join(ShaderLoader::SHADER_DIR);
            std::fs::create_dir_all(&shaders).unwrap();
            for name in names {
                std::fs::write(shaders.join(format!("{name}.wgsl")), b"// stub").unwrap();
            }
            Self(dir)
        }

        fn loader(&self) -> ShaderLoader {
            ShaderLoader::new(&self.0)
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn spec() -> PipelineSpec<'static> {
        PipelineSpec {
            label: "triangle",
            vertex_shader: "OnlyPosition.vert",
            fragment_shader: "SolidColor.frag",
            vertex_input: Some(Position::split_layout()),
            rasterizer: Rasterizer::ccw_back_cull(),
        }
    }

    #[test]
    fn shaders_are_released_after_the_pipeline_is_built() {
        let scratch = Scratch::with_shaders("ok", &["OnlyPosition.vert", "SolidColor.frag"]);
        let backend = MockBackend::new();
        let journal = backend.journal();

        let pipeline = build_pipeline(&backend, &scratch.loader(), &spec()).unwrap();

        assert_eq!(
            journal.entries(),
            [
                "create shader OnlyPosition.vert",
                "create shader SolidColor.frag",
                "create pipeline triangle",
                "release shader OnlyPosition.vert",
                "release shader SolidColor.frag",
            ]
        );

        drop(pipeline);
        assert!(journal.contains("release pipeline triangle"));
    }

    #[test]
    fn missing_vertex_shader_stops_before_fragment_shader() {
        let scratch = Scratch::with_shaders("no-vs", &["SolidColor.frag"]);
        let backend = MockBackend::new();
        let journal = backend.journal();

        let err = build_pipeline(&backend, &scratch.loader(), &spec()).unwrap_err();

        assert!(matches!(err, PipelineError::VertexShader(ShaderError::Read { .. })));
        assert!(journal.entries().is_empty());
    }

    #[test]
    fn fragment_failure_releases_vertex_shader_and_skips_pipeline() {
        let scratch = Scratch::with_shaders("no-fs", &["OnlyPosition.vert"]);
        let backend = MockBackend::new();
        let journal = backend.journal();

        let err = build_pipeline(&backend, &scratch.loader(), &spec()).unwrap_err();

        assert!(matches!(err, PipelineError::FragmentShader(_)));
        assert_eq!(
            journal.entries(),
            [
                "create shader OnlyPosition.vert",
                "release shader OnlyPosition.vert",
            ]
        );
    }

    #[test]
    fn rejected_pipeline_still_releases_shaders() {
        let scratch = Scratch::with_shaders("rejected", &["OnlyPosition.vert", "SolidColor.frag"]);
        let backend = MockBackend::new().failing(MockOp::CreatePipeline);
        let journal = backend.journal();

        let err = build_pipeline(&backend, &scratch.loader(), &spec()).unwrap_err();

        assert!(matches!(err, PipelineError::Create { ref label, .. } if label == "triangle"));
        assert_eq!(journal.filtered("release").len(), 2);
        assert!(!journal.contains("release pipeline triangle"));
    }
}
