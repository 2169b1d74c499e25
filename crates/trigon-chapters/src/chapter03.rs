//! A triangle whose corners live in the vertex shader.

use anyhow::Context;
use trigon_engine::core::{App, AppResult, InitCtx};
use trigon_engine::device::{Backend, DrawCall, Rasterizer};
use trigon_engine::pipeline::{build_pipeline, PipelineSpec};
use trigon_engine::render::{render_frame, CLEAR_COLOR};

const PIPELINE: PipelineSpec<'static> = PipelineSpec {
    label: "hardcoded triangle",
    vertex_shader: "RawTriangle.vert",
    fragment_shader: "SolidColor.frag",
    vertex_input: None,
    rasterizer: Rasterizer {
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: None,
    },
};

pub struct HardcodedTriangle<B: Backend> {
    pipeline: B::Pipeline,
}

impl<B: Backend> App<B> for HardcodedTriangle<B> {
    fn init(ctx: InitCtx<'_, B>) -> anyhow::Result<Self> {
        let pipeline = build_pipeline(ctx.backend, ctx.shaders, &PIPELINE)
            .context("couldn't create graphics pipeline")?;
        Ok(Self { pipeline })
    }

    fn iterate(&mut self, backend: &mut B) -> AppResult {
        let draw = DrawCall {
            pipeline: &self.pipeline,
            vertex_buffer: None,
            vertex_count: 3,
        };
        render_frame(backend, CLEAR_COLOR, Some(draw))
    }
}
