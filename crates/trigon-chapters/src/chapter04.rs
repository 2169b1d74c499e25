//! A triangle uploaded into a vertex buffer.

use anyhow::Context;
use trigon_engine::buffer::{upload_vertices, VertexBuffer};
use trigon_engine::core::{App, AppResult, InitCtx};
use trigon_engine::device::{Backend, DrawCall, Rasterizer};
use trigon_engine::pipeline::{build_pipeline, PipelineSpec, Position};
use trigon_engine::render::{render_frame, CLEAR_COLOR};

/// Counter-clockwise: bottom-left, bottom-right, top-middle.
pub const TRIANGLE: [Position; 3] = [
    Position::new(-1.0, -1.0, 0.0),
    Position::new(1.0, -1.0, 0.0),
    Position::new(0.0, 1.0, 0.0),
];

fn pipeline_spec() -> PipelineSpec<'static> {
    PipelineSpec {
        label: "vertex triangle",
        vertex_shader: "OnlyPosition.vert",
        fragment_shader: "SolidColor.frag",
        vertex_input: Some(Position::split_layout()),
        rasterizer: Rasterizer::ccw_back_cull(),
    }
}

pub struct VertexTriangle<B: Backend> {
    // Released before the pipeline.
    vertices: VertexBuffer<B>,
    pipeline: B::Pipeline,
}

impl<B: Backend> App<B> for VertexTriangle<B> {
    fn init(ctx: InitCtx<'_, B>) -> anyhow::Result<Self> {
        let pipeline = build_pipeline(ctx.backend, ctx.shaders, &pipeline_spec())
            .context("couldn't create graphics pipeline")?;

        let vertices = upload_vertices(ctx.backend, "triangle", &TRIANGLE)
            .context("couldn't create vertex buffer")?;

        Ok(Self { vertices, pipeline })
    }

    fn iterate(&mut self, backend: &mut B) -> AppResult {
        let draw = DrawCall {
            pipeline: &self.pipeline,
            vertex_buffer: Some(self.vertices.buffer()),
            vertex_count: self.vertices.count(),
        };
        render_frame(backend, CLEAR_COLOR, Some(draw))
    }
}
