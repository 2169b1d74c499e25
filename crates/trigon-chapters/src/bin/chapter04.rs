use std::process::ExitCode;

use trigon_chapters::chapter04::VertexTriangle;
use trigon_engine::device::Gpu;

fn main() -> ExitCode {
    trigon_chapters::launch::<VertexTriangle<Gpu>>("Hello, wgpu!")
}
