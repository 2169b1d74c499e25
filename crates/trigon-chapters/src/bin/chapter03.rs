use std::process::ExitCode;

use trigon_chapters::chapter03::HardcodedTriangle;
use trigon_engine::device::Gpu;

fn main() -> ExitCode {
    trigon_chapters::launch::<HardcodedTriangle<Gpu>>("Hello, wgpu!")
}
