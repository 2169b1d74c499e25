use std::process::ExitCode;

use trigon_chapters::chapter01::HelloWindow;

fn main() -> ExitCode {
    trigon_chapters::launch::<HelloWindow>("Hello, wgpu!")
}
