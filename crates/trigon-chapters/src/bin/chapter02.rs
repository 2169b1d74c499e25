use std::process::ExitCode;

use trigon_chapters::chapter02::ClearScreen;

fn main() -> ExitCode {
    trigon_chapters::launch::<ClearScreen>("Hello, wgpu!")
}
