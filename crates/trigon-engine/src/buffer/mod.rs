//! Device-resident buffers populated through a staging copy.

mod upload;

pub use upload::{upload_vertices, VertexBuffer};
