use bytemuck::{Pod, Zeroable};

use crate::device::VertexInput;

/// A vertex carrying only a position.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    const SPLIT_ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32, // x
        1 => Float32, // y
        2 => Float32  // z
    ];

    const PACKED_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Three scalar attributes at locations 0, 1, 2.
    pub fn split_layout() -> VertexInput {
        VertexInput {
            stride: std::mem::size_of::<Position>() as u64,
            attributes: &Self::SPLIT_ATTRS,
        }
    }

    /// One `vec3` attribute at location 0.
    pub fn packed_layout() -> VertexInput {
        VertexInput {
            stride: std::mem::size_of::<Position>() as u64,
            attributes: &Self::PACKED_ATTRS,
        }
    }
}
