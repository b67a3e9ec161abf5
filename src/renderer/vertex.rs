//! GPU-facing vertex and instance records

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::sim::TerrainVertex;

impl TerrainVertex {
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }

    /// Per-vertex layout for chunk meshes and the shared box meshes
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TerrainVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// One drawn copy of a shared mesh: model matrix plus flat tint
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Instance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 3],
    /// Multiplies the mesh's fog term; 0 disables fog
    pub fog: f32,
}

impl Instance {
    pub fn new(model: Mat4, color: [f32; 3]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
            fog: 1.0,
        }
    }

    pub fn without_fog(mut self) -> Self {
        self.fog = 0.0;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4
    ];

    /// Per-instance layout, following the vertex attributes at location 2
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Instance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Colors for scene elements
pub mod colors {
    pub const PLAYER: [f32; 3] = [0.9, 0.1, 0.1];
    pub const PURSUER: [f32; 3] = [0.1, 0.1, 0.9];
    pub const BUILDING: [f32; 3] = [0.4, 0.4, 0.4];
    pub const PROJECTILE: [f32; 3] = [1.0, 0.0, 0.0];
    pub const PUDDLE: [f32; 3] = crate::sim::terrain::palette::PUDDLE;
    /// Clear color and fog tint
    pub const FOG: [f32; 3] = [0.7, 0.75, 0.8];
}
