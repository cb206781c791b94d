use nalgebra_glm as glm;

use crate::picture::unpack_rgb;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobeVertex {
    pub(crate) position: [f32; 3],
    pub(crate) normal: [f32; 3],
    pub(crate) color: [f32; 3],
}

impl GlobeVertex {
    pub fn new(position: &glm::DVec3, normal: &glm::DVec3, color: [f32; 3]) -> Self {
        Self {
            position: [position.x as f32, position.y as f32, position.z as f32],
            normal: [normal.x as f32, normal.y as f32, normal.z as f32],
            color,
        }
    }

    /// Linear color for an sRGB `0xRRGGBB` value; the surface format is sRGB.
    pub fn color_from_packed(packed: u32) -> [f32; 3] {
        unpack_rgb(packed).map(|c| srgb_to_linear(c as f32 / 255.0))
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];

        wgpu::VertexBufferLayout {
            array_stride: size_of::<GlobeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
