//! Welded vertex as stored in the shared vertex buffer.

use bytemuck::{Pod, Zeroable};

/// Vertex with position/normal/texcoord. Missing attributes are zero-filled.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
}

impl Vertex {
    /// Byte stride of one vertex in an uploaded buffer.
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    pub fn new(position: [f32; 3], normal: [f32; 3], texcoord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            texcoord,
        }
    }

    /// Raw bit patterns of all 8 scalars. Two vertices weld iff their keys match,
    /// so `0.0` and `-0.0` stay distinct while identical NaNs collapse.
    pub fn bit_key(&self) -> [u32; 8] {
        let [px, py, pz] = self.position;
        let [nx, ny, nz] = self.normal;
        let [u, v] = self.texcoord;
        [px, py, pz, nx, ny, nz, u, v].map(f32::to_bits)
    }
}
