//! Material records read from a material library.

use bytemuck::{Pod, Zeroable};

/// Shading parameters of one `newmtl` block. Unset properties stay zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub illumination: u32,
    pub shininess: f32,
}

impl Material {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Pack into the std140-friendly layout expected by a uniform buffer.
    pub fn uniform(&self) -> MaterialUniform {
        let pad = |[r, g, b]: [f32; 3]| [r, g, b, 0.0];
        MaterialUniform {
            ambient: pad(self.ambient),
            diffuse: pad(self.diffuse),
            specular: pad(self.specular),
            illumination: self.illumination,
            shininess: self.shininess,
            _pad: [0; 2],
        }
    }
}

/// Material UBO (16-byte aligned).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub illumination: u32,
    pub shininess: f32,
    _pad: [u32; 2],
}
