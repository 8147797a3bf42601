//! Renderer-facing scene: per-material meshes over one shared vertex buffer.

use std::sync::Arc;

use glam::Vec3;
use scene_core::{Material, Vertex};

/// Indexed triangle list drawn with a single material.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    vertices: Arc<[Vertex]>,
    pub indices: Vec<u32>,
    pub material: Material,
}

impl Mesh {
    /// Shared vertex buffer; every mesh of a scene returns the same one.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice::<u32, u8>(&self.indices)
    }
}

/// Axis-aligned bounds of the welded vertex positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Result of a load: ordered meshes sharing one deduplicated vertex buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    vertices: Arc<[Vertex]>,
    meshes: Vec<Mesh>,
}

impl Scene {
    /// Attach `vertices` to every `(material, indices)` group, keeping order.
    pub(crate) fn new(vertices: Vec<Vertex>, groups: Vec<(Material, Vec<u32>)>) -> Self {
        let vertices: Arc<[Vertex]> = vertices.into();
        let meshes = groups
            .into_iter()
            .map(|(material, indices)| Mesh {
                vertices: Arc::clone(&vertices),
                indices,
                material,
            })
            .collect();
        Self { vertices, meshes }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice::<Vertex, u8>(&self.vertices)
    }

    pub fn index_count(&self) -> usize {
        self.meshes.iter().map(|m| m.indices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.index_count() / 3
    }

    /// `None` for a scene without vertices.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut positions = self.vertices.iter().map(|v| Vec3::from_array(v.position));
        let first = positions.next()?;
        let (min, max) = positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Bounds { min, max })
    }
}
