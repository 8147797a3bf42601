//! Vertex welding: one buffer slot per distinct attribute tuple.

use std::collections::HashMap;

use scene_core::{LoadError, LoadResult, Vertex};

use crate::{config::WeldStrategy, face::FaceRef, tables::AttributeTables};

#[derive(Debug, Default)]
pub struct VertexWelder {
    vertices: Vec<Vertex>,
    /// Present only for [`WeldStrategy::Hashed`].
    lookup: Option<HashMap<[u32; 8], u32>>,
}

impl VertexWelder {
    pub fn new(strategy: WeldStrategy) -> Self {
        let lookup = match strategy {
            WeldStrategy::Linear => None,
            WeldStrategy::Hashed => Some(HashMap::new()),
        };
        Self {
            vertices: Vec::new(),
            lookup,
        }
    }

    /// Build the vertex a reference points at and return its buffer index,
    /// appending it if no bit-identical vertex exists yet.
    pub fn resolve(
        &mut self,
        face_ref: FaceRef,
        tables: &AttributeTables,
        line: usize,
    ) -> LoadResult<u32> {
        let position = tables.position(face_ref.position, line)?;
        let normal = match face_ref.normal {
            Some(i) => tables.normal(i, line)?,
            None => [0.0; 3],
        };
        let texcoord = match face_ref.texcoord {
            Some(i) => tables.texcoord(i, line)?,
            None => [0.0; 2],
        };
        self.insert(Vertex::new(position, normal, texcoord))
    }

    /// Index of `vertex` in the buffer; the first occurrence wins.
    pub fn insert(&mut self, vertex: Vertex) -> LoadResult<u32> {
        let key = vertex.bit_key();
        let existing = match &self.lookup {
            Some(map) => map.get(&key).copied(),
            None => self
                .vertices
                .iter()
                .position(|v| v.bit_key() == key)
                .map(|i| i as u32),
        };
        if let Some(index) = existing {
            return Ok(index);
        }

        let index = u32::try_from(self.vertices.len()).map_err(|_| LoadError::TooManyVertices)?;
        self.vertices.push(vertex);
        if let Some(map) = &mut self.lookup {
            map.insert(key, index);
        }
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }
}
