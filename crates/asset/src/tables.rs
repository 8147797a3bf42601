//! Raw attribute tables, indexed in order of first appearance.

use scene_core::{AttributeKind, LoadError, LoadResult};

/// Current length of each table; used to resolve relative face references.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub positions: usize,
    pub texcoords: usize,
    pub normals: usize,
}

impl TableCounts {
    pub fn of(&self, attribute: AttributeKind) -> usize {
        match attribute {
            AttributeKind::Position => self.positions,
            AttributeKind::Texcoord => self.texcoords,
            AttributeKind::Normal => self.normals,
        }
    }
}

#[derive(Debug, Default)]
pub struct AttributeTables {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    texcoords: Vec<[f32; 2]>,
}

impl AttributeTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_position(&mut self, x: f32, y: f32, z: f32) -> usize {
        self.positions.push([x, y, z]);
        self.positions.len() - 1
    }

    pub fn append_normal(&mut self, x: f32, y: f32, z: f32) -> usize {
        self.normals.push([x, y, z]);
        self.normals.len() - 1
    }

    pub fn append_texcoord(&mut self, u: f32, v: f32) -> usize {
        self.texcoords.push([u, v]);
        self.texcoords.len() - 1
    }

    pub fn counts(&self) -> TableCounts {
        TableCounts {
            positions: self.positions.len(),
            texcoords: self.texcoords.len(),
            normals: self.normals.len(),
        }
    }

    pub fn position(&self, index: usize, line: usize) -> LoadResult<[f32; 3]> {
        lookup(&self.positions, index, AttributeKind::Position, line)
    }

    pub fn normal(&self, index: usize, line: usize) -> LoadResult<[f32; 3]> {
        lookup(&self.normals, index, AttributeKind::Normal, line)
    }

    pub fn texcoord(&self, index: usize, line: usize) -> LoadResult<[f32; 2]> {
        lookup(&self.texcoords, index, AttributeKind::Texcoord, line)
    }
}

fn lookup<T: Copy>(
    table: &[T],
    index: usize,
    attribute: AttributeKind,
    line: usize,
) -> LoadResult<T> {
    table
        .get(index)
        .copied()
        .ok_or(LoadError::UnresolvedReference {
            line,
            attribute,
            // Report the 1-based index as written in the file.
            index: index as i64 + 1,
            len: table.len(),
        })
}
