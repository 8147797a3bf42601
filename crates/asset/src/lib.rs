//! Scene ingestion: OBJ geometry plus MTL material libraries, welded into
//! one shared vertex buffer and split into per-material meshes.

pub mod config;
pub mod face;
mod lines;
pub mod mesh;
pub mod mtl;
pub mod obj;
pub mod tables;
pub mod triangulate;
pub mod weld;

pub use config::{LoadOptions, WeldStrategy};
pub use mesh::{Bounds, Mesh, Scene};
pub use mtl::MaterialLibrary;
pub use obj::{
    STDIN_SENTINEL, load_scene, load_scene_from_path, load_scene_from_reader, load_scene_from_str,
};
pub use scene_core::{LoadError, LoadResult, Material, MaterialUniform, Vertex};
