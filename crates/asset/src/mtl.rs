//! Material library (`.mtl`) loader.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use scene_core::{LoadError, LoadResult, Material};

use crate::lines::{lossy_lines, strip_comment};

/// Materials keyed by their `newmtl` name.
#[derive(Clone, Debug, Default)]
pub struct MaterialLibrary {
    materials: HashMap<String, Material>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Add a material, replacing any earlier one with the same name.
    pub fn insert(&mut self, material: Material) {
        if let Some(old) = self.materials.insert(material.name.clone(), material) {
            log::warn!("Material '{}' redefined; keeping the later one", old.name);
        }
    }

    /// Merge another library into this one; later definitions win.
    pub fn extend(&mut self, other: MaterialLibrary) {
        for material in other.materials.into_values() {
            self.insert(material);
        }
    }

    fn extend_one(&mut self, material: Option<Material>) {
        if let Some(material) = material {
            self.insert(material);
        }
    }
}

/// Where a library named by `mtllib` lives: next to the scene, never relative
/// to the working directory.
pub fn library_path(scene_dir: &Path, file_name: &str) -> PathBuf {
    scene_dir.join(file_name)
}

/// Open and parse the library `file_name` found in `scene_dir`.
pub fn load_library(scene_dir: &Path, file_name: &str) -> LoadResult<MaterialLibrary> {
    let path = library_path(scene_dir, file_name);
    log::debug!("Loading material library {}", path.display());
    let file = File::open(&path).map_err(|source| LoadError::MaterialFileNotFound {
        path: path.clone(),
        source,
    })?;
    parse_library(BufReader::new(file), &path)
}

/// Parse a material library from a reader. `path` is only used in errors.
pub fn parse_library<R: BufRead>(reader: R, path: &Path) -> LoadResult<MaterialLibrary> {
    let mut library = MaterialLibrary::new();
    let mut current: Option<Material> = None;

    for (line_no, line) in lossy_lines(reader).enumerate() {
        let line_no = line_no + 1;
        let line = line.map_err(|source| LoadError::MaterialFileNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let mut parts = strip_comment(&line).split_whitespace();
        let Some(key) = parts.next() else {
            continue;
        };

        if key == "newmtl" {
            let name = parts.next().ok_or(LoadError::MalformedDirective {
                line: line_no,
                directive: "newmtl",
                reason: "missing material name".into(),
            })?;
            library.extend_one(current.replace(Material::named(name)));
            continue;
        }

        let Some(material) = current.as_mut() else {
            log::warn!(
                "{}:{line_no}: '{key}' outside of any newmtl block, ignored",
                path.display()
            );
            continue;
        };

        match key {
            "Ka" => material.ambient = parse_color(parts, "Ka", path, line_no)?,
            "Kd" => material.diffuse = parse_color(parts, "Kd", path, line_no)?,
            "Ks" => material.specular = parse_color(parts, "Ks", path, line_no)?,
            "illum" => {
                material.illumination = parse_value(parts.next(), "illum", line_no)?;
            }
            "Ns" => material.shininess = parse_value(parts.next(), "Ns", line_no)?,
            _ => log::debug!("Ignoring material key '{key}' on line {line_no}"),
        }
    }
    library.extend_one(current);

    Ok(library)
}

/// Parse a library held in memory.
pub fn parse_library_str(contents: &str) -> LoadResult<MaterialLibrary> {
    parse_library(io::Cursor::new(contents), Path::new("<memory>"))
}

/// `r g b`, or a single value broadcast to all three channels.
fn parse_color<'a>(
    parts: impl Iterator<Item = &'a str>,
    directive: &'static str,
    path: &Path,
    line: usize,
) -> LoadResult<[f32; 3]> {
    let values = parts
        .map(|token| parse_value::<f32>(Some(token), directive, line))
        .collect::<LoadResult<Vec<f32>>>()?;
    match values.as_slice() {
        [v] => Ok([*v; 3]),
        [r, g, b] => Ok([*r, *g, *b]),
        _ => Err(LoadError::MalformedMaterial {
            path: path.to_path_buf(),
            line,
            directive,
            count: values.len(),
        }),
    }
}

fn parse_value<T: std::str::FromStr>(
    token: Option<&str>,
    directive: &'static str,
    line: usize,
) -> LoadResult<T> {
    let token = token.ok_or(LoadError::MalformedDirective {
        line,
        directive,
        reason: "missing value".into(),
    })?;
    token.parse::<T>().map_err(|_| LoadError::MalformedDirective {
        line,
        directive,
        reason: format!("invalid value '{token}'"),
    })
}
