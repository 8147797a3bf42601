//! OBJ scene loader: dispatches directives line by line and groups the
//! resulting triangles into one mesh per `usemtl` block.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use scene_core::{LoadError, LoadResult, Material};

use crate::{
    config::LoadOptions,
    face::parse_face,
    lines::{lossy_lines, strip_comment},
    mesh::Scene,
    mtl::{MaterialLibrary, load_library},
    tables::AttributeTables,
    triangulate::triangulate,
    weld::VertexWelder,
};

/// Scene source that means "read from standard input".
pub const STDIN_SENTINEL: &str = "-";

/// Load a scene from a path, or from standard input for [`STDIN_SENTINEL`].
pub fn load_scene(source: &str, options: &LoadOptions) -> LoadResult<Scene> {
    if source == STDIN_SENTINEL {
        let stdin = io::stdin();
        parse_scene(stdin.lock(), Path::new("<stdin>"), reader_material_dir(options), options)
    } else {
        load_scene_from_path(source, options)
    }
}

/// Load a scene file. `mtllib` names resolve against the file's directory.
pub fn load_scene_from_path(path: impl AsRef<Path>, options: &LoadOptions) -> LoadResult<Scene> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let material_dir = match &options.material_dir {
        Some(dir) => dir.clone(),
        None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    parse_scene(BufReader::new(file), path, material_dir, options)
}

/// Load a scene from a [`BufRead`] implementation.
pub fn load_scene_from_reader<R: BufRead>(reader: R, options: &LoadOptions) -> LoadResult<Scene> {
    parse_scene(reader, Path::new("<reader>"), reader_material_dir(options), options)
}

/// Convenience helper to parse an OBJ string literal with default options.
pub fn load_scene_from_str(contents: &str) -> LoadResult<Scene> {
    load_scene_from_reader(io::Cursor::new(contents), &LoadOptions::default())
}

fn reader_material_dir(options: &LoadOptions) -> PathBuf {
    options.material_dir.clone().unwrap_or_default()
}

fn parse_scene<R: BufRead>(
    reader: R,
    source: &Path,
    material_dir: PathBuf,
    options: &LoadOptions,
) -> LoadResult<Scene> {
    log::info!("Loading scene from {} (weld={})", source.display(), options.weld);
    let mut builder = SceneBuilder::new(material_dir, options);

    for (line_no, line) in lossy_lines(reader).enumerate() {
        let line = line.map_err(|err| LoadError::FileNotFound {
            path: source.to_path_buf(),
            source: err,
        })?;
        builder.process_line(line_no + 1, &line)?;
    }

    let scene = builder.finish()?;
    log::info!(
        "Loaded scene {}: {} vertices, {} meshes, {} triangles",
        source.display(),
        scene.vertices().len(),
        scene.meshes().len(),
        scene.triangle_count()
    );
    Ok(scene)
}

/// Directives the loader acts on. Matching is exact and case-sensitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    Position,
    Texcoord,
    Normal,
    Face,
    MaterialLibrary,
    UseMaterial,
}

impl Directive {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "v" => Some(Directive::Position),
            "vt" => Some(Directive::Texcoord),
            "vn" => Some(Directive::Normal),
            "f" => Some(Directive::Face),
            "mtllib" => Some(Directive::MaterialLibrary),
            "usemtl" => Some(Directive::UseMaterial),
            _ => None,
        }
    }
}

/// Which mesh faces are currently appended to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MeshCursor {
    NoMeshYet,
    InMesh(usize),
}

/// Per-load state. Nothing here outlives a single call.
struct SceneBuilder {
    tables: AttributeTables,
    welder: VertexWelder,
    materials: MaterialLibrary,
    material_dir: PathBuf,
    cursor: MeshCursor,
    groups: Vec<(Material, Vec<u32>)>,
    faces: usize,
}

impl SceneBuilder {
    fn new(material_dir: PathBuf, options: &LoadOptions) -> Self {
        Self {
            tables: AttributeTables::new(),
            welder: VertexWelder::new(options.weld),
            materials: MaterialLibrary::new(),
            material_dir,
            cursor: MeshCursor::NoMeshYet,
            groups: Vec::new(),
            faces: 0,
        }
    }

    fn process_line(&mut self, line_no: usize, line: &str) -> LoadResult<()> {
        let trimmed = strip_comment(line).trim();
        let (keyword, rest) = trimmed
            .split_once(char::is_whitespace)
            .unwrap_or((trimmed, ""));

        let Some(directive) = Directive::from_keyword(keyword) else {
            if !keyword.is_empty() {
                log::debug!("Ignoring '{keyword}' directive on line {line_no}");
            }
            return Ok(());
        };

        match directive {
            Directive::Position => {
                let [x, y, z] = parse_floats::<3>(rest, 3, "v", line_no)?;
                self.tables.append_position(x, y, z);
            }
            Directive::Texcoord => {
                let [u, v] = parse_floats::<2>(rest, 1, "vt", line_no)?;
                self.tables.append_texcoord(u, v);
            }
            Directive::Normal => {
                let [x, y, z] = parse_floats::<3>(rest, 3, "vn", line_no)?;
                self.tables.append_normal(x, y, z);
            }
            Directive::Face => self.add_face(rest, line_no)?,
            Directive::MaterialLibrary => self.load_libraries(rest, line_no)?,
            Directive::UseMaterial => self.use_material(rest, line_no)?,
        }
        Ok(())
    }

    fn add_face(&mut self, rest: &str, line_no: usize) -> LoadResult<()> {
        let refs = parse_face(rest, self.tables.counts(), line_no)?;
        let triangles = triangulate(&refs, line_no)?;

        let mut indices = Vec::with_capacity(triangles.len());
        for face_ref in triangles {
            indices.push(self.welder.resolve(face_ref, &self.tables, line_no)?);
        }
        self.current_mesh().extend(indices);
        self.faces += 1;
        Ok(())
    }

    fn load_libraries(&mut self, rest: &str, line_no: usize) -> LoadResult<()> {
        let mut names = rest.split_whitespace().peekable();
        if names.peek().is_none() {
            return Err(missing_name("mtllib", line_no));
        }
        for name in names {
            let library = load_library(&self.material_dir, name)?;
            log::debug!("Material library '{name}' provided {} materials", library.len());
            self.materials.extend(library);
        }
        Ok(())
    }

    fn use_material(&mut self, rest: &str, line_no: usize) -> LoadResult<()> {
        let name = rest
            .split_whitespace()
            .next()
            .ok_or_else(|| missing_name("usemtl", line_no))?;
        let material = self
            .materials
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::UnknownMaterial {
                line: line_no,
                name: name.to_owned(),
            })?;
        self.groups.push((material, Vec::new()));
        self.cursor = MeshCursor::InMesh(self.groups.len() - 1);
        Ok(())
    }

    /// Index list of the mesh faces go to, opening a default-material mesh
    /// if no `usemtl` has been seen yet.
    fn current_mesh(&mut self) -> &mut Vec<u32> {
        let index = match self.cursor {
            MeshCursor::InMesh(index) => index,
            MeshCursor::NoMeshYet => {
                self.groups.push((Material::default(), Vec::new()));
                let index = self.groups.len() - 1;
                self.cursor = MeshCursor::InMesh(index);
                index
            }
        };
        &mut self.groups[index].1
    }

    fn finish(self) -> LoadResult<Scene> {
        if self.faces == 0 {
            return Err(LoadError::EmptyScene);
        }
        let groups = self
            .groups
            .into_iter()
            .filter(|(material, indices)| {
                if indices.is_empty() {
                    log::warn!("usemtl '{}' received no faces, dropping it", material.name);
                }
                !indices.is_empty()
            })
            .collect();
        Ok(Scene::new(self.welder.into_vertices(), groups))
    }
}

fn missing_name(directive: &'static str, line: usize) -> LoadError {
    LoadError::MalformedDirective {
        line,
        directive,
        reason: "missing name".into(),
    }
}

/// Read up to `N` floats; the first `required` must be present, the rest
/// default to zero. Trailing extra values are ignored.
fn parse_floats<const N: usize>(
    rest: &str,
    required: usize,
    directive: &'static str,
    line: usize,
) -> LoadResult<[f32; N]> {
    let mut out = [0.0; N];
    let mut tokens = rest.split_whitespace();
    for (i, slot) in out.iter_mut().enumerate() {
        match tokens.next() {
            Some(token) => {
                *slot = token.parse().map_err(|_| LoadError::MalformedDirective {
                    line,
                    directive,
                    reason: format!("invalid number '{token}'"),
                })?;
            }
            None if i < required => {
                return Err(LoadError::MalformedDirective {
                    line,
                    directive,
                    reason: format!("expected {required} values, got {i}"),
                });
            }
            None => break,
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::{fs, io::Write};

    use scene_core::Vertex;

    use super::*;
    use crate::config::WeldStrategy;

    const QUAD: &str = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";

    const CUBE: &str = r#"
        # unit cube, mixed reference forms
        o cube
        v 0 0 0
        v 1 0 0
        v 1 1 0
        v 0 1 0
        v 0 0 1
        v 1 0 1
        v 1 1 1
        v 0 1 1
        vt 0 0
        vt 1 0
        vt 1 1
        vt 0 1
        vn 0 0 -1
        vn 0 0 1
        vn 0 -1 0
        vn 0 1 0
        vn -1 0 0
        vn 1 0 0
        g sides
        s off
        f 1/1/1 4/4/1 3/3/1 2/2/1
        f 5/1/2 6/2/2 7/3/2 8/4/2
        f 1//3 2//3 6//3 5//3
        f 4/1 8/2 7/3 3/4
        f 1 5 8 4
        f -7 -6 -2 -3
    "#;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn assert_consistent(scene: &Scene) {
        let len = scene.vertices().len() as u32;
        for mesh in scene.meshes() {
            assert_eq!(mesh.indices.len() % 3, 0);
            assert!(mesh.indices.iter().all(|&i| i < len));
        }
        let keys: Vec<[u32; 8]> = scene.vertices().iter().map(Vertex::bit_key).collect();
        for (i, key) in keys.iter().enumerate() {
            assert!(!keys[i + 1..].contains(key), "duplicate vertex {i}");
        }
    }

    #[test]
    fn keyword_match_is_exact() {
        assert_eq!(Directive::from_keyword("v"), Some(Directive::Position));
        assert_eq!(Directive::from_keyword("vt"), Some(Directive::Texcoord));
        assert_eq!(Directive::from_keyword("vn"), Some(Directive::Normal));
        assert_eq!(Directive::from_keyword("f"), Some(Directive::Face));
        assert_eq!(Directive::from_keyword("usemtl"), Some(Directive::UseMaterial));
        assert_eq!(Directive::from_keyword("mtllib"), Some(Directive::MaterialLibrary));
        for other in ["vp", "V", "F", "fo", "vtn", "usemtl2", "o", "g", "s", "#", ""] {
            assert_eq!(Directive::from_keyword(other), None, "{other:?}");
        }
    }

    #[test]
    fn quad_becomes_two_fan_triangles() {
        let scene = load_scene_from_str(QUAD).unwrap();
        assert_eq!(scene.vertices().len(), 4);
        assert_eq!(scene.meshes().len(), 1);
        assert_eq!(scene.meshes()[0].indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(scene.meshes()[0].material, Material::default());
    }

    #[test]
    fn position_normal_face_zero_fills_texcoords() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
        let scene = load_scene_from_str(src).unwrap();
        assert_eq!(scene.vertices().len(), 3);
        for v in scene.vertices() {
            assert_eq!(v.texcoord, [0.0, 0.0]);
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
        assert_eq!(scene.meshes()[0].indices, vec![0, 1, 2]);
    }

    #[test]
    fn cube_is_consistent_and_welded() {
        let scene = load_scene_from_str(CUBE).unwrap();
        assert_consistent(&scene);
        assert_eq!(scene.triangle_count(), 12);
        // "4/1" carries vt 1 = (0, 0) and no normal, so bare "4" welds onto it.
        assert_eq!(scene.vertices().len(), 23);
        let bare = scene
            .vertices()
            .iter()
            .filter(|v| v.normal == [0.0; 3] && v.texcoord == [0.0; 2])
            .count();
        assert_eq!(bare, 8);
    }

    #[test]
    fn loading_twice_is_deterministic() {
        let a = load_scene_from_str(CUBE).unwrap();
        let b = load_scene_from_str(CUBE).unwrap();
        assert_eq!(a.vertex_bytes(), b.vertex_bytes());
        assert_eq!(a, b);
    }

    #[test]
    fn hashed_welding_matches_linear() {
        let linear = load_scene_from_str(CUBE).unwrap();
        let hashed = load_scene_from_reader(
            io::Cursor::new(CUBE),
            &LoadOptions::default().with_weld(WeldStrategy::Hashed),
        )
        .unwrap();
        assert_eq!(linear, hashed);
    }

    #[test]
    fn shared_corners_weld_across_faces() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3\nf 1 3 4\n";
        let scene = load_scene_from_str(src).unwrap();
        assert_eq!(scene.vertices().len(), 4);
        assert_eq!(scene.meshes()[0].indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn ignores_comments_and_unsupported_directives() {
        let src = "# header\n\no thing\ng group\ns 1\nvp 0.5\nv 0 0 0\r\nv 1 0 0\r\nv 0 1 0\r\nf 1 2 3\r\n";
        let scene = load_scene_from_str(src).unwrap();
        assert_eq!(scene.triangle_count(), 1);
    }

    #[test]
    fn latin1_comment_does_not_abort() {
        let src = b"# Cr\xE9\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let scene = load_scene_from_reader(&src[..], &LoadOptions::default()).unwrap();
        assert_eq!(scene.triangle_count(), 1);
    }

    #[test]
    fn trailing_comment_is_ignored() {
        let src = "v 0 0 0 # origin\nv 1 0 0\nv 0 1 0\nf 1 2 3 # tri\n";
        let scene = load_scene_from_str(src).unwrap();
        assert_eq!(scene.meshes()[0].indices, vec![0, 1, 2]);
    }

    #[test]
    fn texcoord_v_defaults_to_zero() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0.25\nf 1/1 2/1 3/1\n";
        let scene = load_scene_from_str(src).unwrap();
        assert_eq!(scene.vertices()[0].texcoord, [0.25, 0.0]);
    }

    #[test]
    fn fourth_position_component_is_ignored() {
        let src = "v 0 0 0 1\nv 1 0 0 1\nv 0 1 0 1\nf 1 2 3\n";
        let scene = load_scene_from_str(src).unwrap();
        assert_eq!(scene.vertices()[1].position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn bad_number_is_malformed_directive() {
        let err = load_scene_from_str("v 0 zero 0\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::MalformedDirective {
                line: 1,
                directive: "v",
                ..
            }
        ));
        let err = load_scene_from_str("v 0 0 0\nvn 0 1\n").unwrap_err();
        assert!(matches!(err, LoadError::MalformedDirective { line: 2, .. }));
    }

    #[test]
    fn two_vertex_face_is_degenerate() {
        let err = load_scene_from_str("v 0 0 0\nv 1 0 0\nf 1 2\n").unwrap_err();
        assert!(matches!(err, LoadError::DegenerateFace { line: 3, count: 2 }));
    }

    #[test]
    fn bad_face_token_is_malformed() {
        let err = load_scene_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3/\n").unwrap_err();
        assert!(matches!(err, LoadError::MalformedFace { line: 4, ref token } if token == "3/"));
    }

    #[test]
    fn reference_past_table_end_is_unresolved() {
        let err = load_scene_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n").unwrap_err();
        assert!(matches!(err, LoadError::UnresolvedReference { line: 4, .. }));
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn reference_to_later_vertex_is_unresolved() {
        let err = load_scene_from_str("v 0 0 0\nv 1 0 0\nf 1 2 3\nv 0 1 0\n").unwrap_err();
        assert!(matches!(err, LoadError::UnresolvedReference { line: 3, .. }));
    }

    #[test]
    fn negative_references_use_current_table_length() {
        let src = "v 9 9 9\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let scene = load_scene_from_str(src).unwrap();
        assert_eq!(scene.vertices()[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(scene.vertices()[2].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn no_faces_is_empty_scene() {
        assert!(matches!(load_scene_from_str(""), Err(LoadError::EmptyScene)));
        assert!(matches!(
            load_scene_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\n"),
            Err(LoadError::EmptyScene)
        ));
    }

    #[test]
    fn usemtl_without_library_is_unknown() {
        let err = load_scene_from_str("v 0 0 0\nusemtl ghost\n").unwrap_err();
        assert!(matches!(err, LoadError::UnknownMaterial { line: 2, ref name } if name == "ghost"));
    }

    #[test]
    fn usemtl_of_undeclared_material_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "lib.mtl", "newmtl real\nKd 1 1 1\n");
        let scene = write_file(dir.path(), "s.obj", "mtllib lib.mtl\nusemtl ghost\n");
        let err = load_scene_from_path(&scene, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::UnknownMaterial { .. }));
    }

    #[test]
    fn usemtl_starts_new_meshes_over_shared_vertices() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "scene.mtl",
            "newmtl red\nKd 1 0 0\nillum 2\nnewmtl blue\nKd 0 0 1\nNs 10\n",
        );
        let scene = write_file(
            dir.path(),
            "scene.obj",
            "mtllib scene.mtl\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
             f 1 2 3\nusemtl red\nf 1 3 4\nusemtl blue\nf 4 3 2 1\n",
        );
        let scene = load_scene_from_path(&scene, &LoadOptions::default()).unwrap();
        assert_consistent(&scene);
        assert_eq!(scene.vertices().len(), 4);

        let meshes = scene.meshes();
        assert_eq!(meshes.len(), 3);
        assert_eq!(meshes[0].material, Material::default());
        assert_eq!(meshes[0].indices, vec![0, 1, 2]);
        assert_eq!(meshes[1].material.name, "red");
        assert_eq!(meshes[1].material.diffuse, [1.0, 0.0, 0.0]);
        assert_eq!(meshes[1].material.illumination, 2);
        assert_eq!(meshes[1].indices, vec![0, 2, 3]);
        assert_eq!(meshes[2].material.shininess, 10.0);
        assert_eq!(meshes[2].indices, vec![3, 2, 1, 3, 1, 0]);
        assert!(std::ptr::eq(meshes[0].vertices(), meshes[2].vertices()));
    }

    #[test]
    fn assigned_material_is_a_copy() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.mtl", "newmtl m\nKd 1 0 0\n");
        write_file(dir.path(), "b.mtl", "newmtl m\nKd 0 1 0\n");
        let scene = write_file(
            dir.path(),
            "s.obj",
            "mtllib a.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl m\nf 1 2 3\n\
             mtllib b.mtl\nf 3 2 1\nusemtl m\nf 2 3 1\n",
        );
        let scene = load_scene_from_path(&scene, &LoadOptions::default()).unwrap();
        let meshes = scene.meshes();
        assert_eq!(meshes[0].material.diffuse, [1.0, 0.0, 0.0]);
        assert_eq!(meshes[0].triangle_count(), 2);
        assert_eq!(meshes[1].material.diffuse, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn empty_material_blocks_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "m.mtl", "newmtl a\nnewmtl b\n");
        let scene = write_file(
            dir.path(),
            "s.obj",
            "mtllib m.mtl\nusemtl a\nusemtl b\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        );
        let scene = load_scene_from_path(&scene, &LoadOptions::default()).unwrap();
        assert_eq!(scene.meshes().len(), 1);
        assert_eq!(scene.meshes()[0].material.name, "b");
    }

    #[test]
    fn library_resolves_next_to_scene_not_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("models");
        fs::create_dir(&nested).unwrap();
        write_file(&nested, "lib.mtl", "newmtl m\nKd 0.5\n");
        let scene = write_file(
            &nested,
            "s.obj",
            "mtllib lib.mtl\nusemtl m\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        );
        let scene = load_scene_from_path(&scene, &LoadOptions::default()).unwrap();
        assert_eq!(scene.meshes()[0].material.diffuse, [0.5, 0.5, 0.5]);
    }

    #[test]
    fn missing_library_fails() {
        let dir = tempfile::tempdir().unwrap();
        let scene = write_file(dir.path(), "s.obj", "mtllib gone.mtl\n");
        let err = load_scene_from_path(&scene, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::MaterialFileNotFound { .. }));
    }

    #[test]
    fn material_dir_option_applies_to_readers() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "lib.mtl", "newmtl m\nKs 0.25\n");
        let src = "mtllib lib.mtl\nusemtl m\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let options = LoadOptions::default().with_material_dir(dir.path());
        let scene = load_scene_from_reader(io::Cursor::new(src), &options).unwrap();
        assert_eq!(scene.meshes()[0].material.specular, [0.25; 3]);
    }

    #[test]
    fn mtllib_without_name_is_malformed() {
        let err = load_scene_from_str("mtllib\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::MalformedDirective {
                directive: "mtllib",
                ..
            }
        ));
    }

    #[test]
    fn missing_scene_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.obj");
        let err = load_scene(path.to_str().unwrap(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound { .. }));
    }
}
