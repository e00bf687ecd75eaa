//! Mesh loading: where the turntable's single mesh comes from.
//!
//! A [`MeshSource`] names either a built-in primitive or a model file. Loading
//! produces CPU-side [`MeshData`]; files are recentered and scaled to fit the
//! unit cube so any model sits on the turntable at a sensible size.
//!
//! # Supported Formats
//!
//! | Format | Extensions | Notes |
//! |--------|------------|-------|
//! | STL    | `.stl`     | Binary and ASCII, no UV coordinates |
//! | OBJ    | `.obj`     | Triangulated on load; materials are ignored |

use crate::mesh::{MeshData, Vertex};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Errors that can occur when loading geometry.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown geometry format: '{0}'")]
    UnknownFormat(String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Loads an STL file from disk.
pub fn load_stl(path: impl AsRef<Path>) -> Result<MeshData, GeometryError> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    read_stl(&mut reader)
}

/// Parses STL from memory, e.g. an `include_bytes!` asset.
pub fn parse_stl(bytes: &[u8]) -> Result<MeshData, GeometryError> {
    let mut cursor = std::io::Cursor::new(bytes);
    read_stl(&mut cursor)
}

fn read_stl<R: std::io::Read + std::io::Seek>(reader: &mut R) -> Result<MeshData, GeometryError> {
    let stl = stl_io::read_stl(reader)
        .map_err(|e| GeometryError::Parse(format!("STL parse error: {}", e)))?;

    let mut vertices = Vec::with_capacity(stl.faces.len() * 3);
    let mut indices = Vec::with_capacity(stl.faces.len() * 3);

    // stl_io shares vertices between faces; split them again so each face keeps
    // its own flat normal.
    for (i, face) in stl.faces.iter().enumerate() {
        let normal: [f32; 3] = face.normal.into();

        for &vertex_idx in &face.vertices {
            let vertex = stl.vertices.get(vertex_idx).ok_or_else(|| {
                GeometryError::Parse(format!("face {} references missing vertex {}", i, vertex_idx))
            })?;
            let position: [f32; 3] = (*vertex).into();
            vertices.push(Vertex::new(position, normal, [0.0, 0.0]));
        }

        let base = (i * 3) as u32;
        indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    Ok(MeshData::new(vertices, indices))
}

/// Loads a Wavefront OBJ file from disk.
pub fn load_obj(path: impl AsRef<Path>) -> Result<MeshData, GeometryError> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    read_obj(&mut reader)
}

/// Parses OBJ from memory.
pub fn parse_obj(bytes: &[u8]) -> Result<MeshData, GeometryError> {
    let mut cursor = std::io::Cursor::new(bytes);
    read_obj(&mut cursor)
}

fn read_obj<R: std::io::BufRead>(reader: &mut R) -> Result<MeshData, GeometryError> {
    let options = tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    };
    // Only geometry is wanted; a missing .mtl must not fail the load.
    let (models, _materials) =
        tobj::load_obj_buf(reader, &options, |_| Err(tobj::LoadError::OpenFileFailed))
            .map_err(|e| GeometryError::Parse(format!("OBJ parse error: {}", e)))?;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut has_normals = true;

    for model in &models {
        let mesh = &model.mesh;
        let base = vertices.len() as u32;
        let count = mesh.positions.len() / 3;
        has_normals &= mesh.normals.len() == count * 3;

        for i in 0..count {
            let position = [
                mesh.positions[3 * i],
                mesh.positions[3 * i + 1],
                mesh.positions[3 * i + 2],
            ];
            let normal = match mesh.normals.get(3 * i..3 * i + 3) {
                Some(n) => [n[0], n[1], n[2]],
                None => [0.0; 3],
            };
            // OBJ puts v = 0 at the bottom of the image, wgpu at the top.
            let uv = match mesh.texcoords.get(2 * i..2 * i + 2) {
                Some(t) => [t[0], 1.0 - t[1]],
                None => [0.0; 2],
            };
            vertices.push(Vertex::new(position, normal, uv));
        }

        for &index in &mesh.indices {
            if index as usize >= count {
                return Err(GeometryError::Parse(format!(
                    "model '{}' references missing vertex {}",
                    model.name, index
                )));
            }
            indices.push(base + index);
        }
    }

    let mut mesh = MeshData::new(vertices, indices);
    if !has_normals {
        mesh.recalculate_normals();
    }
    Ok(mesh)
}

/// Where the mesh comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshSource {
    Cube,
    Sphere { segments: u32, rings: u32 },
    File(PathBuf),
}

impl Default for MeshSource {
    fn default() -> Self {
        Self::Sphere {
            segments: 48,
            rings: 24,
        }
    }
}

impl MeshSource {
    /// Builds or loads the geometry.
    ///
    /// Files are dispatched on extension, then recentered and normalized.
    /// STL files often carry zero or inconsistent facet normals, so theirs are
    /// recomputed from the triangles. OBJ normals are kept when present.
    pub fn load(&self) -> Result<MeshData, GeometryError> {
        match self {
            MeshSource::Cube => Ok(MeshData::cube()),
            MeshSource::Sphere { segments, rings } => Ok(MeshData::sphere(*segments, *rings)),
            MeshSource::File(path) => {
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|s| s.to_lowercase())
                    .unwrap_or_default();

                let mut mesh = match ext.as_str() {
                    "stl" => {
                        let mut mesh = load_stl(path)?;
                        mesh.recalculate_normals();
                        mesh
                    }
                    "obj" => load_obj(path)?,
                    _ => return Err(GeometryError::UnknownFormat(ext)),
                };
                mesh.recenter();
                mesh.normalize();
                Ok(mesh)
            }
        }
    }
}

impl FromStr for MeshSource {
    type Err = std::convert::Infallible;

    /// `cube`, `sphere`, or anything else as a file path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "cube" => MeshSource::Cube,
            "sphere" => MeshSource::default(),
            path => MeshSource::File(PathBuf::from(path)),
        })
    }
}

impl fmt::Display for MeshSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshSource::Cube => write!(f, "cube"),
            MeshSource::Sphere { segments, rings } => write!(f, "sphere {}x{}", segments, rings),
            MeshSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    /// Binary STL: zeroed 80-byte header, triangle count, then per triangle a
    /// normal, three vertices and a 2-byte attribute word.
    fn binary_stl(triangles: &[[[f32; 3]; 4]]) -> Vec<u8> {
        let mut bytes = vec![0u8; 80];
        bytes.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for tri in triangles {
            for v in tri {
                for c in v {
                    bytes.extend_from_slice(&c.to_le_bytes());
                }
            }
            bytes.extend_from_slice(&0u16.to_le_bytes());
        }
        bytes
    }

    fn two_triangles() -> Vec<u8> {
        binary_stl(&[
            [
                [0.0, 0.0, 1.0],
                [0.0, 0.0, 0.0],
                [2.0, 0.0, 0.0],
                [0.0, 2.0, 0.0],
            ],
            [
                [0.0, 0.0, 1.0],
                [2.0, 0.0, 0.0],
                [2.0, 2.0, 0.0],
                [0.0, 2.0, 0.0],
            ],
        ])
    }

    #[test]
    fn parses_binary_stl_with_flat_faces() {
        let mesh = parse_stl(&two_triangles()).unwrap();
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
        assert_eq!(mesh.size(), Vec3::new(2.0, 2.0, 0.0));
    }

    #[test]
    fn loads_and_normalizes_stl_file() {
        let path = std::env::temp_dir().join(format!("turntable-test-{}.stl", std::process::id()));
        std::fs::write(&path, two_triangles()).unwrap();

        let mesh = MeshSource::File(path.clone()).load();
        let _ = std::fs::remove_file(&path);
        let mesh = mesh.unwrap();

        assert!(mesh.center().abs_diff_eq(Vec3::ZERO, 1e-6));
        assert!(mesh.size().abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn truncated_stl_is_a_parse_error() {
        let mut bytes = two_triangles();
        bytes.truncate(100);
        assert!(matches!(parse_stl(&bytes), Err(GeometryError::Parse(_))));
    }

    const QUAD_OBJ: &str = "\
# unit quad, no normals
v 0 0 0
v 2 0 0
v 2 2 0
v 0 2 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3 4/4
";

    #[test]
    fn parses_obj_quad_into_triangles() {
        let mesh = parse_obj(QUAD_OBJ.as_bytes()).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.size(), Vec3::new(2.0, 2.0, 0.0));
        // Counter-clockwise in the XY plane faces +Z.
        for v in &mesh.vertices {
            assert!(Vec3::from(v.normal).abs_diff_eq(Vec3::Z, 1e-6));
        }
        let corner = mesh
            .vertices
            .iter()
            .find(|v| v.position == [2.0, 2.0, 0.0])
            .unwrap();
        assert_eq!(corner.uv, [1.0, 0.0]);
    }

    #[test]
    fn obj_normals_are_kept() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 -1\nf 1//1 2//1 3//1\n";
        let mesh = parse_obj(obj.as_bytes()).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, -1.0]));
    }

    #[test]
    fn obj_with_missing_material_library_still_loads() {
        let obj = format!("mtllib teapot.mtl\n{}", QUAD_OBJ);
        let mesh = parse_obj(obj.as_bytes()).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn loads_and_normalizes_obj_file() {
        let path = std::env::temp_dir().join(format!("turntable-test-{}.obj", std::process::id()));
        std::fs::write(&path, QUAD_OBJ).unwrap();

        let mesh = MeshSource::File(path.clone()).load();
        let _ = std::fs::remove_file(&path);
        let mesh = mesh.unwrap();

        assert!(mesh.center().abs_diff_eq(Vec3::ZERO, 1e-6));
        assert!(mesh.size().abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = MeshSource::File(PathBuf::from("teapot.ply")).load().unwrap_err();
        assert!(matches!(err, GeometryError::UnknownFormat(ext) if ext == "ply"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = MeshSource::File(PathBuf::from("/nonexistent/model.stl")).load().unwrap_err();
        assert!(matches!(err, GeometryError::Io(_)));
    }

    #[test]
    fn primitives_load_without_io() {
        assert_eq!(MeshSource::Cube.load().unwrap(), MeshData::cube());
        let sphere = MeshSource::Sphere { segments: 8, rings: 4 }.load().unwrap();
        assert_eq!(sphere.triangle_count(), 8 * 4 * 2);
    }

    #[test]
    fn parses_source_names() {
        assert_eq!("cube".parse::<MeshSource>().unwrap(), MeshSource::Cube);
        assert_eq!("sphere".parse::<MeshSource>().unwrap(), MeshSource::default());
        assert_eq!(
            "models/teapot.stl".parse::<MeshSource>().unwrap(),
            MeshSource::File(PathBuf::from("models/teapot.stl"))
        );
    }
}
