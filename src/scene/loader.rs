//! Wavefront OBJ loading
//!
//! Parses `v`, `vt` and `f` records into a [`Mesh`]. OBJ indices are
//! 1-based; the conversion to the mesh's 0-based indices happens here and
//! nowhere else. Bad indices are a parse error, not a later panic.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::rasterizer::{Face, Vec2, Vec3};
use super::Mesh;

/// Error type for mesh loading
#[derive(Debug)]
pub enum MeshError {
    Io(std::io::Error),
    Parse { line: usize, message: String },
}

impl From<std::io::Error> for MeshError {
    fn from(e: std::io::Error) -> Self {
        MeshError::Io(e)
    }
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::Io(e) => write!(f, "IO error: {}", e),
            MeshError::Parse { line, message } => write!(f, "Parse error (line {}): {}", line, message),
        }
    }
}

impl std::error::Error for MeshError {}

/// Load a mesh from an OBJ file
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, MeshError> {
    let file = fs::File::open(path)?;
    parse_obj(BufReader::new(file))
}

/// Load a mesh from OBJ text (for embedded models or testing)
pub fn load_obj_from_str(s: &str) -> Result<Mesh, MeshError> {
    parse_obj(s.as_bytes())
}

fn parse_obj<R: BufRead>(reader: R) -> Result<Mesh, MeshError> {
    let mut vertices: Vec<Vec3> = Vec::new();
    let mut texcoords: Vec<Vec2> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        let mut fields = line.split_whitespace();

        match fields.next() {
            Some("v") => {
                let (x, y, z) = (
                    parse_float(fields.next(), line_no)?,
                    parse_float(fields.next(), line_no)?,
                    parse_float(fields.next(), line_no)?,
                );
                vertices.push(Vec3::new(x, y, z));
            }
            Some("vt") => {
                let (u, v) = (
                    parse_float(fields.next(), line_no)?,
                    parse_float(fields.next(), line_no)?,
                );
                texcoords.push(Vec2::new(u, v));
            }
            Some("f") => {
                let mut refs = [(0usize, None); 3];
                for slot in &mut refs {
                    *slot = parse_face_ref(fields.next(), line_no, vertices.len(), texcoords.len())?;
                }

                let uv = |t: Option<usize>| t.map(|i| texcoords[i]).unwrap_or_default();
                faces.push(
                    Face::new(refs[0].0, refs[1].0, refs[2].0)
                        .with_uvs(uv(refs[0].1), uv(refs[1].1), uv(refs[2].1)),
                );
            }
            // Normals, groups, materials and comments are ignored
            _ => {}
        }
    }

    Ok(Mesh::new(vertices, faces))
}

fn parse_float(field: Option<&str>, line: usize) -> Result<f32, MeshError> {
    let field = field.ok_or_else(|| MeshError::Parse {
        line,
        message: "missing coordinate".to_string(),
    })?;
    field.parse().map_err(|_| MeshError::Parse {
        line,
        message: format!("bad float '{}'", field),
    })
}

/// Parse one `v`, `v/vt` or `v/vt/vn` reference, returning 0-based
/// vertex and texcoord indices validated against the current counts.
fn parse_face_ref(
    field: Option<&str>,
    line: usize,
    vertex_count: usize,
    texcoord_count: usize,
) -> Result<(usize, Option<usize>), MeshError> {
    let field = field.ok_or_else(|| MeshError::Parse {
        line,
        message: "face needs three vertex references".to_string(),
    })?;

    let mut parts = field.split('/');

    let vertex = to_index(parts.next().unwrap_or(""), vertex_count, line)?;
    let texcoord = match parts.next() {
        Some("") | None => None,
        Some(t) => Some(to_index(t, texcoord_count, line)?),
    };

    Ok((vertex, texcoord))
}

fn to_index(field: &str, count: usize, line: usize) -> Result<usize, MeshError> {
    let one_based: usize = field.parse().map_err(|_| MeshError::Parse {
        line,
        message: format!("bad index '{}'", field),
    })?;
    if one_based == 0 || one_based > count {
        return Err(MeshError::Parse {
            line,
            message: format!("index {} out of range 1..={}", one_based, count),
        });
    }
    Ok(one_based - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_OBJ: &str = "\
# comment
v 0.0 0.0 5.0
v 0.0 1.0 5.0
v 1.0 0.0 5.0
vt 0.0 0.0
vt 0.0 1.0
vt 1.0 0.0
f 1/1 2/2 3/3
";

    #[test]
    fn test_parse_triangle() {
        let mesh = load_obj_from_str(TRIANGLE_OBJ).unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.faces.len(), 1);

        // 1-based OBJ references arrive 0-based
        let face = &mesh.faces[0];
        assert_eq!((face.a, face.b, face.c), (0, 1, 2));
        assert_eq!(face.b_uv, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_parse_face_without_texcoords() {
        let mesh = load_obj_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(mesh.faces[0].a_uv, Vec2::default());
    }

    #[test]
    fn test_parse_slash_separated_with_normals() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1/1 2/2/1 3/3/1\n";
        let mesh = load_obj_from_str(src).unwrap();
        assert_eq!(mesh.faces[0].c_uv, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_out_of_range_index_is_error() {
        let err = load_obj_from_str("v 0 0 0\nf 1 2 3\n").unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_zero_index_is_error() {
        let err = load_obj_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n").unwrap_err();
        assert!(matches!(err, MeshError::Parse { .. }));
    }

    #[test]
    fn test_bad_float_is_error() {
        let err = load_obj_from_str("v 0.0 oops 0.0\n").unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 1, .. }));
    }
}
