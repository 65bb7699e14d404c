//! OBJ format support
//!
//! Only vertex positions and triangular faces are read. Face corners may use
//! the `v/vt/vn` forms; anything after the first slash is ignored.

use crate::error::IoError;
use crate::{MeshReader, MeshWriter};
use meshslim_core::{Point3d, Result, TriangleMesh};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub struct ObjReader;
pub struct ObjWriter;

impl ObjReader {
    /// Parse a mesh from OBJ text.
    pub fn read_from<R: BufRead>(reader: R) -> Result<TriangleMesh> {
        let mut mesh = TriangleMesh::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = i + 1;
            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some("v") => {
                    let mut coords = [0.0f64; 3];
                    for c in coords.iter_mut() {
                        let token = tokens
                            .next()
                            .ok_or_else(|| IoError::parse(line_no, "vertex needs three coordinates"))?;
                        *c = token.parse().map_err(|_| {
                            IoError::parse(line_no, format!("invalid coordinate '{}'", token))
                        })?;
                    }
                    mesh.add_vertex(Point3d::new(coords[0], coords[1], coords[2]));
                }
                Some("f") => {
                    let corners: Vec<&str> = tokens.collect();
                    if corners.len() != 3 {
                        return Err(IoError::parse(
                            line_no,
                            format!("only triangular faces are supported, got {} corners", corners.len()),
                        )
                        .into());
                    }
                    let mut face = [0usize; 3];
                    for (slot, corner) in face.iter_mut().zip(&corners) {
                        *slot = parse_corner(corner, mesh.vertex_count(), line_no)?;
                    }
                    mesh.add_face(face);
                }
                _ => {}
            }
        }

        log::debug!(
            "Parsed OBJ: {} vertices, {} faces",
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }
}

/// Resolve a 1-based face corner against the vertices defined so far.
fn parse_corner(corner: &str, defined: usize, line_no: usize) -> std::result::Result<usize, IoError> {
    let index = corner.split('/').next().unwrap_or(corner);
    let n: usize = index
        .parse()
        .map_err(|_| IoError::parse(line_no, format!("invalid vertex reference '{}'", corner)))?;
    if n == 0 || n > defined {
        return Err(IoError::parse(
            line_no,
            format!("vertex reference {} out of range 1..={}", n, defined),
        ));
    }
    Ok(n - 1)
}

impl ObjWriter {
    /// Write `mesh` as OBJ text with 1-based face references.
    pub fn write_to<W: Write>(mesh: &TriangleMesh, mut writer: W) -> Result<()> {
        writeln!(
            writer,
            "# {} vertices, {} faces",
            mesh.vertex_count(),
            mesh.face_count()
        )?;
        for v in &mesh.vertices {
            writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
        }
        for f in &mesh.faces {
            if f.iter().any(|&i| i >= mesh.vertex_count()) {
                return Err(IoError::WriteError {
                    message: format!("face {:?} references a missing vertex", f),
                }
                .into());
            }
            writeln!(writer, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl MeshReader for ObjReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
        let path = path.as_ref();
        log::info!("Load obj from {} ...", path.display());
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => IoError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => IoError::Io(e),
        })?;
        Self::read_from(BufReader::new(file))
    }
}

impl MeshWriter for ObjWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
        let path = path.as_ref();
        log::info!("Store obj to {} ...", path.display());
        let file = File::create(path)?;
        Self::write_to(mesh, BufWriter::new(file))
    }
}
