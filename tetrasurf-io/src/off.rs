//! OFF (Object File Format) mesh support
//!
//! The reader accepts the common ASCII variant:
//! - an `OFF` magic line, optionally followed by the counts on the same line
//! - `#` comments and blank lines anywhere
//! - `V F E` counts, then `V` vertex lines, then `F` face lines `k i0 .. ik-1`
//!
//! Polygons with more than three corners are fan triangulated. Trailing values on
//! vertex and face lines (colours) are ignored.

use crate::error::IoError;
use crate::{MeshReader, MeshWriter};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tetrasurf_core::{Point3f, Result, TriangleMesh};
use tracing::debug;

/// Upper bound on the up-front reservation taken from header counts
const MAX_PREALLOCATION: usize = 1 << 20;

/// Format `value` with `digits` significant digits, choosing fixed or scientific
/// notation the way C's `%g` does.
pub fn format_significant(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let scientific = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Options for OFF output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffWriteOptions {
    /// Significant digits per coordinate
    pub precision: usize,
    /// Lines written as `# comment` after the magic line
    pub comments: Vec<String>,
}

impl Default for OffWriteOptions {
    fn default() -> Self {
        Self {
            precision: 6,
            comments: Vec::new(),
        }
    }
}

impl OffWriteOptions {
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_comment<S: Into<String>>(mut self, comment: S) -> Self {
        self.comments.push(comment.into());
        self
    }
}

pub struct OffReader;
pub struct OffWriter;

/// Significant lines with comments stripped, numbered from 1
struct Lines<R> {
    inner: std::io::Lines<R>,
    line: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Self {
            inner: reader.lines(),
            line: 0,
        }
    }

    fn next_tokens(&mut self, expected: &str) -> std::result::Result<Vec<String>, IoError> {
        for line in self.inner.by_ref() {
            let line = line?;
            self.line += 1;
            let content = line.split('#').next().unwrap_or("");
            let tokens: Vec<String> = content.split_whitespace().map(str::to_string).collect();
            if !tokens.is_empty() {
                return Ok(tokens);
            }
        }
        Err(IoError::UnexpectedEof {
            expected: expected.to_string(),
        })
    }

    fn parse<T: std::str::FromStr>(&self, token: &str, what: &str) -> std::result::Result<T, IoError> {
        token.parse().map_err(|_| IoError::ParseError {
            line: self.line,
            message: format!("invalid {} '{}'", what, token),
        })
    }

    fn error(&self, message: String) -> IoError {
        IoError::ParseError {
            line: self.line,
            message,
        }
    }
}

impl OffReader {
    /// Read an OFF mesh from any buffered source
    pub fn read_from<R: BufRead>(reader: R) -> std::result::Result<TriangleMesh, IoError> {
        let mut lines = Lines::new(reader);

        let header = lines.next_tokens("OFF header")?;
        let magic = header[0].as_str();
        if magic != "OFF" {
            return Err(IoError::InvalidFormat {
                format: format!("expected OFF magic, found '{}'", magic),
            });
        }
        let counts = if header.len() > 1 {
            header[1..].to_vec()
        } else {
            lines.next_tokens("vertex and face counts")?
        };
        if counts.len() < 2 {
            return Err(lines.error("expected vertex and face counts".to_string()));
        }
        let vertex_count: usize = lines.parse(&counts[0], "vertex count")?;
        let face_count: usize = lines.parse(&counts[1], "face count")?;

        let mut mesh = TriangleMesh::new();
        mesh.vertices.reserve(vertex_count.min(MAX_PREALLOCATION));
        for _ in 0..vertex_count {
            let tokens = lines.next_tokens("vertex")?;
            if tokens.len() < 3 {
                return Err(lines.error(format!("vertex needs 3 coordinates, found {}", tokens.len())));
            }
            let x = lines.parse(&tokens[0], "coordinate")?;
            let y = lines.parse(&tokens[1], "coordinate")?;
            let z = lines.parse(&tokens[2], "coordinate")?;
            mesh.add_vertex(Point3f::new(x, y, z));
        }

        mesh.faces.reserve(face_count.min(MAX_PREALLOCATION));
        for face in 0..face_count {
            let tokens = lines.next_tokens("face")?;
            let corners: usize = lines.parse(&tokens[0], "corner count")?;
            if corners < 3 {
                return Err(lines.error(format!("face with {} corners", corners)));
            }
            if tokens.len() < corners + 1 {
                return Err(lines.error(format!(
                    "face lists {} of {} corners",
                    tokens.len() - 1,
                    corners
                )));
            }

            let indices = tokens[1..=corners]
                .iter()
                .map(|token| {
                    let index: usize = lines.parse(token, "vertex index")?;
                    if index >= vertex_count {
                        return Err(IoError::IndexOutOfRange {
                            face,
                            index,
                            vertex_count,
                        });
                    }
                    Ok(index)
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;

            for pair in indices[1..].windows(2) {
                mesh.add_face([indices[0], pair[0], pair[1]]);
            }
        }

        Ok(mesh)
    }
}

impl MeshReader for OffReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mesh = Self::read_from(BufReader::new(file))?;
        debug!(
            path = %path.display(),
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "Read OFF mesh"
        );
        Ok(mesh)
    }
}

impl OffWriter {
    /// Write `mesh` to any sink
    pub fn write_to<W: Write>(
        mesh: &TriangleMesh,
        writer: &mut W,
        options: &OffWriteOptions,
    ) -> std::result::Result<(), IoError> {
        writeln!(writer, "OFF")?;
        for comment in &options.comments {
            writeln!(writer, "# {}", comment)?;
        }
        writeln!(writer, "{} {} 0", mesh.vertex_count(), mesh.face_count())?;

        let fmt = |c: f32| format_significant(f64::from(c), options.precision);
        for v in &mesh.vertices {
            writeln!(writer, "{} {} {}", fmt(v.x), fmt(v.y), fmt(v.z))?;
        }
        for face in &mesh.faces {
            writeln!(writer, "3 {} {} {}", face[0], face[1], face[2])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write `mesh` to `path` with explicit options
    pub fn write_mesh_with_options<P: AsRef<Path>>(
        mesh: &TriangleMesh,
        path: P,
        options: &OffWriteOptions,
    ) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        Self::write_to(mesh, &mut writer, options)?;
        debug!(
            path = %path.display(),
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "Wrote OFF mesh"
        );
        Ok(())
    }
}

impl MeshWriter for OffWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
        Self::write_mesh_with_options(mesh, path, &OffWriteOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn read_str(content: &str) -> std::result::Result<TriangleMesh, IoError> {
        OffReader::read_from(content.as_bytes())
    }

    #[test]
    fn test_format_significant() {
        assert_eq!(format_significant(0.0, 6), "0");
        assert_eq!(format_significant(0.5, 6), "0.5");
        assert_eq!(format_significant(-2.0, 3), "-2");
        assert_eq!(format_significant(0.123456789, 6), "0.123457");
        assert_eq!(format_significant(1234567.0, 6), "1.23457e+06");
        assert_eq!(format_significant(0.00001, 6), "1e-05");
        assert_eq!(format_significant(100.0, 2), "1e+02");
        assert_eq!(format_significant(9.9999996, 6), "10");
        assert_eq!(format_significant(0.70710678, 3), "0.707");
    }

    #[test]
    fn test_write_layout() {
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 0.25, -1.5),
            ],
            vec![[0, 1, 2]],
        );
        let options = OffWriteOptions::default().with_comment("triangle");
        let mut out = Vec::new();
        OffWriter::write_to(&mesh, &mut out, &options).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "OFF\n# triangle\n3 1 0\n0 0 0\n1 0 0\n0 0.25 -1.5\n3 0 1 2\n"
        );
    }

    #[test]
    fn test_read_with_comments_and_polygons() {
        let mesh = read_str(
            "# a unit square split into a fan\nOFF\n\n4 1 0  # counts\n0 0 0\n1 0 0\n1 1 0\n0 1 0 255 0 0\n4 0 1 2 3\n",
        )
        .unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);
        assert_relative_eq!(mesh.area(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_counts_on_magic_line() {
        let mesh = read_str("OFF 3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 2 1 0\n").unwrap();
        assert_eq!(mesh.faces, vec![[2, 1, 0]]);
    }

    #[test]
    fn test_read_errors() {
        assert!(matches!(
            read_str("PLY\n3 1 0\n"),
            Err(IoError::InvalidFormat { .. })
        ));
        assert!(matches!(
            read_str("OFF\n3 1 0\n0 0 0\n1 0 0\n"),
            Err(IoError::UnexpectedEof { .. })
        ));
        assert!(matches!(
            read_str("OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 7\n"),
            Err(IoError::IndexOutOfRange { index: 7, .. })
        ));
        assert!(matches!(
            read_str("OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n2 0 1\n"),
            Err(IoError::ParseError { line: 6, .. })
        ));
        assert!(matches!(
            read_str("OFF\n1 0 0\n0 zero 0\n"),
            Err(IoError::ParseError { line: 3, .. })
        ));
    }

    #[test]
    fn test_huge_counts_without_body() {
        assert!(matches!(
            read_str("OFF\n18446744073709551615 0 0\n"),
            Err(IoError::UnexpectedEof { .. })
        ));
        assert!(matches!(
            read_str("OFF 0 18446744073709551615 0\n"),
            Err(IoError::UnexpectedEof { .. })
        ));
    }
}
