use nalgebra::Point3;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Coordinates and periodic box read from a TINKER XYZ file.
///
/// TINKER XYZ carries no residue information, so a frame is only ever used as a coordinate
/// overlay on a topology read from elsewhere (see
/// [`MolecularSystem::overlay_positions`](crate::core::models::system::MolecularSystem::overlay_positions)).
#[derive(Debug, Clone, PartialEq)]
pub struct TinkerFrame {
    pub title: String,
    pub positions: Vec<Point3<f64>>,
    /// Box edge lengths from the optional second header line.
    pub box_dimensions: Option<[f64; 3]>,
}

#[derive(Debug, Error)]
pub enum TinkerXyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Atom count mismatch: header declares {declared}, found {found}")]
    AtomCountMismatch { declared: usize, found: usize },
}

pub struct TinkerXyzFile;

impl TinkerXyzFile {
    pub fn read_from(reader: &mut impl BufRead) -> Result<TinkerFrame, TinkerXyzError> {
        let mut lines = reader.lines().enumerate();

        let (declared, title) = match lines.next() {
            Some((_, header)) => {
                let header = header?;
                let trimmed = header.trim();
                let (count, title) = trimmed
                    .split_once(char::is_whitespace)
                    .unwrap_or((trimmed, ""));
                let declared: usize = count.parse().map_err(|_| TinkerXyzError::Parse {
                    line: 1,
                    message: format!("invalid atom count '{count}'"),
                })?;
                (declared, title.trim().to_string())
            }
            None => {
                return Err(TinkerXyzError::Parse {
                    line: 1,
                    message: "empty file".into(),
                });
            }
        };

        let mut positions = Vec::with_capacity(declared);
        let mut box_dimensions = None;

        for (line_idx, line_res) in lines {
            let line = line_res?;
            let line_num = line_idx + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }

            // The box line is only legal directly after the header and starts with a float.
            if line_num == 2 && fields[0].parse::<usize>().is_err() {
                let dims = parse_floats(&fields, 0, 3, line_num)?;
                box_dimensions = Some([dims[0], dims[1], dims[2]]);
                continue;
            }

            if positions.len() == declared {
                break;
            }
            if fields.len() < 5 {
                return Err(TinkerXyzError::Parse {
                    line: line_num,
                    message: format!("expected at least 5 fields, found {}", fields.len()),
                });
            }
            let xyz = parse_floats(&fields, 2, 3, line_num)?;
            positions.push(Point3::new(xyz[0], xyz[1], xyz[2]));
        }

        if positions.len() != declared {
            return Err(TinkerXyzError::AtomCountMismatch {
                declared,
                found: positions.len(),
            });
        }

        Ok(TinkerFrame {
            title,
            positions,
            box_dimensions,
        })
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<TinkerFrame, TinkerXyzError> {
        let file = File::open(path)?;
        Self::read_from(&mut BufReader::new(file))
    }
}

fn parse_floats(
    fields: &[&str],
    offset: usize,
    count: usize,
    line: usize,
) -> Result<Vec<f64>, TinkerXyzError> {
    if fields.len() < offset + count {
        return Err(TinkerXyzError::Parse {
            line,
            message: format!("expected {count} numeric fields from column {}", offset + 1),
        });
    }
    fields[offset..offset + count]
        .iter()
        .map(|field| {
            field.parse::<f64>().map_err(|_| TinkerXyzError::Parse {
                line,
                message: format!("invalid number '{field}'"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(content: &str) -> Result<TinkerFrame, TinkerXyzError> {
        TinkerXyzFile::read_from(&mut Cursor::new(content))
    }

    #[test]
    fn reads_frame_with_box_line() {
        let frame = read(
            "3  solvated enzyme\n\
             80.000000 90.000000 100.000000 90.000000 90.000000 90.000000\n\
             1  N   1.000  2.000  3.000   230   2\n\
             2  CA  2.000  2.000  3.000   231   1  3\n\
             3  C   3.000  2.000  3.500   232   2\n",
        )
        .unwrap();
        assert_eq!(frame.title, "solvated enzyme");
        assert_eq!(frame.box_dimensions, Some([80.0, 90.0, 100.0]));
        assert_eq!(frame.positions.len(), 3);
        assert_eq!(frame.positions[2], Point3::new(3.0, 2.0, 3.5));
    }

    #[test]
    fn reads_frame_without_box_line() {
        let frame = read("2\n1 O 0.0 0.0 0.0 1 2\n2 H 0.9 0.0 0.0 2 1\n").unwrap();
        assert_eq!(frame.title, "");
        assert!(frame.box_dimensions.is_none());
        assert_eq!(frame.positions[1].x, 0.9);
    }

    #[test]
    fn truncated_file_reports_count_mismatch() {
        let err = read("3 water\n1 O 0.0 0.0 0.0 1\n").unwrap_err();
        assert!(matches!(
            err,
            TinkerXyzError::AtomCountMismatch {
                declared: 3,
                found: 1
            }
        ));
    }

    #[test]
    fn bad_coordinate_is_a_parse_error() {
        let err = read("1\n1 O 0.0 zero 0.0 1\n").unwrap_err();
        assert!(matches!(err, TinkerXyzError::Parse { line: 2, .. }));
    }
}
