use crate::core::io::traits::StructureFile;
use crate::core::models::builder::MolecularSystemBuilder;
use crate::core::models::system::MolecularSystem;
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    /// Cell angles (alpha, beta, gamma) from the CRYST1 record, when present.
    pub cell_angles: Option<[f64; 3]>,
    /// Number of MODEL records seen; only the first model is read.
    pub models_seen: usize,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// Residue numbers past 9999, as written by the common MD tools.
///
/// A digit in column 27 means the writer spilled a five-digit number into the insertion-code
/// column, and columns 23-27 are read as one number. Writers that instead wrap the four-column
/// field back to 0 after 9999 are detected by the drop from 9999, and every later number is
/// shifted up by 10000 per wrap. Hybrid-36 numbering is not decoded.
#[derive(Debug, Default)]
struct ResidueNumbering {
    offset: isize,
    last_raw: Option<isize>,
}

impl ResidueNumbering {
    const WRAP_AT: isize = 9999;

    fn read(&mut self, line: &str, line_num: usize) -> Result<(isize, char), PdbError> {
        let column_27 = line.get(26..27).and_then(|s| s.chars().next()).unwrap_or(' ');

        if column_27.is_ascii_digit() {
            let wide = slice_and_trim(line, 22, 27);
            let res_id = parse_int(wide, line_num, "23-27")?;
            self.last_raw = None;
            return Ok((res_id, ' '));
        }

        let raw = parse_int(slice_and_trim(line, 22, 26), line_num, "23-26")?;
        if self.last_raw == Some(Self::WRAP_AT) && raw < Self::WRAP_AT {
            self.offset += Self::WRAP_AT + 1;
        }
        self.last_raw = Some(raw);
        Ok((raw + self.offset, column_27))
    }
}

fn parse_int(value: &str, line_num: usize, columns: &str) -> Result<isize, PdbError> {
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: columns.into(),
            value: value.into(),
        },
    })
}

pub struct PdbFile;

impl StructureFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        let mut builder = MolecularSystemBuilder::new();
        let mut metadata = PdbMetadata::default();
        let mut atom_count = 0usize;

        let mut current_residue: Option<(char, isize, char, String)> = None;
        let mut residue_numbering = ResidueNumbering::default();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match slice_and_trim(&line, 0, 6) {
                "ATOM" | "HETATM" => {
                    if line.len() < 54 {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let name_str = slice_and_trim(&line, 12, 16);
                    let res_name_str = slice_and_trim(&line, 17, 21);
                    let chain_id: char = line.get(21..22).and_then(|s| s.chars().next()).unwrap_or(' ');
                    if name_str.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }
                    let (res_id, insertion_code) =
                        residue_numbering.read(&line, line_num)?;
                    let x = parse_float(&line, line_num, 30, 38)?;
                    let y = parse_float(&line, line_num, 38, 46)?;
                    let z = parse_float(&line, line_num, 46, 54)?;

                    let residue_key = (chain_id, res_id, insertion_code, res_name_str.to_string());
                    if current_residue.as_ref() != Some(&residue_key) {
                        builder.start_residue(chain_id, res_id, res_name_str);
                        current_residue = Some(residue_key);
                    }
                    builder.add_atom(name_str, Point3::new(x, y, z));
                    atom_count += 1;
                }
                "CRYST1" => {
                    let a = parse_float(&line, line_num, 6, 15)?;
                    let b = parse_float(&line, line_num, 15, 24)?;
                    let c = parse_float(&line, line_num, 24, 33)?;
                    if a > 0.0 && b > 0.0 && c > 0.0 {
                        builder.box_dimensions([a, b, c]);
                    }
                    let alpha = parse_float(&line, line_num, 33, 40).ok();
                    let beta = parse_float(&line, line_num, 40, 47).ok();
                    let gamma = parse_float(&line, line_num, 47, 54).ok();
                    if let (Some(alpha), Some(beta), Some(gamma)) = (alpha, beta, gamma) {
                        metadata.cell_angles = Some([alpha, beta, gamma]);
                    }
                }
                "MODEL" => {
                    metadata.models_seen += 1;
                    if metadata.models_seen > 1 {
                        break;
                    }
                }
                "TER" => current_residue = None,
                "ENDMDL" | "END" => break,
                _ => {}
            }
        }

        if atom_count == 0 {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        Ok((builder.build(), metadata))
    }
}
