#![allow(dead_code)]

use lichemprep::core::io::pdb::PdbFile;
use lichemprep::core::io::traits::StructureFile;
use lichemprep::core::models::system::MolecularSystem;
use lichemprep::engine::config::OutputConfig;
use std::io::Cursor;
use std::path::Path;

/// One ATOM record in fixed PDB columns.
pub fn atom_line(serial: usize, name: &str, res_name: &str, res_id: isize, xyz: [f64; 3]) -> String {
    format!(
        "{:<6}{:>5} {:<4} {:>3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00  0.00",
        "ATOM", serial, name, res_name, 'A', res_id, xyz[0], xyz[1], xyz[2]
    )
}

/// Builds a PDB text from `(name, res_name, res_id, position)` rows.
pub fn pdb_text(atoms: &[(&str, &str, isize, [f64; 3])], box_dims: Option<[f64; 3]>) -> String {
    let mut lines = Vec::new();
    if let Some([a, b, c]) = box_dims {
        lines.push(format!(
            "CRYST1{a:>9.3}{b:>9.3}{c:>9.3}  90.00  90.00  90.00 P 1           1"
        ));
    }
    for (i, (name, res_name, res_id, xyz)) in atoms.iter().enumerate() {
        lines.push(atom_line(i + 1, name, res_name, *res_id, *xyz));
    }
    lines.push("END".to_string());
    lines.join("\n") + "\n"
}

pub fn read_pdb(text: &str) -> MolecularSystem {
    PdbFile::read_from(&mut Cursor::new(text)).unwrap().0
}

pub fn outputs_in(dir: &Path) -> OutputConfig {
    OutputConfig {
        regions_path: dir.join("regions.inp"),
        basis_path: dir.join("BASIS"),
        listing_path: Some(dir.join("BASIS_verification.txt")),
    }
}

/// Lines of the section that follows `key` in a regions file, up to the next section.
pub fn section<'a>(regions: &'a str, key: &str) -> (usize, Vec<&'a str>) {
    let mut lines = regions.lines();
    let header = lines
        .find(|line| line.starts_with(key))
        .unwrap_or_else(|| panic!("section {key} not found"));
    let count = header.split(':').nth(1).unwrap().trim().parse().unwrap();
    let body = lines.take_while(|line| !line.contains(':')).collect();
    (count, body)
}
