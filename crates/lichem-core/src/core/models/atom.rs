use nalgebra::Point3;

/// Represents one atom of the structure being partitioned.
///
/// Atoms are read once from the structure source and never mutated afterwards. The
/// `index` is the native, 0-based position of the atom in the system's atom table; the
/// 1-based identifier used by TINKER and most display tools is always `index + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Native 0-based index of the atom in the system.
    pub index: usize,
    /// The name of the atom (e.g., "CA", "O3'").
    pub name: String,
    /// The name of the parent residue (e.g., "ASP", "WAT").
    pub res_name: String,
    /// The residue sequence number from the source file.
    pub res_id: isize,
    /// The chain identifier of the parent residue.
    pub chain_id: char,
    /// Position of the parent residue in the system's residue list.
    pub residue_index: usize,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Returns the 1-based identifier of the atom (the TINKER XYZ numbering).
    pub fn one_based_id(&self) -> usize {
        self.index + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_based_id_is_index_plus_one() {
        let atom = Atom {
            index: 41,
            name: "CA".to_string(),
            res_name: "ALA".to_string(),
            res_id: 7,
            chain_id: 'A',
            residue_index: 3,
            position: Point3::origin(),
        };
        assert_eq!(atom.one_based_id(), 42);
    }

    #[test]
    fn atom_equality_and_clone_works() {
        let atom = Atom {
            index: 0,
            name: "N".to_string(),
            res_name: "GLY".to_string(),
            res_id: 1,
            chain_id: 'A',
            residue_index: 0,
            position: Point3::new(1.0, 2.0, 3.0),
        };
        assert_eq!(atom.clone(), atom);
    }
}
