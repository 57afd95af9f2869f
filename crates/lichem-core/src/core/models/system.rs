use super::atom::Atom;
use super::residue::Residue;
use nalgebra::Point3;

/// Represents a complete molecular system: its atom table, residues, and periodic box.
///
/// Atoms are stored densely in native order, so an atom's `index` is also its position in
/// [`MolecularSystem::atoms`]. This is the universe every region set is drawn from.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    /// Atom table in native order.
    pub(crate) atoms: Vec<Atom>,
    /// Residues in order of first appearance.
    pub(crate) residues: Vec<Residue>,
    /// Orthorhombic box edge lengths (a, b, c) in Angstroms, when the source provides one.
    pub(crate) box_dimensions: Option<[f64; 3]>,
}

impl MolecularSystem {
    /// Creates a new, empty molecular system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all atoms in native order.
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Retrieves an atom by its native index.
    ///
    /// # Return
    ///
    /// Returns `Some(&Atom)` if the index is in range, otherwise `None`.
    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    /// Number of atoms in the system.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Returns all residues in order of first appearance.
    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    /// Retrieves the residue that contains the given atom.
    pub fn residue_of(&self, atom_index: usize) -> Option<&Residue> {
        let atom = self.atoms.get(atom_index)?;
        self.residues.get(atom.residue_index)
    }

    /// Returns the periodic box edge lengths, if the structure source provided them.
    pub fn box_dimensions(&self) -> Option<[f64; 3]> {
        self.box_dimensions
    }

    pub fn set_box_dimensions(&mut self, dimensions: Option<[f64; 3]>) {
        self.box_dimensions = dimensions;
    }

    /// Replaces every atom position with the given coordinates, in native order.
    ///
    /// This is how a coordinate-only source (e.g. a TINKER XYZ frame) is mapped onto the
    /// topology read from another file.
    ///
    /// # Return
    ///
    /// Returns `None` (and leaves the system untouched) if the number of positions does not
    /// match the number of atoms.
    pub fn overlay_positions(&mut self, positions: &[Point3<f64>]) -> Option<()> {
        if positions.len() != self.atoms.len() {
            return None;
        }
        for (atom, position) in self.atoms.iter_mut().zip(positions) {
            atom.position = *position;
        }
        Some(())
    }
}
