use super::atom::Atom;
use super::residue::Residue;
use super::system::MolecularSystem;
use nalgebra::Point3;

pub struct MolecularSystemBuilder {
    system: MolecularSystem,

    // --- Builder-specific state for efficient construction ---
    current_residue_idx: Option<usize>,
}

impl Default for MolecularSystemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MolecularSystemBuilder {
    pub fn new() -> Self {
        Self {
            system: MolecularSystem::new(),
            current_residue_idx: None,
        }
    }

    /// Opens a new residue; every atom added afterwards belongs to it.
    ///
    /// Residues are never merged, even if the same chain/number/name reappears later in the
    /// file: a residue is a contiguous run of atoms.
    pub fn start_residue(&mut self, chain_id: char, id: isize, name: &str) -> &mut Self {
        let index = self.system.residues.len();
        self.system.residues.push(Residue::new(id, name, chain_id));
        self.current_residue_idx = Some(index);
        self
    }

    pub fn add_atom(&mut self, name: &str, position: Point3<f64>) -> &mut Self {
        let res_idx = self
            .current_residue_idx
            .expect("Cannot add atom without a current residue");
        let atom_idx = self.system.atoms.len();
        let residue = &mut self.system.residues[res_idx];

        let atom = Atom {
            index: atom_idx,
            name: name.to_string(),
            res_name: residue.name.clone(),
            res_id: residue.id,
            chain_id: residue.chain_id,
            residue_index: res_idx,
            position,
        };

        residue.add_atom(atom_idx);
        self.system.atoms.push(atom);
        self
    }

    pub fn box_dimensions(&mut self, dimensions: [f64; 3]) -> &mut Self {
        self.system.box_dimensions = Some(dimensions);
        self
    }

    pub fn build(self) -> MolecularSystem {
        self.system
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_assigns_dense_native_indices() {
        let mut builder = MolecularSystemBuilder::new();
        builder.start_residue('A', 10, "WAT");
        builder.add_atom("O", Point3::origin());
        builder.add_atom("H1", Point3::origin());
        builder.start_residue('A', 11, "WAT");
        builder.add_atom("O", Point3::origin());
        let system = builder.build();

        let indices: Vec<usize> = system.atoms().iter().map(|a| a.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(system.residues()[0].atoms(), &[0, 1]);
        assert_eq!(system.residues()[1].atoms(), &[2]);
        assert_eq!(system.atom(2).unwrap().res_id, 11);
        assert_eq!(system.atom(2).unwrap().residue_index, 1);
    }

    #[test]
    fn builder_records_box_dimensions() {
        let mut builder = MolecularSystemBuilder::new();
        builder.box_dimensions([10.0, 20.0, 30.0]);
        assert_eq!(builder.build().box_dimensions(), Some([10.0, 20.0, 30.0]));
    }

    #[test]
    #[should_panic(expected = "Cannot add atom without a current residue")]
    fn adding_atom_before_residue_panics() {
        let mut builder = MolecularSystemBuilder::new();
        builder.add_atom("CA", Point3::origin());
    }
}
