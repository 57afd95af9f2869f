#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub id: isize,                // Residue sequence number from source file
    pub name: String,             // Name of the residue (e.g., "ASP", "WAT")
    pub chain_id: char,           // Chain identifier of the residue
    pub(crate) atoms: Vec<usize>, // Native indices of atoms belonging to this residue
}

impl Residue {
    pub(crate) fn new(id: isize, name: &str, chain_id: char) -> Self {
        Self {
            id,
            name: name.to_string(),
            chain_id,
            atoms: Vec::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_index: usize) {
        self.atoms.push(atom_index);
    }

    pub fn atoms(&self) -> &[usize] {
        &self.atoms
    }
}
