//! Atom selection: ordered atom sets, explicit index conventions, the typed selection
//! language, and the resolver that evaluates selections against a [`MolecularSystem`].
//!
//! Selections are plain data (deserializable from a run file) and are evaluated by a
//! [`resolver::SelectionResolver`]. Every result is an [`atom_set::AtomSet`] in ascending
//! native order; callers that combine several results keep their own union order.
//!
//! [`MolecularSystem`]: crate::core::models::system::MolecularSystem

pub mod atom_set;
pub mod error;
pub mod index;
pub mod query;
pub mod resolver;
