//! # Core Module
//!
//! The fundamental building blocks of QM/MM input preparation.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues, and the complete system with
//!   its periodic box
//! - **Atom Selection** ([`selection`]) - Ordered atom sets, the typed selection language, and
//!   the resolver that evaluates it against a system
//! - **File I/O** ([`io`]) - PDB and TINKER XYZ readers plus the fixed-format writers for the
//!   regions file, the BASIS file, and the verification listing

pub mod io;
pub mod models;
pub mod selection;
