//! # Core Models Module
//!
//! Data structures describing the molecular system being partitioned and the results computed
//! from it.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom with its native index, names, residue identity, and position
//! - [`residue`] - Contiguous group of atoms sharing a chain, residue number, and name
//! - [`system`] - Complete molecular system with its atom table, residues, and periodic box
//! - [`builder`] - Incremental construction of a system from a file reader
//! - [`region`] - Region categories and the partitioning result
//! - [`basis`] - Basis-set tiers and BASIS-numbered records
//!
//! ## Usage
//!
//! ```ignore
//! use lichemprep::core::models::builder::MolecularSystemBuilder;
//! use nalgebra::Point3;
//!
//! let mut builder = MolecularSystemBuilder::new();
//! builder.start_residue('A', 1, "ALA");
//! builder.add_atom("CA", Point3::new(0.0, 0.0, 0.0));
//! let system = builder.build();
//! ```

pub mod atom;
pub mod basis;
pub mod builder;
pub mod region;
pub mod residue;
pub mod system;
