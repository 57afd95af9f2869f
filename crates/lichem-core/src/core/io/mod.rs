//! Provides input/output functionality for the file formats the pipeline touches.
//!
//! Structure sources ([`pdb`], [`tinker_xyz`]) are read through the [`traits::StructureFile`]
//! interface. The outputs consumed by LICHEM and Gaussian ([`regions`], [`basis`]) and the
//! operator-facing audit table ([`listing`]) are fixed-format text; the shared line-wrapping
//! rule lives in [`layout`] and crash-safe file replacement in [`atomic`].

pub mod atomic;
pub mod basis;
pub mod layout;
pub mod listing;
pub mod pdb;
pub mod regions;
pub mod tinker_xyz;
pub mod traits;
