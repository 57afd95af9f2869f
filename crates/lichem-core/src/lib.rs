//! # LICHEM Prep Core Library
//!
//! Prepares the inputs of a hybrid QM/MM calculation driven by LICHEM: every atom of a large
//! molecular system is classified as QM, pseudobond, boundary, or frozen, and the result is
//! written as a LICHEM regions file plus a Gaussian `GEN` basis-set file.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three-layer split used throughout its design:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`MolecularSystem`, `AtomSet`), the
//!   typed selection language and its resolver, and the readers/writers for every file format
//!   the pipeline touches.
//!
//! - **[`engine`]: The Logic Core.** The immutable run configuration, the region partitioner,
//!   the basis mapper, and the error taxonomy that decides when a run must abort.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into one end-to-end
//!   preparation run that resolves, partitions, maps, and writes in that order.

pub mod core;
pub mod engine;
pub mod workflows;
