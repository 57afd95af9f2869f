//! # Workflows Module
//!
//! High-level entry points that run the whole preparation pipeline.
//!
//! - **Preparation Workflow** ([`prepare`]) - Resolves every selection, partitions the system,
//!   assigns BASIS ids, and writes the regions file, the BASIS file, and the verification
//!   listing. A dry-run variant stops before writing.

pub mod prepare;
