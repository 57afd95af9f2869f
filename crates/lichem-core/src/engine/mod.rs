//! # Engine Module
//!
//! The partitioning and basis-assignment algorithms, and the configuration record that drives
//! them.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Immutable run configuration and its builder
//! - **Partitioning** ([`partition`]) - QM, pseudobond, boundary, active sphere, and frozen sets
//! - **Basis Mapping** ([`basis`]) - Dense BASIS numbering and tier assignment
//! - **Progress Monitoring** ([`progress`]) - Progress reporting callbacks
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! Both algorithms talk to the structure only through
//! [`SelectionResolver`](crate::core::selection::resolver::SelectionResolver), and both finish
//! before anything is written to disk.

pub mod basis;
pub mod config;
pub mod error;
pub mod partition;
pub mod progress;
