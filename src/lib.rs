//! spwn-cmpl - package SPWN programs into standalone executables
//!
//! This crate provides the library half of spwn-cmpl: import resolution,
//! the package manifest, and artifact assembly.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities for spwn-cmpl unit tests.
///
/// Builds throwaway project trees and fake runtime installs.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildError, BuildReport, PackageBuilder};
pub use core::{ArtifactFooter, PackageManifest, Platform};
pub use resolver::{ImportResolver, ResolveError};
