//! High-level operations.
//!
//! This module contains the implementation of spwn-cmpl commands.

pub mod cmpl_build;
pub mod cmpl_resolve;
pub mod inspect;
pub mod unpack;

pub use cmpl_build::{build, default_containers_dir, BuildOptions, BuildResult};
pub use cmpl_resolve::{resolve, ResolveOptions, Resolved};
pub use inspect::{inspect, ArtifactInfo};
pub use unpack::{unpack, UnpackResult};
