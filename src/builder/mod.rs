//! Artifact builder.
//!
//! This module lays out the self-contained executable: the platform wrapper
//! stub, the runtime executable, a zip payload of the program's files plus
//! the runtime's standard library, and the trailing footer.

pub mod archive;
pub mod errors;
pub mod package;
pub mod runtime;
pub mod staging;

pub use errors::{BuildError, BuildStep};
pub use package::{BuildReport, PackageBuilder};
pub use runtime::{wrapper_path, FixedRuntime, PathLookup, RuntimeInstall, RuntimeLocator};
pub use staging::StagingDir;
