//! Core data structures for spwn-cmpl.
//!
//! This module contains the types shared by the resolver and the builder:
//! - The package manifest (which files go into the payload)
//! - The artifact footer (the trailing metadata block)
//! - Host platform identity

pub mod footer;
pub mod manifest;
pub mod platform;

pub use footer::{ArtifactFooter, ArtifactLayout, FooterError};
pub use manifest::{EntryKind, ManifestEntry, PackageManifest};
pub use platform::Platform;
