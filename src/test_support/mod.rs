//! Test utilities for spwn-cmpl unit tests.
//!
//! Fixtures write real files into temporary directories: SPWN source trees,
//! a fake runtime with its standard library, and a fake wrapper stub.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::test_support::{ProjectFixture, RuntimeFixture};
//!
//! let project = ProjectFixture::new()
//!     .file("main.spwn", "import ./a.spwn\n")
//!     .file("a.spwn", "")
//!     .write();
//! let runtime = RuntimeFixture::new().write();
//! ```

pub mod fixtures;

pub use fixtures::*;
