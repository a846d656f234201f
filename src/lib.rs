//! cat-launcher release tools
//!
//! Two small utilities used when cutting a cat-launcher release:
//!
//! - **Version bump** (`bump-version`): writes a new semantic version into the
//!   README download links, `package.json`, `tauri.conf.json`, the Tauri crate's
//!   `Cargo.toml` and its `Cargo.lock` entry.
//! - **Schema compatibility** (`schema-validator`): loads `schema.sql` from two
//!   commits and checks that the newer script applies on top of a database the
//!   older one has already initialised.
//!
//! ## Layout
//!
//! ```text
//! README.md                                 cat-launcher_<ver>_amd64.AppImage
//! cat-launcher/
//! ├── package.json                          "version"
//! └── src-tauri/
//!     ├── Cargo.toml                        [package] version
//!     ├── Cargo.lock                        [[package]] name = "cat-launcher"
//!     ├── tauri.conf.json                   "version"
//!     └── schemas/schema.sql                checked across commits
//! ```

pub mod bump;
pub mod compatibility;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod version;

pub use bump::{ArtifactFormat, ArtifactTarget, VersionBumper};
pub use compatibility::{
    CompatibilityChecker, CompatibilityReport, CompatibilityVerdict, FailedStage, ScratchDatabase,
};
pub use config::ReleaseConfig;
pub use error::{ReleaseError, Result};
pub use snapshot::{discover_repository, SchemaSnapshot};
pub use version::ReleaseVersion;
