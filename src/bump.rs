//! Version bumping across release artifacts
//!
//! Rewrites the release version in every file that carries it. Each target is
//! read, edited in memory and written back in full. Targets are independent:
//! a failure part-way through leaves the earlier files already rewritten.

use std::fs;
use std::path::{Path, PathBuf};

use regex::{NoExpand, Regex};
use serde_json::Value as JsonValue;
use toml_edit::{value, DocumentMut, Item, TableLike, Value};
use tracing::{debug, warn};

use crate::config::ReleaseConfig;
use crate::error::{ReleaseError, Result};
use crate::version::ReleaseVersion;

/// How the version is stored in an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    /// Download filenames `<product>_<x.y[.z]>_amd64.AppImage` inside prose
    AppImageLink,
    /// Top-level `"version"` field of a JSON object
    JsonObject,
    /// `[package] version` of a Cargo manifest
    CargoManifest,
    /// `version` of the first `[[package]]` entry named after the product
    CargoLock,
}

/// A file to rewrite and the format of its version field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactTarget {
    pub path: PathBuf,
    pub format: ArtifactFormat,
}

impl ArtifactTarget {
    pub fn new(path: impl Into<PathBuf>, format: ArtifactFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }
}

/// Applies a new version to a fixed, ordered list of artifacts
#[derive(Debug, Clone)]
pub struct VersionBumper {
    product: String,
    targets: Vec<ArtifactTarget>,
}

impl VersionBumper {
    pub fn new(product: impl Into<String>, targets: Vec<ArtifactTarget>) -> Self {
        Self {
            product: product.into(),
            targets,
        }
    }

    /// The cat-launcher artifact set, in the order they are rewritten
    pub fn from_config(config: &ReleaseConfig) -> Self {
        let paths = &config.paths;
        let targets = vec![
            ArtifactTarget::new(config.resolve(&paths.readme), ArtifactFormat::AppImageLink),
            ArtifactTarget::new(config.resolve(&paths.package_json), ArtifactFormat::JsonObject),
            ArtifactTarget::new(config.resolve(&paths.cargo_lock), ArtifactFormat::CargoLock),
            ArtifactTarget::new(config.resolve(&paths.cargo_toml), ArtifactFormat::CargoManifest),
            ArtifactTarget::new(config.resolve(&paths.tauri_conf), ArtifactFormat::JsonObject),
        ];
        Self::new(config.product.name.clone(), targets)
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn targets(&self) -> &[ArtifactTarget] {
        &self.targets
    }

    /// Rewrite every target in order, calling `on_updated` after each write.
    ///
    /// Stops at the first error; targets already written stay written.
    pub fn apply(
        &self,
        version: &ReleaseVersion,
        mut on_updated: impl FnMut(&ArtifactTarget),
    ) -> Result<()> {
        if !version.is_plain_release() {
            warn!(
                version = %version,
                "version carries pre-release or build metadata; AppImage filenames will include it verbatim"
            );
        }

        for target in &self.targets {
            self.apply_target(target, version)?;
            on_updated(target);
        }
        Ok(())
    }

    /// Read, rewrite and write back a single target
    pub fn apply_target(&self, target: &ArtifactTarget, version: &ReleaseVersion) -> Result<()> {
        let content = read(&target.path)?;
        let updated = match target.format {
            ArtifactFormat::AppImageLink => {
                rewrite_appimage_links(&content, &self.product, version)?
            }
            ArtifactFormat::JsonObject => rewrite_json_version(&target.path, &content, version)?,
            ArtifactFormat::CargoManifest => {
                rewrite_manifest_version(&target.path, &content, version)?
            }
            ArtifactFormat::CargoLock => {
                let (updated, matched) =
                    rewrite_lock_version(&target.path, &content, &self.product, version)?;
                if !matched {
                    warn!(
                        path = %target.path.display(),
                        product = %self.product,
                        "no lockfile entry for product; lockfile left unchanged"
                    );
                }
                updated
            }
        };
        write(&target.path, &updated)?;
        debug!(path = %target.path.display(), format = ?target.format, "artifact rewritten");
        Ok(())
    }
}

/// Replace the version in every AppImage download filename for `product`
pub fn rewrite_appimage_links(
    content: &str,
    product: &str,
    version: &ReleaseVersion,
) -> Result<String> {
    let pattern = Regex::new(&format!(
        r"{}_\d+\.\d+(\.\d+)?_amd64\.AppImage",
        regex::escape(product)
    ))?;
    let replacement = format!("{product}_{version}_amd64.AppImage");

    debug!(matches = pattern.find_iter(content).count(), "AppImage links found");
    Ok(pattern
        .replace_all(content, NoExpand(&replacement))
        .into_owned())
}

/// Set the top-level `"version"` field, re-serializing with two-space indentation
pub fn rewrite_json_version(
    path: &Path,
    content: &str,
    version: &ReleaseVersion,
) -> Result<String> {
    let mut doc: JsonValue = serde_json::from_str(content)?;
    let object = doc
        .as_object_mut()
        .ok_or_else(|| ReleaseError::NotAnObject(path.to_path_buf()))?;
    object.insert(
        "version".to_string(),
        JsonValue::String(version.as_str().to_string()),
    );

    let mut out = serde_json::to_string_pretty(&doc)?;
    out.push('\n');
    Ok(out)
}

/// Set `[package] version`, leaving the rest of the manifest untouched
pub fn rewrite_manifest_version(
    path: &Path,
    content: &str,
    version: &ReleaseVersion,
) -> Result<String> {
    let mut doc = content.parse::<DocumentMut>()?;
    let package = doc
        .get_mut("package")
        .and_then(Item::as_table_like_mut)
        .ok_or_else(|| ReleaseError::MissingTable {
            table: "package".to_string(),
            path: path.to_path_buf(),
        })?;
    set_version(package, version.as_str());
    Ok(doc.to_string())
}

/// Set the version of the first `[[package]]` named `product`.
///
/// Returns the rewritten document and whether an entry matched. Later entries
/// with the same name are not touched.
pub fn rewrite_lock_version(
    path: &Path,
    content: &str,
    product: &str,
    version: &ReleaseVersion,
) -> Result<(String, bool)> {
    let mut doc = content.parse::<DocumentMut>()?;
    let packages = doc
        .get_mut("package")
        .and_then(Item::as_array_of_tables_mut)
        .ok_or_else(|| ReleaseError::MissingTable {
            table: "[package]".to_string(),
            path: path.to_path_buf(),
        })?;

    let mut matched = false;
    for package in packages.iter_mut() {
        if package.get("name").and_then(Item::as_str) == Some(product) {
            set_version(package, version.as_str());
            matched = true;
            break;
        }
    }
    Ok((doc.to_string(), matched))
}

// Keeps the surrounding whitespace and trailing comment of an existing value.
fn set_version(table: &mut dyn TableLike, version: &str) {
    match table.get_mut("version").and_then(Item::as_value_mut) {
        Some(existing) => {
            let decor = existing.decor().clone();
            *existing = Value::from(version);
            *existing.decor_mut() = decor;
        }
        None => {
            table.insert("version", value(version));
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| ReleaseError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|source| ReleaseError::Write {
        path: path.to_path_buf(),
        source,
    })
}
