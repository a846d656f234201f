//! Configuration management for the release tools
//!
//! Supports loading configuration from:
//! - Default values (the cat-launcher repository layout)
//! - Config file (release.toml)
//! - Environment variables (RELEASE__*)
//!
//! ## Example config file (release.toml):
//! ```toml
//! [product]
//! name = "cat-launcher"
//!
//! [paths]
//! root = "."
//! readme = "README.md"
//! package_json = "cat-launcher/package.json"
//! cargo_lock = "cat-launcher/src-tauri/Cargo.lock"
//! cargo_toml = "cat-launcher/src-tauri/Cargo.toml"
//! tauri_conf = "cat-launcher/src-tauri/tauri.conf.json"
//!
//! [schema]
//! path = "cat-launcher/src-tauri/schemas/schema.sql"
//! scratch_db = "test_schema_compatibility.db"
//! ```
//!
//! Environment overrides use a double underscore between sections, e.g.
//! `RELEASE__PATHS__ROOT=/src/cat-launcher`.

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for the release tools
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReleaseConfig {
    /// Product settings
    #[serde(default)]
    pub product: ProductConfig,

    /// Artifact locations touched by the version bump
    #[serde(default)]
    pub paths: PathsConfig,

    /// Schema compatibility check settings
    #[serde(default)]
    pub schema: SchemaCheckConfig,
}

/// Product identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Package name in Cargo.lock and prefix of the AppImage filename
    #[serde(default = "default_product_name")]
    pub name: String,
}

/// Artifact paths, relative to `root` unless absolute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Repository root. Defaults to the enclosing git work tree.
    #[serde(default)]
    pub root: Option<PathBuf>,

    #[serde(default = "default_readme")]
    pub readme: PathBuf,

    #[serde(default = "default_package_json")]
    pub package_json: PathBuf,

    #[serde(default = "default_cargo_lock")]
    pub cargo_lock: PathBuf,

    #[serde(default = "default_cargo_toml")]
    pub cargo_toml: PathBuf,

    #[serde(default = "default_tauri_conf")]
    pub tauri_conf: PathBuf,
}

/// Schema check configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaCheckConfig {
    /// Repository-relative path of the schema script inside each commit tree
    #[serde(default = "default_schema_path")]
    pub path: String,

    /// Scratch database file, relative to the working directory
    #[serde(default = "default_scratch_db")]
    pub scratch_db: PathBuf,
}

// Default value functions
fn default_product_name() -> String {
    "cat-launcher".to_string()
}

fn default_readme() -> PathBuf {
    PathBuf::from("README.md")
}

fn default_package_json() -> PathBuf {
    PathBuf::from("cat-launcher/package.json")
}

fn default_cargo_lock() -> PathBuf {
    PathBuf::from("cat-launcher/src-tauri/Cargo.lock")
}

fn default_cargo_toml() -> PathBuf {
    PathBuf::from("cat-launcher/src-tauri/Cargo.toml")
}

fn default_tauri_conf() -> PathBuf {
    PathBuf::from("cat-launcher/src-tauri/tauri.conf.json")
}

fn default_schema_path() -> String {
    "cat-launcher/src-tauri/schemas/schema.sql".to_string()
}

fn default_scratch_db() -> PathBuf {
    PathBuf::from("test_schema_compatibility.db")
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            name: default_product_name(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: None,
            readme: default_readme(),
            package_json: default_package_json(),
            cargo_lock: default_cargo_lock(),
            cargo_toml: default_cargo_toml(),
            tauri_conf: default_tauri_conf(),
        }
    }
}

impl Default for SchemaCheckConfig {
    fn default() -> Self {
        Self {
            path: default_schema_path(),
            scratch_db: default_scratch_db(),
        }
    }
}

impl ReleaseConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the default locations
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["release.toml", ".release.toml", "config/release.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "cat-launcher", "release") {
            let xdg_config = config_dir.config_dir().join("release.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("RELEASE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Resolve the repository root.
    ///
    /// An explicit `paths.root` wins (relative values are taken from the current
    /// directory); otherwise the work tree of the enclosing git repository, and
    /// finally the current directory itself.
    pub fn root(&self) -> PathBuf {
        let cwd = std::env::current_dir().unwrap_or_default();
        match &self.paths.root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => cwd.join(root),
            None => git2::Repository::discover(&cwd)
                .ok()
                .and_then(|repo| repo.workdir().map(Path::to_path_buf))
                .unwrap_or(cwd),
        }
    }

    /// Resolve an artifact path against the repository root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root().join(path)
        }
    }

    /// Scratch database location, relative to the current directory
    pub fn scratch_db_path(&self) -> PathBuf {
        if self.schema.scratch_db.is_absolute() {
            self.schema.scratch_db.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_default()
                .join(&self.schema.scratch_db)
        }
    }
}
