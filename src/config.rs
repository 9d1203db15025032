//! # Build Configuration
//!
//! Describes the single product this tool packages: its entry script, icon,
//! resource directories, documentation files and the Python packages it needs.
//!
//! The defaults reproduce the conventional project layout, so a bare run needs
//! no configuration at all. A `pyrelease.json` file can override any subset of
//! fields; missing fields fall back to their defaults.
//!
//! ## Lookup Order
//!
//! 1.  An explicit `--config <file>` (must exist).
//! 2.  `pyrelease.json` in the project root.
//! 3.  `pyrelease.json` in the per-user config directory.
//! 4.  Built-in defaults.

use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// File name looked up in the project root and the user config directory.
pub const CONFIG_FILE_NAME: &str = "pyrelease.json";

/// A resource directory bundled into the executable and copied into the release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMapping {
    /// Directory relative to the project root.
    pub source: PathBuf,
    /// Path inside the bundle (and name inside the release directory).
    pub target: String,
}

impl ResourceMapping {
    /// Maps a directory onto the same name inside the bundle.
    pub fn same_name(name: &str) -> Self {
        Self {
            source: PathBuf::from(name),
            target: name.to_string(),
        }
    }

    /// The `src:dst` pair understood by `--add-data`.
    pub fn add_data_arg(&self) -> String {
        format!("{}:{}", self.source.display(), self.target)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub product_name: String,
    pub entry_script: PathBuf,
    pub icon: PathBuf,
    pub resources: Vec<ResourceMapping>,
    pub documentation: Vec<PathBuf>,
    pub packages: Vec<String>,
    /// Interpreter used for both `pip` and `PyInstaller`.
    pub python: String,
    pub dist_dir: PathBuf,
    pub work_dir: PathBuf,
    /// Defaults to `<product_name>-Release` when unset.
    pub release_dir: Option<PathBuf>,
    /// Abort the pipeline when a single package fails to install.
    pub strict_dependencies: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            product_name: "dznvBlox".to_string(),
            entry_script: PathBuf::from("dznvBlox.pyw"),
            icon: PathBuf::from("data/assets/mylogo.ico"),
            resources: ["data", "handle", "version"]
                .iter()
                .map(|name| ResourceMapping::same_name(name))
                .collect(),
            documentation: vec![PathBuf::from("README.md"), PathBuf::from("LICENSE")],
            packages: ["psutil", "requests", "pillow", "pyperclip", "pyinstaller"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            python: default_python().to_string(),
            dist_dir: PathBuf::from("dist"),
            work_dir: PathBuf::from("build"),
            release_dir: None,
            strict_dependencies: false,
        }
    }
}

fn default_python() -> &'static str {
    if cfg!(windows) { "python" } else { "python3" }
}

impl BuildConfig {
    /// Resolves the configuration for a project root following the lookup order.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let project_file = root.join(CONFIG_FILE_NAME);
        if project_file.is_file() {
            return Self::from_file(&project_file);
        }

        if let Some(dirs) = directories::ProjectDirs::from("", "", "pyrelease") {
            let user_file = dirs.config_dir().join(CONFIG_FILE_NAME);
            if user_file.is_file() {
                return Self::from_file(&user_file);
            }
        }

        debug!("No {} found, using built-in defaults", CONFIG_FILE_NAME);
        Ok(Self::default())
    }

    /// Reads a JSON config file. Fields it omits keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// File name of the executable PyInstaller produces on this host.
    pub fn executable_name(&self) -> String {
        format!("{}{}", self.product_name, std::env::consts::EXE_SUFFIX)
    }

    /// The spec file PyInstaller drops into the working directory.
    pub fn metadata_file(&self) -> PathBuf {
        PathBuf::from(format!("{}.spec", self.product_name))
    }

    pub fn release_dir(&self) -> PathBuf {
        self.release_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}-Release", self.product_name)))
    }
}

/// Absolute form of the project root, without Windows `\\?\` verbatim prefixes.
///
/// The result becomes the working directory of pip and PyInstaller.
pub fn resolve_root(path: &Path) -> Result<PathBuf> {
    dunce::canonicalize(path)
        .with_context(|| format!("project root {} is not accessible", path.display()))
}

/// Absolute locations of every path the pipeline touches, anchored at the project root.
#[derive(Debug, Clone)]
pub struct Layout {
    pub root: PathBuf,
    pub config: BuildConfig,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>, config: BuildConfig) -> Self {
        Self { root: root.into(), config }
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.root.join(&self.config.dist_dir)
    }

    pub fn work_dir(&self) -> PathBuf {
        self.root.join(&self.config.work_dir)
    }

    pub fn metadata_file(&self) -> PathBuf {
        self.root.join(self.config.metadata_file())
    }

    pub fn built_executable(&self) -> PathBuf {
        self.dist_dir().join(self.config.executable_name())
    }

    pub fn release_dir(&self) -> PathBuf {
        self.root.join(self.config.release_dir())
    }

    /// Path of the executable once copied into the release directory.
    pub fn released_executable(&self) -> PathBuf {
        self.release_dir().join(self.config.executable_name())
    }
}
