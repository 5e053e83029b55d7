//! Shared testing infrastructure for the sky chart workspace.
//!
//! Provides workspace root discovery, a persistent `test_output/` directory for
//! rendered artifacts that are worth inspecting by eye, and small fixture datasets
//! in the same on-disk formats as the real star catalog and constellation lines.
//!
//! ```rust
//! use test_helpers::{find_project_root, output_path};
//!
//! let root = find_project_root().expect("Project root not found");
//! assert!(root.join("Cargo.toml").exists());
//!
//! let image_path = output_path("chart.png");
//! assert!(image_path.starts_with(root));
//! ```

pub mod fixtures;

use once_cell::sync::Lazy;
use std::env;
use std::path::{Path, PathBuf};

/// Errors raised while setting up test infrastructure.
#[derive(thiserror::Error, Debug)]
pub enum TestHelperError {
    /// Project root directory could not be located or accessed.
    #[error("Failed to find project root: {0}")]
    ProjectRootNotFound(String),
}

/// Locate the workspace root by walking up from the current directory until a
/// `Cargo.toml` with a `[workspace]` section is found.
pub fn find_project_root() -> Result<PathBuf, TestHelperError> {
    let mut current_dir = env::current_dir().map_err(|e| {
        TestHelperError::ProjectRootNotFound(format!("Failed to get current directory: {}", e))
    })?;

    loop {
        let cargo_toml = current_dir.join("Cargo.toml");
        if cargo_toml.exists() {
            let content = std::fs::read_to_string(&cargo_toml).map_err(|e| {
                TestHelperError::ProjectRootNotFound(format!("Failed to read Cargo.toml: {}", e))
            })?;

            if content.contains("[workspace]") {
                return Ok(current_dir);
            }
        }

        if !current_dir.pop() {
            break;
        }
    }

    Err(TestHelperError::ProjectRootNotFound(
        "Workspace root not found".to_string(),
    ))
}

/// Project root, resolved once per test process.
static PROJECT_ROOT: Lazy<PathBuf> =
    Lazy::new(|| find_project_root().expect("Failed to find project root directory"));

/// `<project_root>/test_output/`, created on first use.
pub fn get_output_dir() -> PathBuf {
    let output_dir = PROJECT_ROOT.join("test_output");

    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir).expect("Failed to create output directory");
    }

    output_dir
}

/// Path of an artifact inside the test output directory.
pub fn output_path<P: AsRef<Path>>(path: P) -> PathBuf {
    get_output_dir().join(path)
}
