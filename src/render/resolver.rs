/*!
 * Asset resolution seam.
 *
 * Footage and global assets are opaque references until a resolver maps
 * them to media the renderer can read. A reference that cannot be resolved
 * fails the job with `MissingAsset`.
 */

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::errors::RenderError;

/// Maps opaque asset references to renderer inputs
pub trait AssetResolver: Send + Sync + Debug {
    /// Resolve `asset_ref`, failing with `RenderError::MissingAsset` if it does not exist
    fn resolve(&self, asset_ref: &str) -> Result<String, RenderError>;
}

/// Resolver that accepts every reference as-is
#[derive(Debug, Default, Clone)]
pub struct PassthroughResolver;

impl AssetResolver for PassthroughResolver {
    fn resolve(&self, asset_ref: &str) -> Result<String, RenderError> {
        Ok(asset_ref.to_string())
    }
}

/// Resolver that looks assets up as files under a root directory
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory relative references are resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetResolver for DirectoryResolver {
    fn resolve(&self, asset_ref: &str) -> Result<String, RenderError> {
        let candidate = Path::new(asset_ref);
        let path = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        };

        if !path.is_file() {
            return Err(RenderError::MissingAsset(format!(
                "'{}' not found at {}",
                asset_ref,
                path.display()
            )));
        }

        Ok(path.to_string_lossy().into_owned())
    }
}
