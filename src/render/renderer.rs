/*!
 * Renderer seam.
 *
 * A renderer executes a render plan and produces a file. Real renderers wrap
 * an external video toolchain and may run for a long time; they are awaited
 * inside the job that owns the plan.
 */

use async_trait::async_trait;
use log::info;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::errors::RenderError;

use super::plan::RenderPlan;

/// Common trait for all renderers
#[async_trait]
pub trait Renderer: Send + Sync + Debug {
    /// Execute `plan`, writing the result to `output`
    ///
    /// # Returns
    /// * `Result<PathBuf, RenderError>` - Path of the produced file or an error
    async fn render(&self, plan: &RenderPlan, output: &Path) -> Result<PathBuf, RenderError>;
}

/// Renderer that writes the plan itself as pretty JSON
#[derive(Debug, Default, Clone)]
pub struct PlanWriter;

#[async_trait]
impl Renderer for PlanWriter {
    async fn render(&self, plan: &RenderPlan, output: &Path) -> Result<PathBuf, RenderError> {
        let json = plan
            .to_json()
            .map_err(|e| RenderError::RendererFailed(format!("Failed to serialize plan: {}", e)))?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(output, json).await?;

        info!("Render plan written: {:?}", output);
        Ok(output.to_path_buf())
    }
}
