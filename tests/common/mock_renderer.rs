/*!
 * Mock renderer for testing
 *
 * Records every call without touching the filesystem. It can be slowed down
 * to exercise timeouts and cancellation, made to fail, or made to panic.
 */

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use reeltime::errors::RenderError;
use reeltime::render::{RenderPlan, Renderer};

/// Renderer double with call tracking
#[derive(Debug, Default)]
pub struct MockRenderer {
    delay: Option<Duration>,
    fail: bool,
    panic: bool,
    calls: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl MockRenderer {
    /// Succeeds immediately
    pub fn working() -> Self {
        Self::default()
    }

    /// Succeeds after `delay`
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Always fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Panics inside `render`
    pub fn panicking() -> Self {
        Self {
            panic: true,
            ..Self::default()
        }
    }

    /// Number of render calls started
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of renders observed running at once
    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    async fn render(&self, _plan: &RenderPlan, output: &Path) -> Result<PathBuf, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panic {
            panic!("mock renderer panic");
        }
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.fail {
            return Err(RenderError::RendererFailed("mock failure".to_string()));
        }
        Ok(output.to_path_buf())
    }
}
