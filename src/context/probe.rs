//! Active-window probing
//!
//! The probe is the platform-specific edge of context detection: an external
//! helper command prints one JSON object describing the focused window, and
//! [`WindowContextSource`] turns those observations into display contexts,
//! holding on to the last good value when the probe comes up empty.

use crate::context::derive::{derive_context, ActiveWindow, UNKNOWN_CONTEXT};
use crate::context::ContextSource;
use crate::error::{AnamnesisError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::warn;

/// Source of active-window observations
#[async_trait]
pub trait WindowProbe: Send + Sync {
    /// Observe the currently focused window, if any
    async fn active_window(&self) -> Result<Option<ActiveWindow>>;
}

/// Wire format produced by window-probe helpers:
/// `{"title": ..., "url": ..., "owner": {"name": ...}}`
#[derive(Debug, Deserialize)]
struct RawWindow {
    title: String,
    #[serde(default)]
    url: Option<String>,
    owner: RawOwner,
}

#[derive(Debug, Deserialize)]
struct RawOwner {
    name: String,
}

/// Probe that shells out to a configured helper command
pub struct CommandWindowProbe {
    command: String,
}

impl CommandWindowProbe {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl WindowProbe for CommandWindowProbe {
    async fn active_window(&self) -> Result<Option<ActiveWindow>> {
        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .output()
            .await?;

        if !output.status.success() {
            return Err(AnamnesisError::ContextProbe(format!(
                "probe command exited with {}",
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let payload = stdout.trim();
        if payload.is_empty() {
            return Ok(None);
        }

        let raw: RawWindow = serde_json::from_str(payload)?;
        Ok(Some(ActiveWindow {
            title: raw.title,
            url: raw.url,
            app_name: raw.owner.name,
        }))
    }
}

/// Context source deriving contexts from a window probe
///
/// Caches the last successfully derived context and reports it when the
/// probe sees no window or fails, so transient probe hiccups do not bounce
/// the displayed notes.
pub struct WindowContextSource<P> {
    probe: P,
    last: Mutex<String>,
}

impl<P: WindowProbe> WindowContextSource<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            last: Mutex::new(UNKNOWN_CONTEXT.to_string()),
        }
    }
}

#[async_trait]
impl<P: WindowProbe> ContextSource for WindowContextSource<P> {
    async fn current_context(&self) -> Result<String> {
        match self.probe.active_window().await {
            Ok(Some(window)) => {
                let context = derive_context(&window);
                *self.last.lock().await = context.clone();
                Ok(context)
            }
            Ok(None) => Ok(self.last.lock().await.clone()),
            Err(err) => {
                warn!("Active window probe failed: {}", err);
                Ok(self.last.lock().await.clone())
            }
        }
    }
}
