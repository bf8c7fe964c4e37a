//! Context polling monitor
//!
//! Polls the context source on a fixed interval and feeds a change event
//! into the session loop whenever the observed context differs from the
//! previous observation. Probe failures surface as the error sentinel so
//! the resolver's unavailable branch takes over.

use crate::context::ContextSource;
use crate::session::SessionEvent;
use crate::types::ERROR_SENTINEL;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Polls a [`ContextSource`] and emits change events
pub struct ContextMonitor {
    source: Arc<dyn ContextSource>,
    interval: Duration,
}

impl ContextMonitor {
    pub fn new(source: Arc<dyn ContextSource>, interval: Duration) -> Self {
        Self { source, interval }
    }

    /// Spawn the polling loop.
    ///
    /// Only a changed observation produces an event. The loop ends when the
    /// session side of the channel is dropped.
    pub fn spawn(self, tx: mpsc::Sender<SessionEvent>) -> JoinHandle<()> {
        info!("Starting context polling every {:?}", self.interval);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            let mut previous: Option<String> = None;

            loop {
                ticker.tick().await;

                let observed = match self.source.current_context().await {
                    Ok(context) => context,
                    Err(err) => {
                        warn!("Context source failed: {}", err);
                        ERROR_SENTINEL.to_string()
                    }
                };

                if previous.as_deref() == Some(observed.as_str()) {
                    continue;
                }
                previous = Some(observed.clone());

                debug!("Active context changed to: {}", observed);
                if tx.send(SessionEvent::ContextChanged(observed)).await.is_err() {
                    break;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AnamnesisError, Result};
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    struct ScriptedSource {
        contexts: Mutex<Vec<Result<String>>>,
    }

    #[async_trait]
    impl ContextSource for ScriptedSource {
        async fn current_context(&self) -> Result<String> {
            let mut contexts = self.contexts.lock().await;
            if contexts.is_empty() {
                Ok("idle".to_string())
            } else {
                contexts.remove(0)
            }
        }
    }

    #[tokio::test]
    async fn test_emits_only_on_change_and_maps_errors_to_sentinel() {
        let source = Arc::new(ScriptedSource {
            contexts: Mutex::new(vec![
                Ok("Terminal".to_string()),
                Ok("Terminal".to_string()),
                Ok("Editor:ProjectX".to_string()),
                Err(AnamnesisError::ContextProbe("boom".to_string())),
            ]),
        });
        let (tx, mut rx) = mpsc::channel(8);

        let handle =
            ContextMonitor::new(source, Duration::from_millis(1)).spawn(tx);

        let mut seen = Vec::new();
        for _ in 0..3 {
            match rx.recv().await {
                Some(SessionEvent::ContextChanged(context)) => seen.push(context),
                other => panic!("unexpected event: {:?}", other),
            }
        }
        handle.abort();

        assert_eq!(
            seen,
            vec![
                "Terminal".to_string(),
                "Editor:ProjectX".to_string(),
                ERROR_SENTINEL.to_string(),
            ]
        );
    }
}
