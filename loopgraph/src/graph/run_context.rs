//! Run context passed into nodes.
//!
//! Holds the run config (including the cancellation token), the current step number,
//! and the optional stream sender plus selected stream modes.

use std::collections::HashSet;

use tokio::sync::mpsc;

use crate::stream::{StreamEvent, StreamMode};

use super::{GraphState, RunnableConfig};

#[derive(Clone)]
pub struct RunContext<S>
where
    S: GraphState,
{
    /// Config for the current run (step limit, timeout, cancellation).
    pub config: RunnableConfig,
    /// Zero-based index of the node invocation in progress.
    pub step: usize,
    /// Optional sender for streaming events.
    pub stream_tx: Option<mpsc::Sender<StreamEvent<S>>>,
    /// Enabled stream modes (Values, Updates).
    pub stream_mode: HashSet<StreamMode>,
}

impl<S> RunContext<S>
where
    S: GraphState,
{
    /// Context without streaming.
    pub fn new(config: RunnableConfig) -> Self {
        Self {
            config,
            step: 0,
            stream_tx: None,
            stream_mode: HashSet::new(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.config.cancellation.is_cancelled()
    }

    /// Sends `event` when `mode` is enabled and a consumer is attached.
    pub(crate) async fn emit(&self, mode: StreamMode, event: StreamEvent<S>) {
        if let Some(tx) = &self.stream_tx {
            if self.stream_mode.contains(&mode) {
                let _ = tx.send(event).await;
            }
        }
    }
}
