use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use types::{Round, Speech};

use crate::{JournalError, OperationLogEntry};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JournalEvent {
    Speech { round: Round, speech: Speech },
    Operation(OperationLogEntry),
}

/// Receives every journal append as it happens.
pub trait GameRecorder: Send + Sync {
    fn record(&mut self, event: &JournalEvent) -> Result<(), JournalError>;
}

#[derive(Debug, Default)]
pub struct NoopRecorder;

impl GameRecorder for NoopRecorder {
    fn record(&mut self, _event: &JournalEvent) -> Result<(), JournalError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct LogRecorder;

impl GameRecorder for LogRecorder {
    fn record(&mut self, event: &JournalEvent) -> Result<(), JournalError> {
        match event {
            JournalEvent::Speech { round, speech } => tracing::info!("day {round} {speech}"),
            JournalEvent::Operation(entry) => {
                tracing::debug!("#{} {:?}: {}", entry.sequence, entry.kind, entry.message)
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct ChannelRecorder {
    sender: UnboundedSender<JournalEvent>,
}

impl ChannelRecorder {
    pub fn new(sender: UnboundedSender<JournalEvent>) -> Self {
        Self { sender }
    }
}

impl GameRecorder for ChannelRecorder {
    fn record(&mut self, event: &JournalEvent) -> Result<(), JournalError> {
        self.sender
            .send(event.clone())
            .map_err(|_| JournalError::ChannelClosed)
    }
}
