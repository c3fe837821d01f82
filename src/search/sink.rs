use tokio::sync::mpsc;
use tracing::{info, warn};

/// Receives every committed query string.
///
/// Implementations replace the current location with `query` without adding
/// a history entry and without scrolling. `query` carries no leading `?` and
/// is empty when every filter is cleared.
pub trait CommitSink: Send + Sync {
    fn replace(&self, query: &str);
}

/// Sink that only logs the new location.
#[derive(Debug, Default)]
pub struct LogSink;

impl CommitSink for LogSink {
    fn replace(&self, query: &str) {
        info!("Location replaced: ?{}", query);
    }
}

/// Sink that forwards each committed query over a channel, so a consumer
/// can refetch listings.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl CommitSink for ChannelSink {
    fn replace(&self, query: &str) {
        if self.tx.send(query.to_string()).is_err() {
            warn!("Commit receiver dropped, discarding ?{}", query);
        }
    }
}
