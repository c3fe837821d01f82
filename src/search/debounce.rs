use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{trace, warn};

/// Message sent by a timer task once its window has elapsed.
#[derive(Debug)]
struct Fired<K> {
    key: K,
    generation: u64,
    value: String,
}

#[derive(Debug)]
struct Timer {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Trailing-edge debounce with one independent timer per key.
///
/// Scheduling a key again supersedes its pending timer. Timer tasks report
/// back over a channel; a fired timer whose generation no longer matches
/// the key's latest schedule is dropped, so the last write always wins even
/// when an older timer fired before it could be aborted.
#[derive(Debug)]
pub struct Debouncer<K> {
    window: Duration,
    timers: HashMap<K, Timer>,
    next_generation: u64,
    tx: mpsc::UnboundedSender<Fired<K>>,
    rx: mpsc::UnboundedReceiver<Fired<K>>,
}

impl<K> Debouncer<K>
where
    K: Copy + Eq + Hash + Send + std::fmt::Debug + 'static,
{
    pub fn new(window: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            window,
            timers: HashMap::new(),
            next_generation: 0,
            tx,
            rx,
        }
    }

    /// Start (or restart) the timer for `key`.
    ///
    /// Returns `false` without scheduling anything when there is no Tokio
    /// runtime to run the timer on; the caller should then apply the input
    /// right away.
    pub fn schedule(&mut self, key: K, value: String) -> bool {
        let Ok(runtime) = Handle::try_current() else {
            warn!(?key, "No Tokio runtime, input not debounced");
            return false;
        };

        self.next_generation += 1;
        let generation = self.next_generation;
        let deadline = Instant::now() + self.window;
        let tx = self.tx.clone();

        let handle = runtime.spawn(async move {
            sleep_until(deadline).await;
            let _ = tx.send(Fired {
                key,
                generation,
                value,
            });
        });

        if let Some(previous) = self.timers.insert(key, Timer { generation, handle }) {
            trace!(?key, "Superseding pending input");
            previous.handle.abort();
        }
        true
    }

    pub fn is_pending(&self) -> bool {
        !self.timers.is_empty()
    }

    pub fn is_pending_for(&self, key: K) -> bool {
        self.timers.contains_key(&key)
    }

    pub fn cancel_all(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.handle.abort();
        }
    }

    /// Wait for the next pending key to settle.
    ///
    /// Returns `None` right away when nothing is pending. Cancel safe.
    pub async fn next(&mut self) -> Option<(K, String)> {
        loop {
            if self.timers.is_empty() {
                return None;
            }
            let fired = self.rx.recv().await?;
            match self.timers.get(&fired.key) {
                Some(timer) if timer.generation == fired.generation => {
                    self.timers.remove(&fired.key);
                    return Some((fired.key, fired.value));
                }
                _ => trace!(key = ?fired.key, "Dropping superseded input"),
            }
        }
    }
}

impl<K> Drop for Debouncer<K> {
    fn drop(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.handle.abort();
        }
    }
}
