//! Online/offline state and the "connectivity regained" signal.

use std::sync::Arc;

use tokio::sync::watch;

/// Process-wide connectivity state. Clones share the same channel.
#[derive(Debug, Clone)]
pub struct ConnectivityMonitor {
    tx: Arc<watch::Sender<bool>>,
}

impl ConnectivityMonitor {
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        Self { tx: Arc::new(tx) }
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Records the current state. Returns `true` when this call is an
    /// offline to online transition.
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.tx.send_if_modified(|state| {
            if *state == online {
                false
            } else {
                *state = online;
                true
            }
        });
        changed && online
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Waits for the next offline to online transition.
///
/// Returns `false` once the monitor has been dropped.
pub async fn wait_until_regained(rx: &mut watch::Receiver<bool>) -> bool {
    loop {
        if rx.changed().await.is_err() {
            return false;
        }
        if *rx.borrow_and_update() {
            return true;
        }
    }
}
