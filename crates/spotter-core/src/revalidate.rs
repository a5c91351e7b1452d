//! Plan-staleness revalidation signal.
//!
//! Every successful mutation publishes the affected client's id; any view
//! holding that client's plan re-issues the active-plan read in response.
//! Built on a broadcast channel so multiple views can listen; publishing
//! with no listeners is fine.

use tokio::sync::broadcast;
use uuid::Uuid;

/// Default buffer size for the staleness channel.
const DEFAULT_CAPACITY: usize = 64;

/// Publisher/subscriber hub for "this client's plan view is stale".
#[derive(Debug, Clone)]
pub struct Revalidator {
    tx: broadcast::Sender<Uuid>,
}

impl Revalidator {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to staleness notifications. Each received id names a
    /// client whose plan view should be reloaded.
    pub fn subscribe(&self) -> broadcast::Receiver<Uuid> {
        self.tx.subscribe()
    }

    /// Mark a client's plan view stale. Dropped silently when nobody is
    /// listening.
    pub fn notify(&self, client_id: Uuid) {
        let _ = self.tx.send(client_id);
    }
}

impl Default for Revalidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_the_client_id() {
        let revalidator = Revalidator::new();
        let mut rx = revalidator.subscribe();

        let client = Uuid::new_v4();
        revalidator.notify(client);

        assert_eq!(rx.recv().await.unwrap(), client);
    }

    #[tokio::test]
    async fn notify_without_subscribers_is_fine() {
        let revalidator = Revalidator::new();
        revalidator.notify(Uuid::new_v4());
    }

    #[tokio::test]
    async fn each_subscriber_sees_every_notification() {
        let revalidator = Revalidator::new();
        let mut rx1 = revalidator.subscribe();
        let mut rx2 = revalidator.subscribe();

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        revalidator.notify(a);
        revalidator.notify(b);

        assert_eq!(rx1.recv().await.unwrap(), a);
        assert_eq!(rx1.recv().await.unwrap(), b);
        assert_eq!(rx2.recv().await.unwrap(), a);
        assert_eq!(rx2.recv().await.unwrap(), b);
    }
}
