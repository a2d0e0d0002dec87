use async_trait::async_trait;

use crate::errors::Result;
use crate::sync::{LocalRecord, PendingCounts, SyncCollection};

/// Local durable store for records captured while offline.
#[async_trait]
pub trait LocalStoreTrait: Send + Sync {
    /// Inserts or overwrites a record keyed by its local id.
    async fn upsert(&self, record: LocalRecord) -> Result<()>;

    /// Returns every unsynced record of the collection in insertion order.
    async fn query_unsynced(&self, collection: SyncCollection) -> Result<Vec<LocalRecord>>;

    /// Flags a record as synced, recording the server id when one is known.
    ///
    /// With `server_id` of `None` the stored id is left as is, so a record the
    /// server accepted without returning an id ends up synced with no server
    /// id. Pushing it again would create a duplicate remotely.
    ///
    /// Marking an already synced or unknown record is a no-op.
    async fn mark_synced(
        &self,
        collection: SyncCollection,
        local_id: &str,
        server_id: Option<String>,
    ) -> Result<()>;

    async fn find(&self, collection: SyncCollection, local_id: &str)
        -> Result<Option<LocalRecord>>;

    async fn pending_counts(&self) -> Result<PendingCounts>;
}
