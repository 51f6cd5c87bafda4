//! Scratch store port (driven/secondary port)
//!
//! Best-effort local key/value storage used by the write cache to survive
//! process teardown. "Best-effort" is load-bearing: the store may be
//! unavailable or lose data, and callers must treat every failure as
//! recoverable (the worst case is losing local unsynced intent, never
//! remote state).

#[async_trait::async_trait]
pub trait IScratchStore: Send + Sync {
    /// Read the bytes stored under a key, if any
    async fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>>;

    /// Store bytes under a key, replacing any prior value
    async fn set(&self, key: &str, value: &[u8]) -> anyhow::Result<()>;

    /// Remove a key; removing an absent key is not an error
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}
