mod memory;

pub use memory::MemoryStore;

use crate::models::{Device, Poll, Vote};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Poll not found: {0}")]
    PollNotFound(String),

    #[error("Poll option not found: {0}")]
    OptionNotFound(String),

    #[error("Poll is closed: {0}")]
    PollClosed(String),
}

/// Reads and writes the poll handlers need from whatever backs the polls,
/// rooms and devices.
///
/// Implementations must apply `record_vote` atomically: the vote row and the
/// option's `vote_count` increment become visible together, so a concurrent
/// `get_poll` always sees counts that match the recorded votes. A poll that
/// was ended before the write lands rejects the vote with `PollClosed`.
#[async_trait]
pub trait PollStore: Send + Sync {
    async fn insert_poll(&self, poll: &Poll) -> Result<(), StoreError>;

    async fn get_poll(&self, poll_id: &str) -> Result<Option<Poll>, StoreError>;

    async fn list_polls(&self) -> Result<Vec<Poll>, StoreError>;

    // Newest first
    async fn list_polls_by_owner(&self, owner_id: &str) -> Result<Vec<Poll>, StoreError>;

    /// Removes the poll together with its options and votes.
    async fn delete_poll(&self, poll_id: &str) -> Result<(), StoreError>;

    async fn set_poll_active(&self, poll_id: &str, is_active: bool) -> Result<(), StoreError>;

    // Most recently created active poll in the room, if any
    async fn latest_active_poll_in_room(&self, room_id: &str) -> Result<Option<Poll>, StoreError>;

    async fn get_device(&self, device_id: &str) -> Result<Option<Device>, StoreError>;

    async fn upsert_device(&self, device: &Device) -> Result<(), StoreError>;

    // Only `last_seen` changes; a missing device is left alone
    async fn touch_device(&self, device_id: &str, now: DateTime<Utc>) -> Result<(), StoreError>;

    async fn record_vote(&self, vote: &Vote) -> Result<(), StoreError>;
}
