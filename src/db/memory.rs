use crate::db::{PollStore, StoreError};
use crate::models::{Device, Poll, Vote};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    polls: HashMap<String, Poll>,
    devices: HashMap<String, Device>,
    votes: Vec<Vote>,
}

/// Process-local store keeping every table behind one lock.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a store from already-loaded polls and devices.
    pub fn with_data(polls: Vec<Poll>, devices: Vec<Device>) -> Self {
        let tables = Tables {
            polls: polls.into_iter().map(|p| (p.id.clone(), p)).collect(),
            devices: devices.into_iter().map(|d| (d.id.clone(), d)).collect(),
            votes: Vec::new(),
        };
        Self {
            tables: RwLock::new(tables),
        }
    }

    pub(crate) async fn votes_for_poll(&self, poll_id: &str) -> Vec<Vote> {
        let tables = self.tables.read().await;
        tables
            .votes
            .iter()
            .filter(|vote| vote.poll_id == poll_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PollStore for MemoryStore {
    async fn insert_poll(&self, poll: &Poll) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.polls.insert(poll.id.clone(), poll.clone());
        Ok(())
    }

    async fn get_poll(&self, poll_id: &str) -> Result<Option<Poll>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.polls.get(poll_id).cloned())
    }

    async fn list_polls(&self) -> Result<Vec<Poll>, StoreError> {
        let tables = self.tables.read().await;
        let mut polls: Vec<Poll> = tables.polls.values().cloned().collect();
        polls.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(polls)
    }

    async fn list_polls_by_owner(&self, owner_id: &str) -> Result<Vec<Poll>, StoreError> {
        let tables = self.tables.read().await;
        let mut polls: Vec<Poll> = tables
            .polls
            .values()
            .filter(|poll| poll.owner_id.as_deref() == Some(owner_id))
            .cloned()
            .collect();
        polls.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(polls)
    }

    async fn delete_poll(&self, poll_id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.polls.remove(poll_id).is_none() {
            return Err(StoreError::PollNotFound(poll_id.to_string()));
        }
        tables.votes.retain(|vote| vote.poll_id != poll_id);
        Ok(())
    }

    async fn set_poll_active(&self, poll_id: &str, is_active: bool) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let poll = tables
            .polls
            .get_mut(poll_id)
            .ok_or_else(|| StoreError::PollNotFound(poll_id.to_string()))?;
        poll.is_active = is_active;
        Ok(())
    }

    async fn latest_active_poll_in_room(&self, room_id: &str) -> Result<Option<Poll>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .polls
            .values()
            .filter(|poll| poll.is_active && poll.room_id == room_id)
            .max_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| b.id.cmp(&a.id)))
            .cloned())
    }

    async fn get_device(&self, device_id: &str) -> Result<Option<Device>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.devices.get(device_id).cloned())
    }

    async fn upsert_device(&self, device: &Device) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.devices.insert(device.id.clone(), device.clone());
        Ok(())
    }

    async fn touch_device(&self, device_id: &str, now: DateTime<Utc>) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(device) = tables.devices.get_mut(device_id) {
            device.last_seen = now;
        }
        Ok(())
    }

    async fn record_vote(&self, vote: &Vote) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;

        let poll = tables
            .polls
            .get_mut(&vote.poll_id)
            .ok_or_else(|| StoreError::PollNotFound(vote.poll_id.clone()))?;
        if !poll.is_active {
            return Err(StoreError::PollClosed(vote.poll_id.clone()));
        }
        let option = poll
            .options
            .iter_mut()
            .find(|option| option.id == vote.option_id)
            .ok_or_else(|| StoreError::OptionNotFound(vote.option_id.clone()))?;
        option.vote_count += 1;

        tables.votes.push(vote.clone());
        Ok(())
    }
}
