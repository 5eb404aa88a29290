use crate::db::{PollStore, StoreError};
use crate::error::PollError;
use crate::models::{Device, Vote, VoteSource, default_device_type};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRegistration {
    pub device_id: String,
    #[serde(default = "default_device_type")]
    pub device_type: String,
    #[serde(default)]
    pub room_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IotClick {
    pub device_id: String,
    pub button_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickReceipt {
    pub status: String,
    pub poll: String,
    pub choice: String,
}

/// Binds a device to a room, creating it on first contact.
///
/// Re-registering an existing device only moves it to the new room; its type
/// and battery reading are left as they were.
pub async fn register_device(
    store: &dyn PollStore,
    registration: DeviceRegistration,
    now: DateTime<Utc>,
) -> Result<Device, PollError> {
    let device = match store.get_device(&registration.device_id).await? {
        Some(mut existing) => {
            existing.room_id = registration.room_id;
            existing.last_seen = now;
            existing
        }
        None => Device::new(
            registration.device_id,
            registration.device_type,
            registration.room_id,
            now,
        ),
    };

    store.upsert_device(&device).await?;
    info!("Registered device {} to room {:?}", device.id, device.room_id);
    Ok(device)
}

/// Casts one vote from a room button.
///
/// The device must be bound to a room that has an active poll; when several
/// polls are active there, the newest one receives the vote. `button_index`
/// picks the option by position.
pub async fn smart_click(
    store: &dyn PollStore,
    click: IotClick,
    now: DateTime<Utc>,
) -> Result<ClickReceipt, PollError> {
    let (device_id, room_id) = match store.get_device(&click.device_id).await? {
        Some(Device { id, room_id: Some(room_id), .. }) => (id, room_id),
        _ => {
            warn!("Click from unknown or unassigned device {}", click.device_id);
            return Err(PollError::DeviceUnknown(click.device_id));
        }
    };

    let poll = store
        .latest_active_poll_in_room(&room_id)
        .await?
        .ok_or_else(|| PollError::NoActivePoll(room_id.clone()))?;

    let option = poll.options.get(click.button_index).ok_or(PollError::InvalidButton {
        index: click.button_index,
        options: poll.options.len(),
    })?;

    let vote = Vote::new(&poll.id, &option.id, &device_id, VoteSource::IotRoom, now);
    match store.record_vote(&vote).await {
        Ok(()) => {}
        Err(StoreError::PollClosed(poll_id)) => {
            warn!("Poll {} closed before the click from {} landed", poll_id, device_id);
            return Err(PollError::NoActivePoll(room_id));
        }
        Err(e) => return Err(e.into()),
    }

    // The device may have been re-registered meanwhile, so only last_seen is written
    store.touch_device(&device_id, now).await?;

    info!("Device {} voted '{}' in poll {}", device_id, option.text, poll.id);
    Ok(ClickReceipt {
        status: "voted".to_string(),
        poll: poll.title.clone(),
        choice: option.text.clone(),
    })
}
