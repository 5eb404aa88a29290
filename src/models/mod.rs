use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Poll {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub room_id: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub options: Vec<PollOption>,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PollOption {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub vote_count: u64,
}

/// A physical button bound (or not yet bound) to a room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Device {
    pub id: String,
    #[serde(default = "default_device_type")]
    pub device_type: String,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default = "default_battery_level")]
    pub battery_level: u8,
    pub last_seen: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Identity of whoever is asking, as established by the auth layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Requester {
    pub user_id: String,
    #[serde(default)]
    pub role: Role,
}

impl Requester {
    pub fn may_manage(&self, poll: &Poll) -> bool {
        self.role == Role::Admin || poll.owner_id.as_deref() == Some(self.user_id.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VoteSource {
    Iot,
    IotRoom,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vote {
    pub id: String,
    pub poll_id: String,
    pub option_id: String,
    pub device_id: String,
    pub source: VoteSource,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

pub(crate) fn default_device_type() -> String {
    "button".to_string()
}

fn default_battery_level() -> u8 {
    100
}

impl Poll {
    pub fn new(
        title: String,
        description: Option<String>,
        room_id: String,
        owner_id: Option<String>,
        options: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let options = options
            .into_iter()
            .map(|text| PollOption {
                id: Uuid::new_v4().to_string(),
                text,
                vote_count: 0,
            })
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            room_id,
            owner_id,
            options,
            created_at,
            is_active: true,
        }
    }
}

impl Device {
    pub fn new(id: String, device_type: String, room_id: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            device_type,
            room_id,
            battery_level: default_battery_level(),
            last_seen: now,
        }
    }
}

impl Vote {
    pub fn new(poll_id: &str, option_id: &str, device_id: &str, source: VoteSource, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            poll_id: poll_id.to_string(),
            option_id: option_id.to_string(),
            device_id: device_id.to_string(),
            source,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_poll_starts_active_with_empty_tallies() {
        let poll = Poll::new(
            "Lunch?".to_string(),
            None,
            "room-101".to_string(),
            Some("owner".to_string()),
            vec!["Pizza".to_string(), "Salad".to_string()],
            Utc::now(),
        );

        assert!(poll.is_active);
        assert_eq!(poll.options.len(), 2);
        assert!(poll.options.iter().all(|o| o.vote_count == 0));
        assert_ne!(poll.options[0].id, poll.options[1].id);
    }

    #[test]
    fn only_owner_or_admin_may_manage() {
        let poll = Poll::new(
            "Lunch?".to_string(),
            None,
            "room-101".to_string(),
            Some("owner".to_string()),
            vec!["Pizza".to_string()],
            Utc::now(),
        );
        let owner = Requester { user_id: "owner".to_string(), role: Role::User };
        let stranger = Requester { user_id: "other".to_string(), role: Role::User };
        let admin = Requester { user_id: "root".to_string(), role: Role::Admin };

        assert!(owner.may_manage(&poll));
        assert!(!stranger.may_manage(&poll));
        assert!(admin.may_manage(&poll));
    }

    #[test]
    fn vote_source_uses_snake_case() {
        assert_eq!(serde_json::to_string(&VoteSource::IotRoom).unwrap(), "\"iot_room\"");
        assert_eq!(serde_json::to_string(&VoteSource::Iot).unwrap(), "\"iot\"");
    }

    #[test]
    fn device_defaults_fill_missing_fields() {
        let device: Device = serde_json::from_str(
            r#"{"id": "btn-1", "last_seen": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(device.device_type, "button");
        assert_eq!(device.battery_level, 100);
        assert_eq!(device.room_id, None);
    }
}
