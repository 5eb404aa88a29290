use crate::db::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PollError {
    #[error("Poll not found: {0}")]
    PollNotFound(String),

    #[error("Device unknown or not assigned to a room: {0}")]
    DeviceUnknown(String),

    #[error("No active poll in room {0}")]
    NoActivePoll(String),

    #[error("Invalid button {index}: poll has {options} options")]
    InvalidButton { index: usize, options: usize },

    #[error("User {user_id} may not modify poll {poll_id}")]
    Forbidden { poll_id: String, user_id: String },

    #[error("Invalid poll: {0}")]
    InvalidPoll(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
