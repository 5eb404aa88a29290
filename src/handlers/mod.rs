mod analytics;
mod poll;
mod vote;

pub use analytics::{PollAnalyticsView, poll_analytics};
pub use poll::{NewPoll, create_poll, delete_poll, end_poll, list_my_polls};
pub use vote::{ClickReceipt, DeviceRegistration, IotClick, register_device, smart_click};
