//! Notification sink adapters.

mod http_sink;
mod in_memory;

pub use http_sink::HttpNotificationSink;
pub use in_memory::InMemoryNotificationSink;
