//! Adapters - Implementations of port interfaces.
//!
//! - `http` - Axum routes, error rendering and cross-cutting layers
//! - `analytics` - Analytics sinks (HTTP, in-memory)
//! - `notification` - CRM notification sinks (HTTP, in-memory)

pub mod analytics;
pub mod http;
pub mod notification;

mod outbound;
mod scripted;

pub use analytics::{HttpAnalyticsSink, InMemoryAnalyticsSink};
pub use notification::{HttpNotificationSink, InMemoryNotificationSink};
