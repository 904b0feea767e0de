//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the pipeline and the downstream collaborators its handlers talk to.
//!
//! - `AnalyticsSink` - Best-effort analytics event forwarding
//! - `NotificationSink` - Best-effort CRM / sales notifications
//! - `SinkError` - Failure reported by either sink, with retryability

mod analytics_sink;
mod notification_sink;
mod sink_error;

pub use analytics_sink::{AnalyticsEvent, AnalyticsSink};
pub use notification_sink::{Notification, NotificationKind, NotificationSink};
pub use sink_error::{SinkError, SinkErrorCode};
