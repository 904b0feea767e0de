//! Analytics sink adapters.

mod http_sink;
mod in_memory;

pub use http_sink::HttpAnalyticsSink;
pub use in_memory::InMemoryAnalyticsSink;
