pub mod dispatcher;
pub mod envelope;
pub mod redpanda;

pub use dispatcher::{dispatch_committed, BusDispatcher, EventDispatcher, LoggingDispatcher};
pub use redpanda::RedpandaClient;

#[cfg(test)]
pub use dispatcher::RecordingDispatcher;
