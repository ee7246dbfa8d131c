//! Observability module
//!
//! Logging and the structured playback event stream.

pub mod events;
pub mod logging;

pub use events::{Event, EventEmitter};
pub use logging::{LogFormat, LoggingOptions, init_logging};
