//! Execution contexts
//!
//! The subscription task owns the whole render path. The console feeder is
//! a blocking std thread standing in for the radio.

pub mod console_input;
pub mod subscription;

pub use console_input::spawn_console_input;
pub use subscription::{subscription_task, DevicePipeline};
