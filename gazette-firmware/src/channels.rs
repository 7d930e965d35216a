//! Inter-context communication channels
//!
//! The native board has no radio: publications typed on the console are
//! handed to the loopback gateway through this channel. The sender side is
//! a plain std thread, the receiver is the subscription task.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;

use gazette_core::messaging::TopicName;

/// Largest payload the gateway accepts
pub const MAX_PAYLOAD: usize = 256;

/// Channel capacity for inbound publications
pub const INBOUND_CHANNEL_SIZE: usize = 8;

/// A publication waiting to be delivered by the gateway
#[derive(Debug, Clone, Default)]
pub struct InboundPublication {
    pub topic: TopicName,
    pub payload: Vec<u8, MAX_PAYLOAD>,
}

/// Publications on their way to the loopback gateway
pub static INBOUND_CHANNEL: Channel<
    CriticalSectionRawMutex,
    InboundPublication,
    INBOUND_CHANNEL_SIZE,
> = Channel::new();
