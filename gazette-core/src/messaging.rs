//! Messaging client capability
//!
//! The publish/subscribe client is an external collaborator. The pipeline
//! only needs to open a session, register a topic and pull the next inbound
//! publication; everything below that (framing, keep-alive, retransmission,
//! transport) belongs to the client implementation.

use core::fmt::Debug;
use core::net::SocketAddrV6;

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum topic name length
pub const MAX_TOPIC_LEN: usize = 64;

/// Topic name storage
pub type TopicName = String<MAX_TOPIC_LEN>;

/// Broker-assigned short topic identifier
pub type TopicId = u16;

/// Delivery guarantee of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Qos {
    /// No retry, no duplicate suppression
    #[default]
    AtMostOnce,
    /// Retried until acknowledged, may duplicate
    AtLeastOnce,
    /// Four-way handshake, delivered exactly once
    ExactlyOnce,
}

/// Last-will announcement registered with a session
///
/// The reference gateway publishes it as the device's presence message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Will<'a> {
    pub topic: &'a str,
    pub message: &'a [u8],
}

/// Parameters of one connection session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session<'a> {
    /// Client identifier presented to the gateway
    pub client_id: &'a str,
    /// Keep-alive period in seconds
    pub keepalive_s: u16,
    /// Start a clean session, discarding earlier topic registrations
    pub clean: bool,
    /// Optional presence announcement
    pub will: Option<Will<'a>>,
}

/// An active topic subscription
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Topic {
    /// Topic name as subscribed
    pub name: TopicName,
    /// Identifier the gateway assigned to the name
    pub id: TopicId,
    /// Granted delivery guarantee
    pub qos: Qos,
}

/// An inbound publication
///
/// The payload is borrowed from the client's receive buffer and is only
/// valid until the next call into the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Publication<'a> {
    pub topic: TopicId,
    pub payload: &'a [u8],
}

/// Publish/subscribe client consumed by the subscription worker
#[allow(async_fn_in_trait)]
pub trait MessagingClient {
    /// Client-specific failure
    type Error: Debug;

    /// Open a session with the gateway
    async fn connect(&mut self, gateway: SocketAddrV6, session: &Session<'_>)
        -> Result<(), Self::Error>;

    /// Register interest in a topic, returning its identifier
    async fn subscribe(&mut self, topic: &str, qos: Qos) -> Result<TopicId, Self::Error>;

    /// Wait for the next inbound publication
    ///
    /// Services the protocol (keep-alives, acknowledgements) while waiting.
    async fn next_publication(&mut self) -> Result<Publication<'_>, Self::Error>;
}

/// Receiver of publications for the subscribed topic
///
/// Runs on the worker's task; it must return quickly and must not keep the
/// payload past the call.
pub trait MessageHandler {
    /// Handler-specific failure
    type Error: Debug;

    /// Handle one publication
    fn on_message(&mut self, topic: &Topic, payload: &[u8]) -> Result<(), Self::Error>;
}

impl<H: MessageHandler + ?Sized> MessageHandler for &mut H {
    type Error = H::Error;

    fn on_message(&mut self, topic: &Topic, payload: &[u8]) -> Result<(), Self::Error> {
        (**self).on_message(topic, payload)
    }
}
