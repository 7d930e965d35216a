//! Loopback MQTT-SN gateway
//!
//! The native board has no network interface, so the messaging client is a
//! local stand-in: sessions and subscriptions are accepted in-process and
//! publications arrive through `INBOUND_CHANNEL`. Topic names are mapped to
//! short identifiers the way a gateway's REGISTER exchange would.

use core::net::SocketAddrV6;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Receiver;
use heapless::Vec;
use log::*;

use gazette_core::messaging::{MessagingClient, Publication, Qos, Session, TopicId, TopicName};

use crate::channels::{InboundPublication, INBOUND_CHANNEL_SIZE};

/// Topic names the gateway can map to identifiers
pub const MAX_REGISTERED_TOPICS: usize = 8;

/// Inbound channel receiver handed to the gateway
pub type InboundReceiver =
    Receiver<'static, CriticalSectionRawMutex, InboundPublication, INBOUND_CHANNEL_SIZE>;

/// Gateway errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayError {
    /// Operation needs an open session
    NotConnected,
    /// No identifier left for a new topic name
    TopicTableFull,
    /// Topic name longer than a registry entry holds
    TopicTooLong,
}

/// In-process gateway fed by the console
pub struct LoopbackGateway {
    inbound: InboundReceiver,
    session: Option<SocketAddrV6>,
    topics: Vec<TopicName, MAX_REGISTERED_TOPICS>,
    current: InboundPublication,
}

impl LoopbackGateway {
    /// Create a gateway reading publications from `inbound`
    pub fn new(inbound: InboundReceiver) -> Self {
        Self {
            inbound,
            session: None,
            topics: Vec::new(),
            current: InboundPublication::default(),
        }
    }

    /// Identifier for `name`, registering it on first use
    ///
    /// Identifiers start at 1 and follow registration order.
    fn register(&mut self, name: &TopicName) -> Result<TopicId, GatewayError> {
        if let Some(index) = self.topics.iter().position(|t| t == name) {
            return Ok(index as TopicId + 1);
        }
        self.topics
            .push(name.clone())
            .map_err(|_| GatewayError::TopicTableFull)?;
        Ok(self.topics.len() as TopicId)
    }
}

impl MessagingClient for LoopbackGateway {
    type Error = GatewayError;

    async fn connect(
        &mut self,
        gateway: SocketAddrV6,
        session: &Session<'_>,
    ) -> Result<(), Self::Error> {
        info!(
            "Session open: client '{}' at [{}]:{}, keep-alive {}s",
            session.client_id,
            gateway.ip(),
            gateway.port(),
            session.keepalive_s
        );
        if let Some(will) = session.will {
            info!(
                "Presence on '{}': {}",
                will.topic,
                String::from_utf8_lossy(will.message)
            );
        }
        if session.clean {
            self.topics.clear();
        }
        self.session = Some(gateway);
        Ok(())
    }

    async fn subscribe(&mut self, topic: &str, qos: Qos) -> Result<TopicId, Self::Error> {
        if self.session.is_none() {
            return Err(GatewayError::NotConnected);
        }
        let name = TopicName::try_from(topic).map_err(|_| GatewayError::TopicTooLong)?;
        let id = self.register(&name)?;
        debug!("SUBACK '{}' id={} qos={:?}", topic, id, qos);
        Ok(id)
    }

    async fn next_publication(&mut self) -> Result<Publication<'_>, Self::Error> {
        if self.session.is_none() {
            return Err(GatewayError::NotConnected);
        }

        let publication = self.inbound.receive().await;
        let name = publication.topic.clone();
        self.current = publication;
        let topic = self.register(&name)?;

        debug!(
            "got publication for topic '{}' [{}]: {}",
            name,
            topic,
            String::from_utf8_lossy(&self.current.payload)
        );

        Ok(Publication {
            topic,
            payload: &self.current.payload,
        })
    }
}
