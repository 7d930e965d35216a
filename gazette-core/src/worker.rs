//! Subscription worker
//!
//! Owns the messaging client for the lifetime of the device. Setup runs
//! once: resolve the gateway, open a session announcing presence, register
//! the single subscription. After that the worker is driven by repeated
//! calls to [`SubscriptionWorker::service`], each of which waits for one
//! publication and hands it to the handler on the calling task.
//!
//! Setup failures leave the worker running in a degraded state; it keeps
//! servicing the client but never invokes the handler.

use core::net::SocketAddrV6;

use heapless::Vec;

use crate::config::{BrokerConfig, SubscriptionConfig};
use crate::messaging::{
    MessageHandler, MessagingClient, Qos, Session, Topic, TopicId, TopicName, Will,
};

/// Subscriptions a session may hold
pub const MAX_SUBSCRIPTIONS: usize = 1;

/// Lifecycle of the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WorkerState {
    /// Nothing attempted yet
    Idle,
    /// Session open, no subscription
    Connected,
    /// Session open with an active subscription
    Subscribed,
    /// Gateway unresolvable or connection refused
    Degraded,
}

/// Setup step failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupError<E> {
    /// Gateway address is not a valid IPv6 literal
    InvalidAddress,
    /// Gateway unreachable or session refused
    Connect(E),
    /// Subscribe attempted without an open session
    NotConnected,
    /// Topic name longer than the subscription table allows
    TopicTooLong,
    /// Topic already registered in this session
    AlreadySubscribed,
    /// Session already holds its subscription
    SubscriptionTableFull,
    /// Gateway rejected the subscription
    Subscribe(E),
}

/// Failures while servicing the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceError<C, H> {
    /// Client failed while waiting for a publication
    Client(C),
    /// Handler failed on a delivered publication
    Handler(H),
}

/// Outcome of one [`SubscriptionWorker::service`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Delivery {
    /// Publication matched the subscription and reached the handler
    Rendered { topic: TopicId, len: usize },
    /// Publication for a topic this session is not subscribed to
    Ignored { topic: TopicId },
}

/// Drives one messaging client and its subscription
pub struct SubscriptionWorker<C, H> {
    client: C,
    handler: H,
    broker: BrokerConfig,
    subscription: SubscriptionConfig,
    state: WorkerState,
    active: Vec<Topic, MAX_SUBSCRIPTIONS>,
    delivered: u32,
}

impl<C, H> SubscriptionWorker<C, H>
where
    C: MessagingClient,
    H: MessageHandler,
{
    /// Create an idle worker
    pub fn new(
        client: C,
        handler: H,
        broker: BrokerConfig,
        subscription: SubscriptionConfig,
    ) -> Self {
        Self {
            client,
            handler,
            broker,
            subscription,
            state: WorkerState::Idle,
            active: Vec::new(),
            delivered: 0,
        }
    }

    /// Run the full setup sequence: connect, then subscribe
    ///
    /// Stops at the first failing step; a failed connect never subscribes.
    pub async fn start(&mut self) -> Result<TopicId, SetupError<C::Error>> {
        self.connect().await?;
        self.subscribe().await
    }

    /// Resolve the gateway endpoint from configuration
    pub fn resolve_gateway(&mut self) -> Result<SocketAddrV6, SetupError<C::Error>> {
        match self.broker.gateway() {
            Some(gateway) => Ok(gateway),
            None => {
                self.degrade();
                Err(SetupError::InvalidAddress)
            }
        }
    }

    /// Open a session, announcing presence on the subscription topic
    ///
    /// A successful connect starts a fresh session without subscriptions.
    pub async fn connect(&mut self) -> Result<(), SetupError<C::Error>> {
        let gateway = self.resolve_gateway()?;

        let session = Session {
            client_id: self.broker.client_id.as_str(),
            keepalive_s: self.broker.keepalive_s,
            clean: true,
            will: Some(Will {
                topic: self.subscription.topic.as_str(),
                message: self.subscription.presence_message.as_bytes(),
            }),
        };

        match self.client.connect(gateway, &session).await {
            Ok(()) => {
                self.active.clear();
                self.state = WorkerState::Connected;
                Ok(())
            }
            Err(e) => {
                self.degrade();
                Err(SetupError::Connect(e))
            }
        }
    }

    /// Drop the session's subscriptions and stop delivering
    fn degrade(&mut self) {
        self.active.clear();
        self.state = WorkerState::Degraded;
    }

    /// Subscribe to the configured topic
    pub async fn subscribe(&mut self) -> Result<TopicId, SetupError<C::Error>> {
        let topic = self.subscription.topic.clone();
        let qos = self.subscription.qos;
        self.subscribe_to(&topic, qos).await
    }

    /// Subscribe to `name`
    ///
    /// A session holds at most [`MAX_SUBSCRIPTIONS`]; repeating a topic is
    /// rejected without reaching the client, so delivery is never doubled.
    pub async fn subscribe_to(
        &mut self,
        name: &str,
        qos: Qos,
    ) -> Result<TopicId, SetupError<C::Error>> {
        if !matches!(self.state, WorkerState::Connected | WorkerState::Subscribed) {
            return Err(SetupError::NotConnected);
        }
        if self.active.iter().any(|topic| topic.name.as_str() == name) {
            return Err(SetupError::AlreadySubscribed);
        }
        if self.active.is_full() {
            return Err(SetupError::SubscriptionTableFull);
        }
        let name = TopicName::try_from(name).map_err(|_| SetupError::TopicTooLong)?;

        let id = self
            .client
            .subscribe(name.as_str(), qos)
            .await
            .map_err(SetupError::Subscribe)?;

        // Capacity checked above
        let _ = self.active.push(Topic { name, id, qos });
        self.state = WorkerState::Subscribed;
        Ok(id)
    }

    /// Wait for one publication and dispatch it
    ///
    /// The handler runs to completion before this returns, on the same
    /// task; the payload borrow ends with it. Only a subscribed worker
    /// invokes the handler.
    pub async fn service(&mut self) -> Result<Delivery, ServiceError<C::Error, H::Error>> {
        let publication = self
            .client
            .next_publication()
            .await
            .map_err(ServiceError::Client)?;

        let subscribed = self.state == WorkerState::Subscribed;
        let matching = self.active.iter().find(|t| t.id == publication.topic);
        let Some(topic) = matching.filter(|_| subscribed) else {
            return Ok(Delivery::Ignored {
                topic: publication.topic,
            });
        };

        let id = topic.id;
        let len = publication.payload.len();
        self.handler
            .on_message(topic, publication.payload)
            .map_err(ServiceError::Handler)?;
        self.delivered = self.delivered.wrapping_add(1);

        Ok(Delivery::Rendered { topic: id, len })
    }

    /// Current lifecycle state
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// The active subscription, if any
    pub fn topic(&self) -> Option<&Topic> {
        self.active.first()
    }

    /// Publications handed to the handler so far
    pub fn delivered(&self) -> u32 {
        self.delivered
    }

    /// Broker settings
    pub fn broker(&self) -> &BrokerConfig {
        &self.broker
    }

    /// Subscription settings
    pub fn subscription(&self) -> &SubscriptionConfig {
        &self.subscription
    }

    /// Borrow the handler
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Borrow the client
    pub fn client(&self) -> &C {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockClient, MockError};
    use embassy_futures::block_on;
    use heapless::String;

    /// Handler that remembers what it was given
    #[derive(Default)]
    struct Recorder {
        calls: u8,
        last: heapless::Vec<u8, 64>,
        fail: bool,
    }

    impl MessageHandler for Recorder {
        type Error = ();

        fn on_message(&mut self, _topic: &Topic, payload: &[u8]) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.calls += 1;
            self.last = heapless::Vec::from_slice(payload).map_err(|_| ())?;
            Ok(())
        }
    }

    fn worker(client: MockClient) -> SubscriptionWorker<MockClient, Recorder> {
        SubscriptionWorker::new(
            client,
            Recorder::default(),
            BrokerConfig::default(),
            SubscriptionConfig::default(),
        )
    }

    #[test]
    fn test_start_connects_then_subscribes() {
        let mut worker = worker(MockClient::new());

        let id = block_on(worker.start()).unwrap();

        assert_eq!(id, 7);
        assert_eq!(worker.state(), WorkerState::Subscribed);
        assert_eq!(worker.client().connects, 1);
        assert_eq!(worker.client().subscribes, 1);
        let topic = worker.topic().unwrap();
        assert_eq!(topic.name.as_str(), "tft");
        assert_eq!(topic.qos, Qos::AtMostOnce);
    }

    #[test]
    fn test_connect_announces_presence() {
        let mut worker = worker(MockClient::new());
        block_on(worker.connect()).unwrap();

        let (topic, message) = worker.client().will.clone().unwrap();
        assert_eq!(topic.as_str(), "tft");
        assert_eq!(message.as_slice(), b"connected");
    }

    #[test]
    fn test_invalid_address_degrades_without_connecting() {
        let mut worker = worker(MockClient::new());
        worker.broker.address = String::try_from("fec0::zz").unwrap();

        assert_eq!(block_on(worker.start()), Err(SetupError::InvalidAddress));
        assert_eq!(worker.state(), WorkerState::Degraded);
        assert_eq!(worker.client().connects, 0);
    }

    #[test]
    fn test_connect_failure_skips_subscribe_and_delivery() {
        let mut client = MockClient::new();
        client.connect_result = Err(MockError::Unreachable);
        client.publish(7, b"never shown on screen");
        let mut worker = worker(client);

        assert_eq!(
            block_on(worker.start()),
            Err(SetupError::Connect(MockError::Unreachable))
        );
        assert_eq!(worker.state(), WorkerState::Degraded);
        assert_eq!(worker.client().subscribes, 0);

        // The loop keeps servicing the client, nothing reaches the handler
        assert_eq!(block_on(worker.service()), Ok(Delivery::Ignored { topic: 7 }));
        assert_eq!(
            block_on(worker.service()),
            Err(ServiceError::Client(MockError::Idle))
        );
        assert_eq!(worker.handler().calls, 0);
    }

    #[test]
    fn test_failed_reconnect_stops_delivery() {
        let mut worker = worker(MockClient::new());
        block_on(worker.start()).unwrap();

        worker.client.connect_result = Err(MockError::Unreachable);
        assert_eq!(
            block_on(worker.connect()),
            Err(SetupError::Connect(MockError::Unreachable))
        );
        assert_eq!(worker.state(), WorkerState::Degraded);
        assert!(worker.topic().is_none());

        worker.client.publish(7, b"stale subscription");
        assert_eq!(block_on(worker.service()), Ok(Delivery::Ignored { topic: 7 }));
        assert_eq!(worker.handler().calls, 0);
        assert_eq!(worker.delivered(), 0);
    }

    #[test]
    fn test_unresolvable_gateway_drops_subscription() {
        let mut worker = worker(MockClient::new());
        block_on(worker.start()).unwrap();

        worker.broker.address = String::try_from("not-an-address").unwrap();
        assert_eq!(block_on(worker.connect()), Err(SetupError::InvalidAddress));
        assert!(worker.topic().is_none());

        worker.client.publish(7, b"ignored");
        assert_eq!(block_on(worker.service()), Ok(Delivery::Ignored { topic: 7 }));
        assert_eq!(worker.handler().calls, 0);
    }

    #[test]
    fn test_subscribe_requires_session() {
        let mut worker = worker(MockClient::new());
        assert_eq!(block_on(worker.subscribe()), Err(SetupError::NotConnected));
        assert_eq!(worker.client().subscribes, 0);
    }

    #[test]
    fn test_subscribe_rejection_stays_connected() {
        let mut client = MockClient::new();
        client.subscribe_result = Err(MockError::Rejected);
        let mut worker = worker(client);

        assert_eq!(
            block_on(worker.start()),
            Err(SetupError::Subscribe(MockError::Rejected))
        );
        assert_eq!(worker.state(), WorkerState::Connected);
        assert!(worker.topic().is_none());
    }

    #[test]
    fn test_repeat_subscribe_is_rejected() {
        let mut worker = worker(MockClient::new());
        block_on(worker.start()).unwrap();

        assert_eq!(
            block_on(worker.subscribe()),
            Err(SetupError::AlreadySubscribed)
        );
        assert_eq!(
            block_on(worker.subscribe_to("other", Qos::AtMostOnce)),
            Err(SetupError::SubscriptionTableFull)
        );
        assert_eq!(worker.client().subscribes, 1);
    }

    #[test]
    fn test_reconnect_starts_fresh_session() {
        let mut worker = worker(MockClient::new());
        block_on(worker.start()).unwrap();
        block_on(worker.connect()).unwrap();

        assert_eq!(worker.state(), WorkerState::Connected);
        assert!(worker.topic().is_none());
        assert_eq!(block_on(worker.subscribe()), Ok(7));
        assert_eq!(worker.client().subscribes, 2);
    }

    #[test]
    fn test_long_topic_is_rejected() {
        let mut worker = worker(MockClient::new());
        block_on(worker.connect()).unwrap();

        let long = [b'a'; 65];
        let name = core::str::from_utf8(&long).unwrap();
        assert_eq!(
            block_on(worker.subscribe_to(name, Qos::AtMostOnce)),
            Err(SetupError::TopicTooLong)
        );
    }

    #[test]
    fn test_service_delivers_in_order() {
        let mut client = MockClient::new();
        client.publish(7, b"first");
        client.publish(3, b"elsewhere");
        client.publish(7, b"second");
        let mut worker = worker(client);
        block_on(worker.start()).unwrap();

        assert_eq!(
            block_on(worker.service()),
            Ok(Delivery::Rendered { topic: 7, len: 5 })
        );
        assert_eq!(worker.handler().last.as_slice(), b"first");

        assert_eq!(block_on(worker.service()), Ok(Delivery::Ignored { topic: 3 }));

        assert_eq!(
            block_on(worker.service()),
            Ok(Delivery::Rendered { topic: 7, len: 6 })
        );
        assert_eq!(worker.handler().last.as_slice(), b"second");
        assert_eq!(worker.handler().calls, 2);
        assert_eq!(worker.delivered(), 2);
    }

    #[test]
    fn test_handler_failure_is_reported() {
        let mut client = MockClient::new();
        client.publish(7, b"payload");
        let mut worker = worker(client);
        worker.handler.fail = true;
        block_on(worker.start()).unwrap();

        assert_eq!(block_on(worker.service()), Err(ServiceError::Handler(())));
        assert_eq!(worker.delivered(), 0);
    }
}
