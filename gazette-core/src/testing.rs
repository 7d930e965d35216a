//! Test doubles shared by the unit tests

use core::net::SocketAddrV6;

use heapless::{Deque, String, Vec};

use crate::messaging::{MessagingClient, Publication, Qos, Session, TopicId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    Unreachable,
    Rejected,
    Idle,
}

/// Scripted client: fixed setup results and a queue of publications
pub struct MockClient {
    pub connect_result: Result<(), MockError>,
    pub subscribe_result: Result<TopicId, MockError>,
    pub connects: u8,
    pub subscribes: u8,
    pub will: Option<(String<64>, Vec<u8, 32>)>,
    pub inbox: Deque<(TopicId, Vec<u8, 64>), 8>,
    pub current: Vec<u8, 64>,
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            connect_result: Ok(()),
            subscribe_result: Ok(7),
            connects: 0,
            subscribes: 0,
            will: None,
            inbox: Deque::new(),
            current: Vec::new(),
        }
    }

    pub fn publish(&mut self, topic: TopicId, payload: &[u8]) {
        let payload = Vec::from_slice(payload).unwrap();
        self.inbox.push_back((topic, payload)).unwrap();
    }
}

impl MessagingClient for MockClient {
    type Error = MockError;

    async fn connect(
        &mut self,
        _gateway: SocketAddrV6,
        session: &Session<'_>,
    ) -> Result<(), Self::Error> {
        self.connects += 1;
        self.will = session.will.map(|will| {
            (
                String::try_from(will.topic).unwrap(),
                Vec::from_slice(will.message).unwrap(),
            )
        });
        self.connect_result
    }

    async fn subscribe(&mut self, _topic: &str, _qos: Qos) -> Result<TopicId, Self::Error> {
        self.subscribes += 1;
        self.subscribe_result
    }

    async fn next_publication(&mut self) -> Result<Publication<'_>, Self::Error> {
        let (topic, payload) = self.inbox.pop_front().ok_or(MockError::Idle)?;
        self.current = payload;
        Ok(Publication {
            topic,
            payload: &self.current,
        })
    }
}
