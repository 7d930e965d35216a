//! Board-agnostic core logic for the Gazette display firmware
//!
//! This crate contains the subscribe-and-render pipeline without any
//! dependency on a specific board, network stack or display controller:
//!
//! - Messaging client capability traits (connect, subscribe, deliver)
//! - Subscription worker with its one-shot setup sequence
//! - Payload paginator (fixed-width chunking with vertical wrap)
//! - Render dispatcher applying paginator output to a display surface
//! - Pipeline assembly and configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod messaging;
pub mod paginate;
pub mod pipeline;
pub mod render;
pub mod worker;

#[cfg(test)]
mod testing;

pub use config::GazetteConfig;
pub use messaging::{MessageHandler, MessagingClient, Publication, Qos, Session, Topic, TopicId};
pub use paginate::{paginate, ChunkPolicy, Instruction, Paginate, RenderCursor};
pub use pipeline::{assemble, Pipeline};
pub use render::{RenderDispatcher, RenderSummary};
pub use worker::{Delivery, ServiceError, SetupError, SubscriptionWorker, WorkerState};
