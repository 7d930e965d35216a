//! Subscription task
//!
//! Runs the one-shot setup, then services the gateway forever. Rendering
//! happens inline on this task, one publication at a time.

use std::io::Stdout;

use embassy_time::{Duration, Timer};
use log::*;

use gazette_core::{Delivery, Pipeline, ServiceError, SetupError, WorkerState};

use crate::console::ConsoleSurface;
use crate::gateway::{GatewayError, LoopbackGateway};

/// The device's concrete pipeline
pub type DevicePipeline = Pipeline<LoopbackGateway, ConsoleSurface<Stdout>>;

/// Pause after a gateway error before servicing again
const RETRY_PAUSE: Duration = Duration::from_secs(1);

/// Subscription task - owns the gateway client and the display
#[embassy_executor::task]
pub async fn subscription_task(mut pipeline: DevicePipeline) {
    info!("Subscription task started");

    match pipeline.start().await {
        Ok(id) => info!(
            "Subscribed to '{}' (id {})",
            pipeline.subscription().topic,
            id
        ),
        Err(SetupError::InvalidAddress) => error!(
            "Broker address '{}' is not an IPv6 literal",
            pipeline.broker().address
        ),
        Err(SetupError::Connect(e)) => error!("Connect failed: {:?}", e),
        Err(e) => warn!("Subscribe failed: {:?}", e),
    }

    if pipeline.state() != WorkerState::Subscribed {
        warn!("Running without subscription, nothing will be displayed");
    }

    loop {
        match pipeline.service().await {
            Ok(Delivery::Rendered { topic, len }) => {
                debug!(
                    "Rendered {} bytes from topic {}, cursor at y={}",
                    len,
                    topic,
                    pipeline.handler().cursor().row
                );
            }
            Ok(Delivery::Ignored { topic }) => {
                debug!("Ignoring publication for topic {}", topic);
            }
            Err(ServiceError::Handler(e)) => {
                warn!("Display error: {:?}", e);
            }
            Err(ServiceError::Client(GatewayError::NotConnected)) => {
                trace!("No session, idling");
                Timer::after(RETRY_PAUSE).await;
            }
            Err(ServiceError::Client(e)) => {
                warn!("Gateway error: {:?}", e);
                Timer::after(RETRY_PAUSE).await;
            }
        }
    }
}
