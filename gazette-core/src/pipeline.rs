//! Pipeline assembly
//!
//! Wires a display surface and a messaging client into a ready-to-run
//! subscription worker. The surface is fully initialized (cleared, banner
//! drawn, cursor parked below the header) before the worker exists, so no
//! publication can reach the renderer early.

use gazette_display::{DisplayError, DisplaySurface};

use crate::config::GazetteConfig;
use crate::messaging::MessagingClient;
use crate::render::RenderDispatcher;
use crate::worker::SubscriptionWorker;

/// A worker rendering its subscription onto a surface
pub type Pipeline<C, S> = SubscriptionWorker<C, RenderDispatcher<S>>;

/// Initialize `surface` and build the worker around it
///
/// Fails only if the surface cannot be initialized; callers should treat
/// that as fatal and not start the worker.
pub fn assemble<C, S>(
    config: &GazetteConfig,
    surface: S,
    client: C,
) -> Result<Pipeline<C, S>, DisplayError>
where
    C: MessagingClient,
    S: DisplaySurface,
{
    let mut dispatcher = RenderDispatcher::new(surface, config.display.chunk_policy)?;
    dispatcher.draw_header(&config.display.banner, config.display.banner_y)?;

    Ok(SubscriptionWorker::new(
        client,
        dispatcher,
        config.broker.clone(),
        config.subscription.clone(),
    ))
}
