//! Gazette - MQTT-SN topic display firmware
//!
//! Subscribes to a single topic and prints every publication on a
//! character display, wrapping long payloads into fixed-width lines and
//! paging when the screen fills up.
//!
//! This binary targets the native board: the display is the terminal and
//! publications are typed on stdin (`@topic payload` for other topics).
//! Set `RUST_LOG=debug` to see gateway traffic.

use embassy_executor::Spawner;
use embassy_time::Timer;
use log::*;

mod channels;
mod config;
mod console;
mod gateway;
mod tasks;

use crate::channels::INBOUND_CHANNEL;
use crate::console::ConsoleSurface;
use crate::gateway::LoopbackGateway;

/// Embedded default configuration (compiled into firmware)
/// Edit device.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../device.toml");

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Gazette firmware starting...");

    let config = config::load(EMBEDDED_CONFIG);
    info!(
        "Broker [{}]:{}, topic '{}', {} chars x {} lines",
        config.broker.address,
        config.broker.port,
        config.subscription.topic,
        config.display.max_width_chars,
        config.display.max_lines
    );

    let surface = ConsoleSurface::new(
        config.display.geometry(),
        config.display.cell_width,
        std::io::stdout(),
    );
    let gateway = LoopbackGateway::new(INBOUND_CHANNEL.receiver());

    // Display first; the worker never starts without a usable screen
    let pipeline = match gazette_core::assemble(&config, surface, gateway) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Display init failed: {:?}", e);
            std::process::exit(1);
        }
    };
    info!("Display initialized");

    if let Err(e) = tasks::spawn_console_input(config.subscription.topic.clone()) {
        warn!("No console input: {}", e);
    }

    spawner.spawn(tasks::subscription_task(pipeline)).unwrap();

    info!("All tasks spawned, entering idle loop");

    loop {
        Timer::after_secs(5).await;
        trace!("Main loop heartbeat");
    }
}
