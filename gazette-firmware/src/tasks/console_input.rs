//! Console input feeder
//!
//! Reads publications from stdin on a blocking thread and queues them for
//! the loopback gateway. Each line is one payload for the default topic;
//! `@name payload` publishes to `name` instead.

use std::io::BufRead;
use std::thread;

use heapless::Vec;
use log::*;

use gazette_core::messaging::TopicName;

use crate::channels::{InboundPublication, INBOUND_CHANNEL, MAX_PAYLOAD};

/// Turn one console line into a publication
///
/// Returns `None` for an `@` line with an unusable topic name. Payloads
/// longer than [`MAX_PAYLOAD`] are cut.
pub fn parse_line(line: &str, default_topic: &TopicName) -> Option<InboundPublication> {
    let (topic, payload) = match line.strip_prefix('@') {
        Some(rest) => {
            let (name, payload) = rest.split_once(' ').unwrap_or((rest, ""));
            if name.is_empty() {
                return None;
            }
            (TopicName::try_from(name).ok()?, payload)
        }
        None => (default_topic.clone(), line),
    };

    let bytes = payload.as_bytes();
    let bytes = &bytes[..bytes.len().min(MAX_PAYLOAD)];
    let mut buf = Vec::new();
    // Cannot fail, length is clamped above
    let _ = buf.extend_from_slice(bytes);

    Some(InboundPublication {
        topic,
        payload: buf,
    })
}

/// Start the stdin reader thread
pub fn spawn_console_input(default_topic: TopicName) -> std::io::Result<()> {
    thread::Builder::new()
        .name("console-input".into())
        .spawn(move || {
            info!("Console input ready, publishing to '{}'", default_topic);
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("stdin read error: {}", e);
                        break;
                    }
                };
                let Some(publication) = parse_line(&line, &default_topic) else {
                    warn!("Bad topic in '{}', dropping line", line);
                    continue;
                };
                if INBOUND_CHANNEL.try_send(publication).is_err() {
                    warn!("Inbound channel full, dropping publication");
                }
            }
            info!("Console input closed");
        })?;
    Ok(())
}
