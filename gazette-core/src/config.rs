//! Configuration type definitions
//!
//! These types describe the device configuration: where the gateway is,
//! which topic to follow and how text is laid out on the screen. Defaults
//! match the reference TFT application.

use core::net::{Ipv6Addr, SocketAddrV6};

use gazette_display::Geometry;
use heapless::String;

use crate::messaging::{Qos, TopicName};
use crate::paginate::ChunkPolicy;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum length of an IPv6 address literal
pub const MAX_ADDRESS_LEN: usize = 45;

/// Maximum client identifier length (MQTT-SN limit)
pub const MAX_CLIENT_ID_LEN: usize = 23;

/// Maximum presence message length
pub const MAX_PRESENCE_LEN: usize = 32;

/// Maximum banner length
pub const MAX_BANNER_LEN: usize = 32;

/// Broker (gateway) connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BrokerConfig {
    /// IPv6 address literal of the gateway
    pub address: String<MAX_ADDRESS_LEN>,
    /// UDP port of the gateway
    pub port: u16,
    /// Client identifier presented on connect
    pub client_id: String<MAX_CLIENT_ID_LEN>,
    /// Keep-alive period in seconds
    pub keepalive_s: u16,
}

impl BrokerConfig {
    /// Parse the configured gateway endpoint
    pub fn gateway(&self) -> Option<SocketAddrV6> {
        let addr: Ipv6Addr = self.address.as_str().parse().ok()?;
        Some(SocketAddrV6::new(addr, self.port, 0, 0))
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            address: fixed("fec0:affe::1"),
            port: 1885,
            client_id: fixed("gertrud"),
            keepalive_s: 360,
        }
    }
}

/// Subscription settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SubscriptionConfig {
    /// Topic whose publications are rendered
    pub topic: TopicName,
    /// Requested delivery guarantee
    pub qos: Qos,
    /// Presence message announced on the topic when connecting
    pub presence_message: String<MAX_PRESENCE_LEN>,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            topic: fixed("tft"),
            qos: Qos::AtMostOnce,
            presence_message: fixed("connected"),
        }
    }
}

/// Text layout settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplayConfig {
    /// Line height in pixels
    pub font_height: u16,
    /// Line the cursor may reach before the screen wraps
    pub max_lines: u16,
    /// Characters per line
    pub max_width_chars: u16,
    /// Lines reserved for the static header
    pub header_lines: u16,
    /// Left margin in pixels
    pub text_x: u16,
    /// Horizontal size of one character cell in pixels
    pub cell_width: u16,
    /// Header banner text
    pub banner: String<MAX_BANNER_LEN>,
    /// Vertical position of the banner in pixels
    pub banner_y: u16,
    /// When to stop cutting payloads into lines
    pub chunk_policy: ChunkPolicy,
}

impl DisplayConfig {
    /// Pixel geometry described by this configuration
    pub fn geometry(&self) -> Geometry {
        Geometry::from_lines(
            self.font_height,
            self.max_lines,
            self.max_width_chars,
            self.header_lines,
            self.text_x,
        )
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            font_height: 20,
            max_lines: 12,
            max_width_chars: 20,
            header_lines: 5,
            text_x: 10,
            cell_width: 16,
            banner: fixed("MQTT-SN example app"),
            banner_y: 80,
            chunk_policy: ChunkPolicy::Compatible,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GazetteConfig {
    pub broker: BrokerConfig,
    pub subscription: SubscriptionConfig,
    pub display: DisplayConfig,
}

/// Build a fixed-capacity string from a literal, truncating if needed
fn fixed<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for ch in s.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_layout() {
        let config = GazetteConfig::default();
        assert_eq!(config.display.geometry(), Geometry::reference());
        assert_eq!(config.display.chunk_policy, ChunkPolicy::Compatible);
        assert_eq!(config.subscription.qos, Qos::AtMostOnce);
        assert_eq!(config.subscription.presence_message.as_str(), "connected");
        assert_eq!(config.broker.client_id.as_str(), "gertrud");
    }

    #[test]
    fn test_gateway_parses_ipv6_literal() {
        let broker = BrokerConfig::default();
        let gateway = broker.gateway().unwrap();
        assert_eq!(gateway.port(), 1885);
        assert_eq!(
            *gateway.ip(),
            Ipv6Addr::new(0xfec0, 0xaffe, 0, 0, 0, 0, 0, 1)
        );
    }

    #[test]
    fn test_gateway_rejects_ipv4_and_garbage() {
        let mut broker = BrokerConfig::default();
        broker.address = fixed("192.168.1.1");
        assert_eq!(broker.gateway(), None);

        broker.address = fixed("not-an-address");
        assert_eq!(broker.gateway(), None);
    }

    #[test]
    fn test_fixed_truncates() {
        let s: String<4> = fixed("gazette");
        assert_eq!(s.as_str(), "gaze");
    }
}
