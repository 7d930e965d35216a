//! Configuration loading
//!
//! The device configuration is embedded at build time (and validated by
//! build.rs). Parsing goes through serde into the core configuration types.

use core::fmt;

use gazette_core::GazetteConfig;
use gazette_display::GeometryError;
use log::*;

use crate::console::CONSOLE_ROWS;

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    /// TOML syntax or type error
    Toml(toml::de::Error),
    /// Display layout the renderer cannot use
    Geometry(GeometryError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Toml(e) => write!(f, "invalid TOML: {e}"),
            ConfigError::Geometry(e) => write!(f, "invalid display layout: {e:?}"),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Toml(e)
    }
}

/// Parse a TOML device configuration
///
/// The layout must fit the console's rows. The broker address is not
/// checked here; an unusable address is a setup failure of the subscription
/// worker, not of the configuration.
pub fn parse_config(source: &str) -> Result<GazetteConfig, ConfigError> {
    let config: GazetteConfig = toml::from_str(source)?;
    config
        .display
        .geometry()
        .fits(CONSOLE_ROWS as u16)
        .map_err(ConfigError::Geometry)?;
    Ok(config)
}

/// Load the embedded configuration, falling back to reference defaults
pub fn load(source: &str) -> GazetteConfig {
    match parse_config(source) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            // build.rs should have caught this
            error!("Failed to parse embedded config: {e}");
            error!("Using reference defaults");
            GazetteConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazette_core::{ChunkPolicy, Qos};

    #[test]
    fn test_embedded_config_parses() {
        let config = parse_config(include_str!("../device.toml")).unwrap();
        assert_eq!(config.broker.client_id.as_str(), "gertrud");
        assert_eq!(config.subscription.topic.as_str(), "tft");
        assert_eq!(config.subscription.qos, Qos::AtMostOnce);
        assert_eq!(config.display.chunk_policy, ChunkPolicy::Complete);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = parse_config("[broker]\nport = 10000\n").unwrap();
        assert_eq!(config.broker.port, 10000);
        assert_eq!(config.broker.address.as_str(), "fec0:affe::1");
        assert_eq!(config.display, GazetteConfig::default().display);
    }

    #[test]
    fn test_bad_geometry_is_rejected() {
        let result = parse_config("[display]\nmax_width_chars = 0\n");
        assert!(matches!(
            result,
            Err(ConfigError::Geometry(GeometryError::ZeroLineWidth))
        ));
    }

    #[test]
    fn test_layout_taller_than_console_is_rejected() {
        // Wrap point at row 16 of a 16-row console
        let result = parse_config("[display]\nmax_lines = 16\n");
        assert!(matches!(
            result,
            Err(ConfigError::Geometry(GeometryError::TooManyLines))
        ));

        let config = parse_config("[display]\nmax_lines = 15\n").unwrap();
        assert_eq!(config.display.max_lines, 15);
    }

    #[test]
    fn test_saturated_layout_is_rejected() {
        let result = parse_config("[display]\nmax_lines = 4000\n");
        assert!(matches!(
            result,
            Err(ConfigError::Geometry(GeometryError::TooTall))
        ));
    }

    #[test]
    fn test_overlong_topic_is_rejected() {
        let topic = "t".repeat(65);
        let source = format!("[subscription]\ntopic = \"{topic}\"\n");
        assert!(matches!(parse_config(&source), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_load_falls_back_on_garbage() {
        let config = load("this is = = not toml");
        assert_eq!(config, GazetteConfig::default());
    }
}
