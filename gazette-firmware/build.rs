//! Build script for gazette-firmware
//!
//! Validates device.toml at compile time so a broken configuration fails
//! the build instead of silently falling back to defaults on the device.

use std::fs;
use std::net::Ipv6Addr;
use std::path::Path;

/// Longest topic name the subscription table stores
const MAX_TOPIC_LEN: usize = 64;

/// Longest line the renderer produces
const MAX_LINE_CHARS: i64 = 64;

/// Text rows of the console surface (console::CONSOLE_ROWS)
const CONSOLE_ROWS: i64 = 16;

fn main() {
    println!("cargo:rerun-if-changed=device.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("device.toml");
    if !config_path.exists() {
        fail("device.toml not found", "The firmware embeds device.toml; create one next to Cargo.toml.");
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read device.toml", &e.to_string()),
    };

    let config: toml::Table = match toml::from_str(&content) {
        Ok(table) => table,
        Err(e) => fail("Invalid TOML syntax in device.toml", &e.to_string()),
    };

    validate_broker(&config);
    validate_subscription(&config);
    validate_display(&config);
}

fn validate_broker(config: &toml::Table) {
    let Some(broker) = config.get("broker").and_then(|v| v.as_table()) else {
        return;
    };

    if let Some(address) = broker.get("address") {
        let valid = address
            .as_str()
            .map(|s| s.parse::<Ipv6Addr>().is_ok())
            .unwrap_or(false);
        if !valid {
            fail(
                "Invalid [broker] address",
                &format!("{address} is not an IPv6 address literal"),
            );
        }
    }

    if let Some(port) = broker.get("port").and_then(|v| v.as_integer()) {
        if !(1..=65535).contains(&port) {
            fail("Invalid [broker] port", &format!("{port} is out of range"));
        }
    }

    if let Some(client_id) = broker.get("client_id").and_then(|v| v.as_str()) {
        if client_id.is_empty() || client_id.len() > 23 {
            fail(
                "Invalid [broker] client_id",
                "client_id must be 1 to 23 characters",
            );
        }
    }
}

fn validate_subscription(config: &toml::Table) {
    let Some(subscription) = config.get("subscription").and_then(|v| v.as_table()) else {
        return;
    };

    if let Some(topic) = subscription.get("topic").and_then(|v| v.as_str()) {
        if topic.is_empty() || topic.len() > MAX_TOPIC_LEN {
            fail(
                "Invalid [subscription] topic",
                &format!("topic must be 1 to {MAX_TOPIC_LEN} bytes"),
            );
        }
    }

    if let Some(qos) = subscription.get("qos").and_then(|v| v.as_str()) {
        if !matches!(qos, "at_most_once" | "at_least_once" | "exactly_once") {
            fail("Invalid [subscription] qos", &format!("unknown qos '{qos}'"));
        }
    }
}

fn validate_display(config: &toml::Table) {
    let Some(display) = config.get("display").and_then(|v| v.as_table()) else {
        return;
    };

    let int = |key: &str| display.get(key).and_then(|v| v.as_integer());

    for key in ["font_height", "max_lines", "max_width_chars"] {
        if int(key) == Some(0) {
            fail("Invalid [display] layout", &format!("{key} must be non-zero"));
        }
    }

    if let Some(width) = int("max_width_chars") {
        if width > MAX_LINE_CHARS {
            fail(
                "Invalid [display] max_width_chars",
                &format!("at most {MAX_LINE_CHARS} characters per line"),
            );
        }
    }

    // The lowest body line is drawn on row max_lines
    if let Some(max) = int("max_lines") {
        if max >= CONSOLE_ROWS {
            fail(
                "Invalid [display] max_lines",
                &format!("max_lines must be below {CONSOLE_ROWS} console rows"),
            );
        }
    }

    let font_height = int("font_height").unwrap_or(20);
    let max_lines = int("max_lines").unwrap_or(12);
    let below_wrap = max_lines
        .checked_mul(font_height)
        .and_then(|height| height.checked_add(font_height));
    if below_wrap.map_or(true, |y| y > i64::from(u16::MAX)) {
        fail(
            "Invalid [display] layout",
            "max_lines * font_height leaves no room below the wrap point",
        );
    }

    if let (Some(header), Some(max)) = (int("header_lines"), int("max_lines")) {
        if header > max {
            fail(
                "Invalid [display] header_lines",
                "header_lines must not exceed max_lines",
            );
        }
    }

    if let Some(policy) = display.get("chunk_policy").and_then(|v| v.as_str()) {
        if !matches!(policy, "compatible" | "complete") {
            fail(
                "Invalid [display] chunk_policy",
                &format!("unknown chunk_policy '{policy}'"),
            );
        }
    }
}

fn fail(title: &str, detail: &str) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<57}║\n\
        ╚══════════════════════════════════════════════════════════════════╝\n\
        {}\n",
        title, detail
    );
}
