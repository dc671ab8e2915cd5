//! Configuration management for TrackColor GW
//!
//! Handles loading and parsing of YAML configuration files. All MIDI protocol
//! constants live here so tests can substitute alternate controller numbers
//! without touching global state.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub midi: MidiConfig,
    #[serde(default)]
    pub protocol: ProtocolConfig,
    /// Optional append-only log file; absent means file logging is disabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
    /// Master transmit switch; when false no MIDI is produced
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// MIDI port configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MidiConfig {
    /// Output port name pattern (case-insensitive substring match)
    pub output_port: String,
}

/// Wire protocol constants for the color messages
///
/// Controller numbers pair a low and a high nibble per channel:
/// R -> (101, 100), G -> (103, 102), B -> (105, 104).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProtocolConfig {
    #[serde(default = "default_cc_status")]
    pub cc_status: u8,
    #[serde(default = "default_cc_r_lo")]
    pub cc_r_lo: u8,
    #[serde(default = "default_cc_r_hi")]
    pub cc_r_hi: u8,
    #[serde(default = "default_cc_g_lo")]
    pub cc_g_lo: u8,
    #[serde(default = "default_cc_g_hi")]
    pub cc_g_hi: u8,
    #[serde(default = "default_cc_b_lo")]
    pub cc_b_lo: u8,
    #[serde(default = "default_cc_b_hi")]
    pub cc_b_hi: u8,
    #[serde(default = "default_sysex_start")]
    pub sysex_start: u8,
    #[serde(default = "default_sysex_end")]
    pub sysex_end: u8,
    #[serde(default = "default_sysex_manufacturer_id")]
    pub sysex_manufacturer_id: u8,
    #[serde(default = "default_sysex_command")]
    pub sysex_command: u8,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            cc_status: default_cc_status(),
            cc_r_lo: default_cc_r_lo(),
            cc_r_hi: default_cc_r_hi(),
            cc_g_lo: default_cc_g_lo(),
            cc_g_hi: default_cc_g_hi(),
            cc_b_lo: default_cc_b_lo(),
            cc_b_hi: default_cc_b_hi(),
            sysex_start: default_sysex_start(),
            sysex_end: default_sysex_end(),
            sysex_manufacturer_id: default_sysex_manufacturer_id(),
            sysex_command: default_sysex_command(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cc_status() -> u8 {
    0xB0
}

fn default_cc_r_lo() -> u8 {
    101
}

fn default_cc_r_hi() -> u8 {
    100
}

fn default_cc_g_lo() -> u8 {
    103
}

fn default_cc_g_hi() -> u8 {
    102
}

fn default_cc_b_lo() -> u8 {
    105
}

fn default_cc_b_hi() -> u8 {
    104
}

fn default_sysex_start() -> u8 {
    0xF0
}

fn default_sysex_end() -> u8 {
    0xF7
}

fn default_sysex_manufacturer_id() -> u8 {
    100
}

fn default_sysex_command() -> u8 {
    0x01
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let yaml = "midi:\n  output_port: \"loopMIDI\"\n";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.midi.output_port, "loopMIDI");
        assert!(config.enabled);
        assert!(config.log_file.is_none());
        assert_eq!(config.protocol.cc_status, 0xB0);
        assert_eq!(config.protocol.sysex_start, 0xF0);
        assert_eq!(config.protocol.sysex_end, 0xF7);
        assert_eq!(config.protocol.sysex_manufacturer_id, 100);
        assert_eq!(config.protocol.sysex_command, 0x01);
    }

    #[test]
    fn test_default_controller_pairing() {
        let proto = ProtocolConfig::default();
        assert_eq!(
            (proto.cc_r_lo, proto.cc_r_hi),
            (101, 100)
        );
        assert_eq!(
            (proto.cc_g_lo, proto.cc_g_hi),
            (103, 102)
        );
        assert_eq!(
            (proto.cc_b_lo, proto.cc_b_hi),
            (105, 104)
        );
    }

    #[test]
    fn test_overrides() {
        let yaml = r#"
midi:
  output_port: "Device A"
protocol:
  cc_r_lo: 21
  cc_r_hi: 20
  sysex_manufacturer_id: 0x42
log_file: "/tmp/colors.log"
enabled: false
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.protocol.cc_r_lo, 21);
        assert_eq!(config.protocol.cc_r_hi, 20);
        assert_eq!(config.protocol.sysex_manufacturer_id, 0x42);
        // Untouched fields keep their defaults
        assert_eq!(config.protocol.cc_b_lo, 105);
        assert_eq!(config.log_file.as_deref(), Some("/tmp/colors.log"));
        assert!(!config.enabled);
    }
}
