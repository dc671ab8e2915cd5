//! MIDI output transport
//!
//! Wraps a midir output connection behind a small sink trait so the
//! transmitter can be tested against an in-memory recorder.

use anyhow::{anyhow, Context, Result};
use midir::{MidiOutput, MidiOutputConnection, MidiOutputPort};
use tracing::debug;

/// Ordered-byte sink for complete MIDI messages
///
/// One call carries one whole message (a 3-byte CC or a full SysEx frame).
/// Fire-and-forget: no acknowledgement is expected from the device.
pub trait MidiSink {
    fn send(&mut self, message: &[u8]) -> Result<()>;
}

/// midir-backed sink bound to one output port
pub struct MidiPortSink {
    conn: MidiOutputConnection,
    port_name: String,
}

impl MidiPortSink {
    /// Open the first output port whose name contains `pattern`
    pub fn open(pattern: &str) -> Result<Self> {
        let midi_out = MidiOutput::new("TrackColor-GW-Output")
            .context("Failed to create MIDI output")?;

        let (port, port_name) = find_output_port(&midi_out, pattern)
            .ok_or_else(|| anyhow!("Output port '{}' not found", pattern))?;

        debug!("Connecting to output port: {}", port_name);

        let conn = midi_out
            .connect(&port, "TrackColor-GW")
            .map_err(|e| anyhow!("Failed to connect to output port: {}", e))?;

        Ok(Self { conn, port_name })
    }

    /// Resolved name of the connected port
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

impl MidiSink for MidiPortSink {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        debug!("TX -> {}: {}", self.port_name, format_hex(message));
        self.conn
            .send(message)
            .map_err(|e| anyhow!("MIDI send failed: {}", e))
    }
}

/// Find an output port by substring match (Windows-friendly)
fn find_output_port(midi_out: &MidiOutput, pattern: &str) -> Option<(MidiOutputPort, String)> {
    for port in midi_out.ports() {
        if let Ok(name) = midi_out.port_name(&port) {
            // Case-insensitive substring match
            if name.to_lowercase().contains(&pattern.to_lowercase()) {
                debug!("Found port '{}' matching pattern '{}'", name, pattern);
                return Some((port, name));
            }
        }
    }
    None
}

/// List available MIDI output ports
pub fn list_output_ports() -> Result<Vec<String>> {
    let midi_out = MidiOutput::new("TrackColor-GW-Scanner")?;

    let mut port_names = Vec::new();
    for port in midi_out.ports() {
        if let Ok(name) = midi_out.port_name(&port) {
            port_names.push(name);
        }
    }

    Ok(port_names)
}

/// Print available output ports for the `--list-ports` flag
pub fn list_ports_formatted() {
    use colored::*;

    println!("\n{}", "=== Available MIDI Ports ===".bold().cyan());

    println!("\n{}", "Output Ports:".bold());
    match list_output_ports() {
        Ok(outputs) if outputs.is_empty() => {
            println!("  {}", "No output ports found".dimmed());
        }
        Ok(outputs) => {
            for name in outputs {
                println!("  {}", name);
            }
        }
        Err(e) => {
            println!("  {}", format!("Failed to enumerate ports: {}", e).red());
        }
    }
    println!();
}

/// Format MIDI bytes as hex string for debugging
pub fn format_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
