//! Color transmitter
//!
//! Reacts to selection changes by encoding the track color and forwarding the
//! resulting messages to the MIDI sink. Each CC value byte is validated
//! against the MIDI data-byte range before it goes out; an invalid value is
//! logged and skipped without aborting the sibling sends.

use thiserror::Error;

use crate::config::ProtocolConfig;
use crate::encoder::{self, Color};
use crate::eventlog::EventLog;
use crate::midi::MidiSink;
use crate::selection::Selection;

/// A message failed validation before send
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransmitError {
    #[error("CC {controller} value {value} is out of valid MIDI range (0-127)")]
    OutOfRange { controller: u8, value: u8 },
}

/// Sends the selected track's color to the device as CC and SysEx
pub struct ColorTransmitter<S: MidiSink> {
    protocol: ProtocolConfig,
    sink: S,
    log: EventLog,
    enabled: bool,
}

impl<S: MidiSink> ColorTransmitter<S> {
    pub fn new(protocol: ProtocolConfig, sink: S, log: EventLog, enabled: bool) -> Self {
        Self {
            protocol,
            sink,
            log,
            enabled,
        }
    }

    /// Toggle the master transmit switch
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.log.info(if enabled {
            "Color transmission enabled."
        } else {
            "Color transmission disabled."
        });
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sole entry point: the host reports a new selection (or none)
    ///
    /// A cleared selection is a silent no-op. Otherwise both wire formats are
    /// sent, then the change is logged with the track name.
    pub fn on_selection_changed(&mut self, selection: Option<&Selection>) {
        let selection = match selection {
            Some(s) => s,
            None => return,
        };

        self.send_cc_color(selection.color);
        self.send_sysex_color(selection.color);

        self.log
            .info(&format!("Track changed to: {}", selection.name));
    }

    /// Send the six-entry CC nibble sequence; skipped entirely when disabled
    fn send_cc_color(&mut self, color: Color) {
        if !self.enabled {
            return;
        }

        for (controller, value) in encoder::encode_cc(color, &self.protocol) {
            self.send_validated_cc(controller, value);
        }
    }

    /// Validate one CC value byte and send it
    ///
    /// The nibble arithmetic cannot produce a value above 15, so the range
    /// check is unreachable today; it stays because the wire protocol, not
    /// the encoder, is the authority on what may be sent.
    fn send_validated_cc(&mut self, controller: u8, value: u8) {
        if let Err(e) = self.check_data_byte(controller, value) {
            self.log.error(&format!("Error: {}.", e));
            return;
        }

        let message = [self.protocol.cc_status, controller, value];
        match self.sink.send(&message) {
            Ok(()) => {
                self.log
                    .info(&format!("Sent CC {} with value {} (RGB).", controller, value));
            }
            Err(e) => self
                .log
                .warn(&format!("Failed to send CC {}: {:#}", controller, e)),
        }
    }

    fn check_data_byte(&self, controller: u8, value: u8) -> Result<(), TransmitError> {
        if value <= 127 {
            Ok(())
        } else {
            Err(TransmitError::OutOfRange { controller, value })
        }
    }

    /// Send the fixed-format SysEx frame; skipped entirely when disabled
    ///
    /// SysEx data bytes are bounded to 7 bits by the encoding shifts, so no
    /// per-byte validation happens here.
    fn send_sysex_color(&mut self, color: Color) {
        if !self.enabled {
            return;
        }

        let frame = encoder::encode_sysex(color, &self.protocol);
        match self.sink.send(&frame) {
            Ok(()) => {
                self.log
                    .info(&format!("Sent 24-bit RGB ({}) via SysEx.", color.0));
            }
            Err(e) => self.log.warn(&format!("Failed to send SysEx: {:#}", e)),
        }
    }
}
