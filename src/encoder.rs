//! Color-to-MIDI wire encoding
//!
//! Pure functions mapping a 24-bit RGB color to the two wire formats the
//! device understands: a six-entry CC nibble sequence and a fixed-format
//! SysEx frame. No state, no I/O.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::config::ProtocolConfig;

/// 24-bit RGB color packed as `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    /// Red channel (bits 16-23)
    pub fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Green channel (bits 8-15)
    pub fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Blue channel (bits 0-7)
    pub fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Pack three 8-bit channels back into a color
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0 & 0xFF_FFFF)
    }
}

/// Failed to parse a `#RRGGBB` color string
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid color '{0}', expected #RRGGBB")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parse `#RRGGBB` or `RRGGBB` hex notation
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        // from_str_radix accepts a leading sign, so gate on hex digits only
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_string()));
        }
        u32::from_str_radix(hex, 16)
            .map(Color)
            .map_err(|_| ParseColorError(s.to_string()))
    }
}

/// Split an 8-bit channel into its low and high nibble: `(v & 0x0F, v >> 4)`
///
/// Total over the input domain; both outputs are in 0-15.
pub fn channel_nibbles(v: u8) -> (u8, u8) {
    (v & 0x0F, v >> 4)
}

/// Encode a color as six `(controller, value)` CC entries
///
/// Order is R-lo, R-hi, G-lo, G-hi, B-lo, B-hi with the controller numbers
/// taken from the protocol config. Every value is a nibble (0-15).
pub fn encode_cc(color: Color, proto: &ProtocolConfig) -> Vec<(u8, u8)> {
    let channels = [
        (color.r(), proto.cc_r_lo, proto.cc_r_hi),
        (color.g(), proto.cc_g_lo, proto.cc_g_hi),
        (color.b(), proto.cc_b_lo, proto.cc_b_hi),
    ];

    let mut entries = Vec::with_capacity(6);
    for (value, cc_lo, cc_hi) in channels {
        let (lo, hi) = channel_nibbles(value);
        entries.push((cc_lo, lo));
        entries.push((cc_hi, hi));
    }
    entries
}

/// Encode a color as a complete 8-byte SysEx frame
///
/// Layout: start, manufacturer id, command, four 7-bit data groups
/// (little-endian), end. Fixed format, no length field.
pub fn encode_sysex(color: Color, proto: &ProtocolConfig) -> Vec<u8> {
    let c = color.0;
    vec![
        proto.sysex_start,
        proto.sysex_manufacturer_id,
        proto.sysex_command,
        (c & 0x7F) as u8,
        ((c >> 7) & 0x7F) as u8,
        ((c >> 14) & 0x7F) as u8,
        ((c >> 21) & 0x7F) as u8,
        proto.sysex_end,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn proto() -> ProtocolConfig {
        ProtocolConfig::default()
    }

    #[test]
    fn test_channel_extraction() {
        let c = Color(0x12_34_56);
        assert_eq!(c.r(), 0x12);
        assert_eq!(c.g(), 0x34);
        assert_eq!(c.b(), 0x56);
    }

    #[test]
    fn test_nibble_split_roundtrip_exhaustive() {
        for v in 0..=255u8 {
            let (lo, hi) = channel_nibbles(v);
            assert!(lo <= 15);
            assert!(hi <= 15);
            assert_eq!(lo | (hi << 4), v);
        }
    }

    #[test]
    fn test_encode_cc_black() {
        let entries = encode_cc(Color(0x000000), &proto());
        assert_eq!(
            entries,
            vec![(101, 0), (100, 0), (103, 0), (102, 0), (105, 0), (104, 0)]
        );
    }

    #[test]
    fn test_encode_cc_white() {
        let entries = encode_cc(Color(0xFFFFFF), &proto());
        assert_eq!(entries.len(), 6);
        for (_, value) in &entries {
            assert_eq!(*value, 15);
        }
    }

    #[test]
    fn test_encode_cc_shape() {
        let entries = encode_cc(Color(0xA1B2C3), &proto());
        assert_eq!(entries.len(), 6);
        for (cc, value) in entries {
            assert!((100..=105).contains(&cc));
            assert!(value <= 15);
        }
    }

    #[test]
    fn test_encode_sysex_black() {
        let frame = encode_sysex(Color(0x000000), &proto());
        assert_eq!(frame, vec![0xF0, 100, 0x01, 0, 0, 0, 0, 0xF7]);
    }

    #[test]
    fn test_encode_sysex_white() {
        // 0xFFFFFF >> 21 leaves only the top 3 bits of a 24-bit value
        let frame = encode_sysex(Color(0xFFFFFF), &proto());
        assert_eq!(frame, vec![0xF0, 100, 0x01, 0x7F, 0x7F, 0x7F, 0x07, 0xF7]);
    }

    #[test]
    fn test_encode_sysex_framing() {
        for color in [0x000000, 0x123456, 0xFFFFFF] {
            let frame = encode_sysex(Color(color), &proto());
            assert_eq!(frame.len(), 8);
            assert_eq!(frame[0], 0xF0);
            assert_eq!(frame[1], 100);
            assert_eq!(frame[2], 0x01);
            assert_eq!(frame[7], 0xF7);
        }
    }

    #[test]
    fn test_encoder_idempotence() {
        let c = Color(0x8040C0);
        assert_eq!(encode_cc(c, &proto()), encode_cc(c, &proto()));
        assert_eq!(encode_sysex(c, &proto()), encode_sysex(c, &proto()));
    }

    #[test]
    fn test_color_parse() {
        assert_eq!("#FF8000".parse::<Color>().unwrap(), Color(0xFF8000));
        assert_eq!("ff8000".parse::<Color>().unwrap(), Color(0xFF8000));
        assert!("#FF80".parse::<Color>().is_err());
        assert!("#GGGGGG".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
        // Signs are 6 characters long but not colors
        assert!("+12345".parse::<Color>().is_err());
        assert!("-12345".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color(0x00FF00).to_string(), "#00FF00");
    }

    proptest! {
        #[test]
        fn prop_channel_roundtrip(c in 0u32..=0xFF_FFFF) {
            let color = Color(c);
            let rebuilt = Color::from_rgb(color.r(), color.g(), color.b());
            prop_assert_eq!(rebuilt.0, c);
        }

        #[test]
        fn prop_sysex_data_bytes_are_7bit(c in 0u32..=0xFF_FFFF) {
            let frame = encode_sysex(Color(c), &proto());
            for byte in &frame[3..7] {
                prop_assert!(*byte <= 0x7F);
            }
        }

        #[test]
        fn prop_sysex_data_rebuilds_color(c in 0u32..=0xFF_FFFF) {
            let frame = encode_sysex(Color(c), &proto());
            let rebuilt = (frame[3] as u32)
                | ((frame[4] as u32) << 7)
                | ((frame[5] as u32) << 14)
                | ((frame[6] as u32) << 21);
            prop_assert_eq!(rebuilt, c);
        }

        #[test]
        fn prop_cc_values_are_nibbles(c in 0u32..=0xFF_FFFF) {
            for (cc, value) in encode_cc(Color(c), &ProtocolConfig::default()) {
                prop_assert!((100..=105).contains(&cc));
                prop_assert!(value <= 15);
            }
        }
    }
}
