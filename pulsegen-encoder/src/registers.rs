//! Seesaw register map for the Adafruit Quad Rotary Encoder Breakout.
//!
//! Registers are addressed with two bytes: the module ID, then the register
//! offset within the module. Per-encoder registers OR the encoder index into
//! the offset: `[MODULE_ENCODER, ENCODER_POSITION | encoder]`.

// ── Module IDs ───────────────────────────────────────────────────────────

/// Seesaw encoder module identifier.
pub const MODULE_ENCODER: u8 = 0x11;

// ── Encoder module registers ─────────────────────────────────────────────

/// Absolute encoder position (32-bit signed, big-endian).
pub const ENCODER_POSITION: u8 = 0x30;

// ── Protocol constants ───────────────────────────────────────────────────

/// Delay in microseconds the Seesaw firmware needs between the register
/// write and the following read.
pub const SEESAW_DELAY_US: u64 = 125;

/// Default I2C address of the Quad Rotary Encoder Breakout.
pub const DEFAULT_ADDRESS: u8 = 0x49;

/// Number of rotary encoders on the board.
pub const ENCODER_COUNT: usize = 4;

/// Position register of `encoder`, or `None` if the board has no such
/// encoder.
pub const fn position_register(encoder: u8) -> Option<[u8; 2]> {
    if encoder as usize >= ENCODER_COUNT {
        None
    } else {
        Some([MODULE_ENCODER, ENCODER_POSITION | encoder])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_register_ors_in_the_encoder_index() {
        assert_eq!(position_register(0), Some([0x11, 0x30]));
        assert_eq!(position_register(3), Some([0x11, 0x33]));
        assert_eq!(position_register(4), None);
    }
}
