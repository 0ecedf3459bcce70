//! Litra command packets.
//!
//! Every command is a HID++ long report (20 bytes, report ID 0x11) addressed
//! to the device itself (index 0xFF) on the illumination feature slot (0x04):
//!
//! ```text
//! [0x11, 0xFF, 0x04, function_sw, param0, param1, 0x00 x 14]
//! ```
//!
//! Devices answer every write, but the answer is never read.

use crate::error::{Error, Result};

/// HID++ report ID for long messages (20 bytes total).
pub const LONG_REPORT_ID: u8 = 0x11;
/// Long report length (including report ID).
pub const LONG_REPORT_LEN: usize = 20;

/// Device index used for direct (non-receiver) USB devices.
pub const DEVICE_INDEX: u8 = 0xFF;
/// Feature slot the Litra firmware exposes its light controls on.
pub const FEATURE_INDEX: u8 = 0x04;

/// Function/software-ID bytes for each light control.
pub mod functions {
    /// Power on/off.
    pub const POWER: u8 = 0x1C;
    /// Brightness (raw device byte).
    pub const BRIGHTNESS: u8 = 0x4C;
    /// Color temperature in Kelvin.
    pub const TEMPERATURE: u8 = 0x9C;
}

pub const LIGHT_OFF: u8 = 0x00;
pub const LIGHT_ON: u8 = 0x01;

/// Lowest raw brightness the device accepts.
pub const MIN_BRIGHTNESS: u8 = 0x14;
/// Highest raw brightness the device accepts.
pub const MAX_BRIGHTNESS: u8 = 0xFA;

/// Map a 0-100 brightness percentage onto the device's raw 20-250 range.
///
/// Equivalent to `floor(20 + level / 100 * 230)`. The level is not clamped:
/// values outside 0-100 extrapolate past the physical limits.
pub fn adjusted_level(level: i32) -> i64 {
    let span = i64::from(MAX_BRIGHTNESS - MIN_BRIGHTNESS);
    i64::from(MIN_BRIGHTNESS) + (i64::from(level) * span).div_euclid(100)
}

/// A light control command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitraCommand {
    On,
    Off,
    /// Brightness as a 0-100 percentage.
    Brightness(i32),
    /// Color temperature in Kelvin.
    Temperature(u16),
}

impl LitraCommand {
    /// Function byte for this command.
    pub fn function_sw(&self) -> u8 {
        match self {
            Self::On | Self::Off => functions::POWER,
            Self::Brightness(_) => functions::BRIGHTNESS,
            Self::Temperature(_) => functions::TEMPERATURE,
        }
    }

    /// The two parameter bytes following the function byte.
    pub fn params(&self) -> Result<[u8; 2]> {
        match *self {
            Self::On => Ok([LIGHT_ON, 0x00]),
            Self::Off => Ok([LIGHT_OFF, 0x00]),
            Self::Brightness(level) => {
                let adjusted = adjusted_level(level);
                let byte = u8::try_from(adjusted).map_err(|_| Error::OutOfRange {
                    field: "adjusted_brightness",
                    value: adjusted,
                    min: 0,
                    max: i64::from(u8::MAX),
                })?;
                Ok([0x00, byte])
            }
            Self::Temperature(kelvin) => Ok(kelvin.to_be_bytes()),
        }
    }

    /// Encode into a long HID++ report.
    pub fn encode(&self) -> Result<[u8; LONG_REPORT_LEN]> {
        let params = self.params()?;
        let mut buf = [0u8; LONG_REPORT_LEN];
        buf[0] = LONG_REPORT_ID;
        buf[1] = DEVICE_INDEX;
        buf[2] = FEATURE_INDEX;
        buf[3] = self.function_sw();
        buf[4..6].copy_from_slice(&params);
        Ok(buf)
    }
}

impl std::fmt::Display for LitraCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => write!(f, "light on"),
            Self::Off => write!(f, "light off"),
            Self::Brightness(level) => write!(f, "brightness {level}"),
            Self::Temperature(kelvin) => write!(f, "temperature {kelvin}K"),
        }
    }
}
