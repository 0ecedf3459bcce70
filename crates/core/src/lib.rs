//! litra-core: Litra device discovery, command encoding, and light state.
//!
//! This crate provides the cross-platform core logic for controlling
//! Logitech Litra Glow and Beam lights via HID++ long reports over USB HID.

pub mod config;
pub mod controller;
pub mod device;
pub mod error;
pub mod hidpp;
pub mod registry;
pub mod transport;

/// Logitech USB Vendor ID.
pub const LOGITECH_VID: u16 = 0x046D;

/// Known Litra product IDs.
pub mod pids {
    /// Litra Glow.
    pub const LITRA_GLOW: u16 = 0xC900;
    /// Litra Beam.
    pub const LITRA_BEAM: u16 = 0xC901;
}
