//! Error types for litra-core.

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HID device communication failure (enumerate, open, write, close).
    #[error("HID error: {0}")]
    Hid(String),

    /// No registered device at the requested position.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// Value cannot be represented in the command packet.
    #[error("value out of range: {field} = {value} (allowed {min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Persisted state could not be located, read, parsed or written.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
