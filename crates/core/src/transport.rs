//! HID transport abstraction for device communication.
//!
//! Provides a trait-based transport layer so that real HID devices and
//! mock devices share the same interface.

use crate::error::{Error, Result};
use std::ffi::CString;
use tracing::{debug, trace};

/// Read timeout for device responses. Responses are currently never read.
pub const READ_TIMEOUT_MS: i32 = 3000;

/// An enumerated HID interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HidDescriptor {
    pub vendor_id: u16,
    pub product_id: u16,
    /// HID usage, when the platform reports one.
    pub usage: Option<u16>,
    pub serial_number: Option<String>,
    pub product_string: Option<String>,
    /// Platform path used to open this exact interface.
    pub path: String,
}

/// Enumerates HID interfaces and opens them by path.
pub trait HidBackend {
    /// List interfaces matching a vendor and product ID.
    fn enumerate(&self, vendor_id: u16, product_id: u16) -> Result<Vec<HidDescriptor>>;

    /// Open one interface by its platform path.
    fn open_path(&self, path: &str) -> Result<Box<dyn HidHandle>>;
}

/// An open HID interface.
pub trait HidHandle {
    /// Write a raw output report. Returns the number of bytes written.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Release the OS handle.
    fn close(self: Box<Self>) -> Result<()>;
}

/// Backend over the system HID library.
pub struct HidApiBackend {
    api: hidapi::HidApi,
}

impl HidApiBackend {
    /// Initialize the HID library. Enumerates attached devices once.
    pub fn new() -> Result<Self> {
        let api = hidapi::HidApi::new().map_err(|e| Error::Hid(format!("hidapi init: {e}")))?;
        Ok(Self { api })
    }
}

impl HidBackend for HidApiBackend {
    fn enumerate(&self, vendor_id: u16, product_id: u16) -> Result<Vec<HidDescriptor>> {
        debug!(
            vid = format_args!("0x{:04X}", vendor_id),
            pid = format_args!("0x{:04X}", product_id),
            "Enumerating HID interfaces"
        );
        let descriptors = self
            .api
            .device_list()
            .filter(|info| info.vendor_id() == vendor_id && info.product_id() == product_id)
            .map(|info| HidDescriptor {
                vendor_id: info.vendor_id(),
                product_id: info.product_id(),
                usage: Some(info.usage()),
                serial_number: info.serial_number().map(|s| s.to_string()),
                product_string: info.product_string().map(|s| s.to_string()),
                path: info.path().to_string_lossy().into_owned(),
            })
            .collect();
        Ok(descriptors)
    }

    fn open_path(&self, path: &str) -> Result<Box<dyn HidHandle>> {
        let c_path =
            CString::new(path).map_err(|e| Error::Hid(format!("invalid HID path {path:?}: {e}")))?;
        let device = self
            .api
            .open_path(&c_path)
            .map_err(|e| Error::Hid(format!("open HID device ({path}): {e}")))?;
        debug!(path, "Opened HID device");
        Ok(Box::new(HidApiHandle {
            device,
            path: path.to_string(),
        }))
    }
}

struct HidApiHandle {
    device: hidapi::HidDevice,
    path: String,
}

impl HidHandle for HidApiHandle {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        trace!(
            path = %self.path,
            report_hex = format_args!("{:02X?}", data),
            "HID TX"
        );
        self.device
            .write(data)
            .map_err(|e| Error::Hid(format!("write ({}): {e}", self.path)))
    }

    fn close(self: Box<Self>) -> Result<()> {
        debug!(path = %self.path, "Closing HID device");
        drop(self.device);
        Ok(())
    }
}
