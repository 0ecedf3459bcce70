//! Device model: supported products and discovered devices.

use crate::transport::HidDescriptor;
use crate::{pids, LOGITECH_VID};

/// Supported Litra products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LitraProduct {
    Glow,
    Beam,
}

impl LitraProduct {
    /// All products searched for during discovery, in search order.
    pub const ALL: &'static [LitraProduct] = &[LitraProduct::Glow, LitraProduct::Beam];

    /// Look up product from USB product ID.
    pub fn from_pid(pid: u16) -> Option<Self> {
        match pid {
            pids::LITRA_GLOW => Some(Self::Glow),
            pids::LITRA_BEAM => Some(Self::Beam),
            _ => None,
        }
    }

    /// Short display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Glow => "Glow",
            Self::Beam => "Beam",
        }
    }

    /// USB Vendor ID.
    pub fn vid(&self) -> u16 {
        LOGITECH_VID
    }

    /// USB Product ID.
    pub fn pid(&self) -> u16 {
        match self {
            Self::Glow => pids::LITRA_GLOW,
            Self::Beam => pids::LITRA_BEAM,
        }
    }

    /// HID usage of the interface that accepts light commands.
    ///
    /// The same physical product exposes other interfaces; only this one is used.
    pub fn usage(&self) -> u16 {
        match self {
            Self::Glow | Self::Beam => 0x0202,
        }
    }

    /// Length of the report the device sends back after a command.
    pub fn response_len(&self) -> usize {
        match self {
            Self::Glow => 64,
            Self::Beam => 32,
        }
    }

    /// Whether an enumerated HID interface is this product's control interface.
    pub fn matches(&self, descriptor: &HidDescriptor) -> bool {
        descriptor.vendor_id == self.vid()
            && descriptor.product_id == self.pid()
            && descriptor.usage == Some(self.usage())
    }
}

impl std::fmt::Display for LitraProduct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Litra {}", self.name())
    }
}

/// A Litra device found during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
    /// Registry key: the serial number, or the HID path for devices without one.
    pub serial: String,
    pub path: String,
    pub product: LitraProduct,
    /// Product string reported by the device, if any.
    pub product_string: Option<String>,
}

impl DiscoveredDevice {
    /// Build a registry entry from a matching descriptor.
    pub fn from_descriptor(product: LitraProduct, descriptor: &HidDescriptor) -> Self {
        Self {
            serial: descriptor
                .serial_number
                .clone()
                .unwrap_or_else(|| descriptor.path.clone()),
            path: descriptor.path.clone(),
            product,
            product_string: descriptor.product_string.clone(),
        }
    }

    /// Expected response buffer length for this device.
    pub fn response_len(&self) -> usize {
        self.product.response_len()
    }

    /// Name to show users: the device's own product string, else the product name.
    pub fn display_name(&self) -> String {
        self.product_string
            .clone()
            .unwrap_or_else(|| self.product.to_string())
    }
}
