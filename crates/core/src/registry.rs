//! Registry of discovered Litra devices.
//!
//! Discovery runs once at startup. Entries are keyed by serial number and
//! kept in discovery order; command fan-out walks them by index.

use crate::device::{DiscoveredDevice, LitraProduct};
use crate::error::{Error, Result};
use crate::transport::{HidBackend, HidHandle};
use tracing::{debug, info};

/// Devices found by discovery, in the order they were found.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Vec<DiscoveredDevice>,
}

impl DeviceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry and run discovery against `backend`.
    pub fn discover(backend: &dyn HidBackend) -> Result<Self> {
        let mut registry = Self::new();
        registry.find_devices(backend)?;
        Ok(registry)
    }

    /// Search for Litra devices and register every matching control interface.
    ///
    /// Interfaces with a missing or different HID usage are skipped. Serials
    /// already registered are not added twice.
    pub fn find_devices(&mut self, backend: &dyn HidBackend) -> Result<()> {
        info!("Searching for Litra devices");
        for &product in LitraProduct::ALL {
            for descriptor in backend.enumerate(product.vid(), product.pid())? {
                if !product.matches(&descriptor) {
                    debug!(
                        product = product.name(),
                        usage = ?descriptor.usage,
                        path = %descriptor.path,
                        "Skipping non-control interface"
                    );
                    continue;
                }
                self.insert(DiscoveredDevice::from_descriptor(product, &descriptor));
            }
        }
        debug!(count = self.count(), "Device discovery complete");
        Ok(())
    }

    fn insert(&mut self, device: DiscoveredDevice) {
        if let Some(existing) = self.devices.iter_mut().find(|d| d.serial == device.serial) {
            // same serial seen again: keep its position, refresh its path
            *existing = device;
            return;
        }
        info!(
            device = %device.display_name(),
            serial = %device.serial,
            "Found device"
        );
        self.devices.push(device);
    }

    /// Number of registered devices.
    pub fn count(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Device at `index`, in discovery order.
    pub fn get(&self, index: usize) -> Option<&DiscoveredDevice> {
        self.devices.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiscoveredDevice> {
        self.devices.iter()
    }

    /// Open the device at `index`.
    pub fn setup(&self, backend: &dyn HidBackend, index: usize) -> Result<Box<dyn HidHandle>> {
        if index >= self.count() {
            return Err(Error::DeviceNotFound(format!(
                "no device at index {index} ({} registered)",
                self.count()
            )));
        }
        let device = &self.devices[index];
        debug!(index, path = %device.path, "Setting up device");
        backend.open_path(&device.path)
    }

    /// Close a handle returned by [`setup`](Self::setup).
    pub fn teardown(&self, handle: Box<dyn HidHandle>) -> Result<()> {
        handle.close()
    }
}
