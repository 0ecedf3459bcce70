//! Light commands fanned out to every registered device.
//!
//! Each command opens, writes and closes every device in discovery order.
//! The first failure aborts the command; later devices are not attempted.
//! Brightness and temperature are recorded in the state store after each
//! device write, so nothing is recorded when no device is attached.

use crate::config::{StateStore, StateUpdate};
use crate::error::Result;
use crate::hidpp::LitraCommand;
use crate::registry::DeviceRegistry;
use crate::transport::HidBackend;
use tracing::{info, trace};

/// Drives all discovered lights through one backend.
pub struct Controller<'a> {
    backend: &'a dyn HidBackend,
    registry: &'a DeviceRegistry,
}

impl<'a> Controller<'a> {
    pub fn new(backend: &'a dyn HidBackend, registry: &'a DeviceRegistry) -> Self {
        Self { backend, registry }
    }

    /// Number of lights commands will reach.
    pub fn count(&self) -> usize {
        self.registry.count()
    }

    pub fn light_on(&self) -> Result<()> {
        self.send(LitraCommand::On)?;
        info!("Light on");
        Ok(())
    }

    pub fn light_off(&self) -> Result<()> {
        self.send(LitraCommand::Off)?;
        info!("Light off");
        Ok(())
    }

    /// Set brightness as a percentage (nominally 1-100, not clamped).
    ///
    /// The stored state keeps `level`, not the raw device value.
    pub fn set_brightness(&self, level: i32, store: &mut dyn StateStore) -> Result<()> {
        self.fan_out(LitraCommand::Brightness(level), || {
            store.update_current_state(StateUpdate::brightness(level))
        })?;
        info!(level, "Brightness set");
        Ok(())
    }

    /// Set color temperature in Kelvin (nominally 2700-6500, not clamped).
    pub fn set_temperature(&self, temp: u16, store: &mut dyn StateStore) -> Result<()> {
        self.fan_out(LitraCommand::Temperature(temp), || {
            store.update_current_state(StateUpdate::temp(temp))
        })?;
        info!(temp, "Temperature set");
        Ok(())
    }

    /// Write one command to every registered device.
    pub fn send(&self, command: LitraCommand) -> Result<()> {
        self.fan_out(command, || Ok(()))
    }

    fn fan_out(
        &self,
        command: LitraCommand,
        mut after_write: impl FnMut() -> Result<()>,
    ) -> Result<()> {
        let packet = command.encode()?;
        for index in 0..self.registry.count() {
            let mut handle = self.registry.setup(self.backend, index)?;
            trace!(
                index,
                command = %command,
                report_hex = format_args!("{:02X?}", packet),
                "Litra TX"
            );
            handle.write(&packet)?;
            after_write()?;
            self.registry.teardown(handle)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryStore;
    use crate::error::Error;
    use crate::pids::LITRA_GLOW;
    use crate::transport::mock::{MockBackend, MockEvent};

    fn one_light() -> (MockBackend, DeviceRegistry) {
        let backend = MockBackend::new().with_litra(LITRA_GLOW, "G1", "/dev/hidraw1");
        let registry = DeviceRegistry::discover(&backend).unwrap();
        (backend, registry)
    }

    #[test]
    fn light_off_writes_power_packet() {
        let (backend, registry) = one_light();
        Controller::new(&backend, &registry).light_off().unwrap();
        let writes = backend.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(&writes[0].1[..6], &[0x11, 0xFF, 0x04, 0x1C, 0x00, 0x00]);
    }

    #[test]
    fn each_write_is_bracketed_by_open_and_close() {
        let (backend, registry) = one_light();
        Controller::new(&backend, &registry).light_on().unwrap();
        let events = backend.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], MockEvent::Open("/dev/hidraw1".into()));
        assert!(matches!(events[1], MockEvent::Write(..)));
        assert_eq!(events[2], MockEvent::Close("/dev/hidraw1".into()));
    }

    #[test]
    fn set_temperature_updates_store() {
        let (backend, registry) = one_light();
        let mut store = MemoryStore::default();
        Controller::new(&backend, &registry)
            .set_temperature(2700, &mut store)
            .unwrap();
        assert_eq!(&backend.writes()[0].1[3..6], &[0x9C, 0x0A, 0x8C]);
        assert_eq!(store.state.temp, Some(2700));
        assert_eq!(store.state.brightness, None);
    }

    #[test]
    fn no_devices_records_nothing() {
        let backend = MockBackend::new();
        let registry = DeviceRegistry::discover(&backend).unwrap();
        let mut store = MemoryStore::default();
        let controller = Controller::new(&backend, &registry);
        assert_eq!(controller.count(), 0);
        controller.set_brightness(30, &mut store).unwrap();
        assert!(backend.events().is_empty());
        assert_eq!(store.state.brightness, None);
    }

    #[test]
    fn unencodable_brightness_opens_nothing() {
        let (backend, registry) = one_light();
        let mut store = MemoryStore::default();
        let result = Controller::new(&backend, &registry).set_brightness(500, &mut store);
        assert!(matches!(result, Err(Error::OutOfRange { .. })));
        assert!(backend.events().is_empty());
        assert_eq!(store.state.brightness, None);
    }

    #[test]
    fn write_failure_skips_state_update() {
        let (backend, registry) = one_light();
        backend.fail_write("/dev/hidraw1");
        let mut store = MemoryStore::default();
        let result = Controller::new(&backend, &registry).set_brightness(50, &mut store);
        assert!(matches!(result, Err(Error::Hid(_))));
        assert_eq!(store.state.brightness, None);
    }
}
