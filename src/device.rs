//! Controller lifecycle tracking
//!
//! At most one controller is bound at a time. The registry follows the
//! platform's hot-plug notifications: the first connected device wins, and
//! button events are filtered by instance id so late events from a device
//! that was unplugged (instance ids are never reused) cannot be attributed
//! to its replacement.

use tracing::{debug, error, info};

use crate::RiffmapError;

/// Identity of a bound controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Platform-assigned id for this connection session, unique until
    /// disconnect and never reused.
    pub instance_id: u32,
    pub name: String,
    pub num_buttons: u32,
}

/// An open controller. Holding the box keeps the platform handle alive;
/// dropping it releases the device.
pub trait DeviceHandle {
    fn info(&self) -> &DeviceInfo;
}

/// Platform side of device enumeration and opening. Implemented by
/// [`SdlBackend`] for real hardware and by fakes in tests.
pub trait DeviceBackend {
    /// Number of devices currently present.
    fn num_devices(&self) -> u32;
    /// Open the device at the given enumeration index.
    fn open(&self, index: u32) -> Result<Box<dyn DeviceHandle>, RiffmapError>;
}

/// Tracks the zero-or-one active controller.
pub struct DeviceRegistry {
    backend: Box<dyn DeviceBackend>,
    active: Option<Box<dyn DeviceHandle>>,
}

impl DeviceRegistry {
    pub fn new(backend: Box<dyn DeviceBackend>) -> Self {
        Self {
            backend,
            active: None,
        }
    }

    /// Startup policy: hardware that is already plugged in never fires an
    /// add event, so bind the first enumerated device immediately.
    pub fn bind_first_connected(&mut self) {
        if self.backend.num_devices() > 0 {
            self.on_device_added(0);
        } else {
            info!("No controller found at startup. Waiting for connection...");
        }
    }

    /// Handle a device-add notification. First-connected wins; while a
    /// device is bound, further adds are ignored.
    pub fn on_device_added(&mut self, index: u32) {
        if self.active.is_some() {
            debug!("Ignoring device at index {}: a controller is already bound", index);
            return;
        }
        match self.backend.open(index) {
            Ok(handle) => {
                info!("Connected: {}", handle.info().name);
                self.active = Some(handle);
            }
            Err(e) => error!("Failed to connect to controller: {}", e),
        }
    }

    /// Handle a device-remove notification. Only a matching instance id
    /// unbinds; removals of other devices are ignored.
    pub fn on_device_removed(&mut self, instance_id: u32) {
        let matches = self
            .active
            .as_ref()
            .map(|handle| handle.info().instance_id == instance_id)
            .unwrap_or(false);
        if matches {
            if let Some(handle) = self.active.take() {
                info!("Disconnected: {}", handle.info().name);
            }
        }
    }

    /// Whether `instance_id` is the bound device. The dispatcher uses this
    /// to drop button events from anything else.
    pub fn is_active(&self, instance_id: u32) -> bool {
        self.active
            .as_ref()
            .map(|handle| handle.info().instance_id == instance_id)
            .unwrap_or(false)
    }

    pub fn active_info(&self) -> Option<&DeviceInfo> {
        self.active.as_ref().map(|handle| handle.info())
    }

    /// Drop the device handle. Called once at shutdown.
    pub fn release(&mut self) {
        if let Some(handle) = self.active.take() {
            info!("Releasing controller: {}", handle.info().name);
        }
    }
}

/// SDL joystick backend.
pub struct SdlBackend {
    subsystem: sdl2::JoystickSubsystem,
}

impl SdlBackend {
    pub fn new(subsystem: sdl2::JoystickSubsystem) -> Self {
        Self { subsystem }
    }
}

struct SdlDevice {
    info: DeviceInfo,
    // Keeps the SDL device open so its events keep flowing.
    _joystick: sdl2::joystick::Joystick,
}

impl DeviceHandle for SdlDevice {
    fn info(&self) -> &DeviceInfo {
        &self.info
    }
}

impl DeviceBackend for SdlBackend {
    fn num_devices(&self) -> u32 {
        self.subsystem.num_joysticks().unwrap_or(0)
    }

    fn open(&self, index: u32) -> Result<Box<dyn DeviceHandle>, RiffmapError> {
        let joystick = self
            .subsystem
            .open(index)
            .map_err(|e| RiffmapError::DeviceOpen {
                index,
                reason: e.to_string(),
            })?;
        let info = DeviceInfo {
            instance_id: joystick.instance_id(),
            name: joystick.name(),
            num_buttons: joystick.num_buttons(),
        };
        Ok(Box::new(SdlDevice {
            info,
            _joystick: joystick,
        }))
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;

    /// Fake backend: a fixed list of openable devices, identified by the
    /// instance id each open will yield.
    pub struct MockBackend {
        pub devices: Vec<u32>,
    }

    struct MockDevice {
        info: DeviceInfo,
    }

    impl DeviceHandle for MockDevice {
        fn info(&self) -> &DeviceInfo {
            &self.info
        }
    }

    impl DeviceBackend for MockBackend {
        fn num_devices(&self) -> u32 {
            self.devices.len() as u32
        }

        fn open(&self, index: u32) -> Result<Box<dyn DeviceHandle>, RiffmapError> {
            let instance_id = *self.devices.get(index as usize).ok_or_else(|| {
                RiffmapError::DeviceOpen {
                    index,
                    reason: "no such device".into(),
                }
            })?;
            Ok(Box::new(MockDevice {
                info: DeviceInfo {
                    instance_id,
                    name: format!("Mock Pad {}", instance_id),
                    num_buttons: 16,
                },
            }))
        }
    }
}
