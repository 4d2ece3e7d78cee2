//! The event dispatch loop
//!
//! Drains the platform event queue, routes hot-plug notifications to the
//! device registry and button events through the mapping table to the
//! injector. The loop is poll-based: drain whatever is queued, sleep
//! ~10 ms, check the shutdown flag, repeat. Nothing in an iteration blocks
//! indefinitely, so cancellation is observed within one tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use sdl2::event::Event;
use tracing::{debug, error, info};

use crate::device::DeviceRegistry;
use crate::injector::Injector;
use crate::mapping::{button_label, ButtonId, MappingTable};

/// How long the loop idles when the queue is empty.
const IDLE_TICK: Duration = Duration::from_millis(10);

/// A raw input occurrence, consumed once by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchEvent {
    /// A device appeared at the given enumeration index.
    DeviceAdded { index: u32 },
    /// The device with the given instance id went away.
    DeviceRemoved { instance_id: u32 },
    ButtonDown { instance_id: u32, button: ButtonId },
    ButtonUp { instance_id: u32, button: ButtonId },
    Quit,
}

impl DispatchEvent {
    /// Translate the SDL events this loop cares about; everything else
    /// (axis motion, window events) is discarded.
    pub fn from_sdl(event: &Event) -> Option<Self> {
        match *event {
            Event::JoyDeviceAdded { which, .. } => Some(DispatchEvent::DeviceAdded { index: which }),
            Event::JoyDeviceRemoved { which, .. } => {
                Some(DispatchEvent::DeviceRemoved { instance_id: which })
            }
            Event::JoyButtonDown {
                which, button_idx, ..
            } => Some(DispatchEvent::ButtonDown {
                instance_id: which,
                button: button_idx,
            }),
            Event::JoyButtonUp {
                which, button_idx, ..
            } => Some(DispatchEvent::ButtonUp {
                instance_id: which,
                button: button_idx,
            }),
            Event::Quit { .. } => Some(DispatchEvent::Quit),
            _ => None,
        }
    }
}

/// Routes events between the registry, the mapping table and the injector.
pub struct Dispatcher<I: Injector> {
    registry: DeviceRegistry,
    table: MappingTable,
    injector: I,
}

impl<I: Injector> Dispatcher<I> {
    pub fn new(registry: DeviceRegistry, table: MappingTable, injector: I) -> Self {
        Self {
            registry,
            table,
            injector,
        }
    }

    /// Process one event. Returns `false` when shutdown was requested.
    ///
    /// Button-up is resolved against the table at release time, not cached
    /// from the press: if the mapping is edited while a button is held the
    /// release follows the new action, which can momentarily desync a
    /// key's press/release pairing. Known limitation.
    pub fn handle(&mut self, event: DispatchEvent) -> bool {
        match event {
            DispatchEvent::Quit => {
                info!("Quit requested");
                return false;
            }
            DispatchEvent::DeviceAdded { index } => {
                debug!("New device detected: index {}", index);
                self.registry.on_device_added(index);
            }
            DispatchEvent::DeviceRemoved { instance_id } => {
                debug!("Device removed: instance {}", instance_id);
                self.registry.on_device_removed(instance_id);
            }
            DispatchEvent::ButtonDown {
                instance_id,
                button,
            } => self.route_button(instance_id, button, true),
            DispatchEvent::ButtonUp {
                instance_id,
                button,
            } => self.route_button(instance_id, button, false),
        }
        true
    }

    fn route_button(&mut self, instance_id: u32, button: ButtonId, press: bool) {
        if !self.registry.is_active(instance_id) {
            return;
        }
        // Unmapped buttons are not an error; they simply do nothing.
        let Some(action) = self.table.lookup(button) else {
            return;
        };
        let verb = if press { "Pressed" } else { "Released" };
        info!("{}: {} -> {}", verb, button_label(button), action);

        let result = if press {
            self.injector.press(&action)
        } else {
            self.injector.release(&action)
        };
        if let Err(e) = result {
            // Drop this event and keep going; injection failures are
            // never fatal to the loop.
            error!("{}", e);
        }
    }

    /// Run until `running` clears or a quit event arrives. Each iteration
    /// drains the queued events, then idles one tick.
    pub fn run(&mut self, pump: &mut sdl2::EventPump, running: &AtomicBool) {
        while running.load(Ordering::SeqCst) {
            while let Some(event) = pump.poll_event() {
                if let Some(event) = DispatchEvent::from_sdl(&event) {
                    if !self.handle(event) {
                        running.store(false, Ordering::SeqCst);
                        break;
                    }
                }
            }
            thread::sleep(IDLE_TICK);
        }
        self.registry.release();
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }
}
