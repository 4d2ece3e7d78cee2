//! Riffmap - controller-to-keyboard remapper for rhythm games
//!
//! This library provides components for:
//! - Action modeling (character keys, named keys, mouse buttons)
//! - A hot-swappable button-to-action mapping table
//! - Input injection (sending synthetic key/mouse events)
//! - Controller lifecycle tracking (hot-plug attach/detach)
//! - The event dispatch loop tying it all together

pub mod action;
pub mod config;
pub mod device;
pub mod dispatcher;
pub mod injector;
pub mod mapping;

pub use action::{Action, MouseButton, NamedKey};
pub use config::ConfigStore;
pub use device::{DeviceBackend, DeviceHandle, DeviceInfo, DeviceRegistry, SdlBackend};
pub use dispatcher::{DispatchEvent, Dispatcher};
pub use injector::{Injector, RdevInjector};
pub use mapping::{button_label, ButtonId, MappingTable};

use thiserror::Error;

/// Main error type for Riffmap
#[derive(Error, Debug)]
pub enum RiffmapError {
    #[error("Failed to open controller at index {index}: {reason}")]
    DeviceOpen { index: u32, reason: String },

    #[error("Unrecognized action value '{0}'")]
    ActionParse(String),

    #[error("Failed to inject input event: {0}")]
    Injection(String),

    #[error("Failed to access configuration: {0}")]
    ConfigIo(String),

    #[error("Input subsystem error: {0}")]
    Subsystem(String),
}
